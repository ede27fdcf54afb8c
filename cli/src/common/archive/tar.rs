//! # Spells TAR Archive Operations (`common::archive::tar`)
//!
//! File: cli/src/common/archive/tar.rs
//!
//! ## Overview
//!
//! This module builds gzipped tarballs (`.tar.gz`) on disk. The archive always has
//! a single top-level entry whose name is chosen by the caller, independent of the
//! source's base name on disk ("archive root rename"): archiving `./build/output`
//! as `release` yields entries `release/`, `release/app.bin`, and so on.
//!
//! ## Architecture
//!
//! The module leverages the `tar` crate for building the archive structure and
//! the `flate2` crate for Gzip compression, streaming straight into the output file:
//!
//! `tar::Builder` -> `flate2::write::GzEncoder` -> `std::fs::File`
//!
//! - A directory source is walked with `walkdir` (entries sorted by file name) and
//!   each entry is added with `append_path_with_name` under `name/<relative path>`.
//!   When the destination lies inside the source, the archive being written is
//!   skipped so it never contains a copy of itself.
//! - A file (or symlink) source is added as one entry with `append_path_with_name`.
//! - The default gzip level is 9 (best).
//! - Symlinks are stored as links unless `TarOptions::follow_symlinks` is set.
//!
//! No retry and no cleanup of a partially written archive happen here; failures
//! are returned to the caller with the offending path in the error context.
//!
//! ## Usage
//!
//! ```rust
//! use spells::archive::tar::make_tar;
//! # use std::fs;
//! # use tempfile::tempdir;
//!
//! # fn main() -> anyhow::Result<()> {
//! # let source = tempdir()?;
//! # fs::write(source.path().join("notes.txt"), "content")?;
//! # let destination = tempdir()?;
//! let archive_path = make_tar("archive", source.path(), destination.path())?;
//! assert_eq!(archive_path, destination.path().join("archive"));
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{Result, SpellsError};
use anyhow::Context;
use flate2::{write::GzEncoder, Compression};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Knobs for `make_tar_with`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TarOptions {
    /// Gzip level applied to the whole tar stream.
    pub compression: Compression,
    /// Archive what symlinks point to instead of the links themselves.
    pub follow_symlinks: bool,
}

impl Default for TarOptions {
    fn default() -> Self {
        Self {
            compression: Compression::best(),
            follow_symlinks: false,
        }
    }
}

/// # Make Gzipped TAR Archive (`make_tar`)
///
/// Writes a gzip-compressed tar archive to `destination/name` containing `source`
/// stored under the archive-internal name `name`, using default `TarOptions`.
///
/// ## Arguments
///
/// * `name` - File name of the archive *and* name of its top-level entry.
/// * `source` - File or directory to archive. Must exist. Never modified.
/// * `destination` - Existing, writable directory receiving the archive.
///
/// ## Returns
///
/// * `Result<PathBuf>` - The path of the written archive (`destination/name`).
///   An archive already at that path is overwritten.
///
/// ## Errors
///
/// Returns an `Err` (root cause `std::io::Error`) if:
/// - `source` does not exist or cannot be read.
/// - `destination/name` cannot be created (missing directory, permissions, disk full).
/// - Writing or finishing the tar/gzip stream fails.
///
/// An empty `name` is rejected with `SpellsError::FileSystem`.
pub fn make_tar(name: &str, source: &Path, destination: &Path) -> Result<PathBuf> {
    make_tar_with(name, source, destination, &TarOptions::default())
}

/// Same as [`make_tar`], with explicit compression and symlink handling.
pub fn make_tar_with(
    name: &str,
    source: &Path,
    destination: &Path,
    options: &TarOptions,
) -> Result<PathBuf> {
    if name.is_empty() {
        anyhow::bail!(SpellsError::FileSystem(
            "Archive name must not be empty".to_string()
        ));
    }
    let archive_path = destination.join(name);
    info!(
        "Creating tar archive '{}' from '{}'",
        archive_path.display(),
        source.display()
    );

    // Inspect the source before touching the destination so a missing source
    // does not leave an empty archive behind.
    let source_meta = if options.follow_symlinks {
        fs::metadata(source)
    } else {
        fs::symlink_metadata(source)
    }
    .with_context(|| format!("Failed to access archive source '{}'", source.display()))?;

    let file = File::create(&archive_path).with_context(|| {
        format!(
            "Failed to create archive file '{}'",
            archive_path.display()
        )
    })?;
    let enc = GzEncoder::new(file, options.compression);
    let mut tar_builder = tar::Builder::new(enc);
    tar_builder.follow_symlinks(options.follow_symlinks);

    if source_meta.is_dir() {
        debug!("Adding directory '{}' as '{}/'", source.display(), name);
        let own_archive = fs::canonicalize(&archive_path).with_context(|| {
            format!("Failed to resolve archive path '{}'", archive_path.display())
        })?;
        let source_root = fs::canonicalize(source)
            .with_context(|| format!("Failed to resolve archive source '{}'", source.display()))?;

        for entry_result in WalkDir::new(source)
            .follow_links(options.follow_symlinks)
            .sort_by_file_name()
        {
            let entry = entry_result.with_context(|| {
                format!("Failed to walk archive source '{}'", source.display())
            })?;
            let relative = entry.path().strip_prefix(source)?;
            if source_root.join(relative) == own_archive {
                debug!("Skipping the archive itself: {}", entry.path().display());
                continue;
            }
            let entry_name = if relative.as_os_str().is_empty() {
                PathBuf::from(name)
            } else {
                Path::new(name).join(relative)
            };
            tar_builder
                .append_path_with_name(entry.path(), &entry_name)
                .with_context(|| {
                    format!(
                        "Failed to add '{}' to the tar archive",
                        entry.path().display()
                    )
                })?;
        }
    } else {
        debug!("Adding single entry '{}' as '{}'", source.display(), name);
        tar_builder
            .append_path_with_name(source, name)
            .with_context(|| {
                format!("Failed to add '{}' to the tar archive", source.display())
            })?;
    }

    // Finalize the TAR archive structure, then the Gzip stream.
    let encoder = tar_builder
        .into_inner()
        .context("Failed to finalize tar archive structure")?;
    encoder
        .finish()
        .context("Failed to finish gzip compression stream")?;

    info!("Wrote tar archive '{}'", archive_path.display());
    Ok(archive_path)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::collections::BTreeSet;
    use tar::Archive;
    use tempfile::tempdir;
    use walkdir::WalkDir;

    /// Unpacks `archive_path` into `target` and returns the set of entry paths.
    fn unpack(archive_path: &Path, target: &Path) -> Result<BTreeSet<String>> {
        let mut names = BTreeSet::new();
        let mut listing = Archive::new(GzDecoder::new(File::open(archive_path)?));
        for entry in listing.entries()? {
            let entry = entry?;
            names.insert(
                entry
                    .path()?
                    .to_string_lossy()
                    .trim_end_matches('/')
                    .replace('\\', "/"),
            );
        }
        Archive::new(GzDecoder::new(File::open(archive_path)?)).unpack(target)?;
        Ok(names)
    }

    /// Asserts that both trees hold the same relative paths with identical file bytes.
    fn assert_same_tree(expected: &Path, actual: &Path) -> Result<()> {
        let relative = |root: &Path| -> Result<BTreeSet<PathBuf>> {
            let mut set = BTreeSet::new();
            for entry in WalkDir::new(root).min_depth(1) {
                let entry = entry?;
                set.insert(entry.path().strip_prefix(root)?.to_path_buf());
            }
            Ok(set)
        };
        let expected_paths = relative(expected)?;
        assert_eq!(expected_paths, relative(actual)?);
        for rel in expected_paths {
            let src = expected.join(&rel);
            if src.is_file() {
                assert_eq!(fs::read(&src)?, fs::read(actual.join(&rel))?, "{:?}", rel);
            }
        }
        Ok(())
    }

    fn populate(dir: &Path) -> Result<()> {
        fs::write(dir.join("file1.txt"), "hello")?;
        fs::create_dir_all(dir.join("subdir/deeper"))?;
        fs::write(dir.join("subdir/file2.txt"), "world")?;
        fs::write(dir.join("subdir/deeper/blob.bin"), [0u8, 159, 146, 150, 255])?;
        fs::create_dir(dir.join("empty"))?;
        Ok(())
    }

    #[test]
    fn test_make_tar_renames_directory_root() -> Result<()> {
        let base = tempdir()?;
        let source = base.path().join("some_build_output");
        fs::create_dir(&source)?;
        populate(&source)?;
        let destination = tempdir()?;

        let archive_path = make_tar("archive", &source, destination.path())?;
        assert_eq!(archive_path, destination.path().join("archive"));
        assert!(archive_path.is_file());

        let extracted = tempdir()?;
        let names = unpack(&archive_path, extracted.path())?;
        assert!(names.contains("archive"));
        assert!(names.contains("archive/file1.txt"));
        assert!(names.contains("archive/subdir/deeper/blob.bin"));
        assert!(names.contains("archive/empty"));
        assert!(names.iter().all(|n| n == "archive" || n.starts_with("archive/")));
        assert!(!names.iter().any(|n| n.contains("some_build_output")));

        assert_same_tree(&source, &extracted.path().join("archive"))?;
        Ok(())
    }

    #[test]
    fn test_make_tar_single_file_source() -> Result<()> {
        let base = tempdir()?;
        let source = base.path().join("report.csv");
        fs::write(&source, "a,b\n1,2\n")?;
        let destination = tempdir()?;

        let archive_path = make_tar("report.tar.gz", &source, destination.path())?;

        let extracted = tempdir()?;
        let names = unpack(&archive_path, extracted.path())?;
        assert_eq!(names, BTreeSet::from(["report.tar.gz".to_string()]));
        assert_eq!(
            fs::read(extracted.path().join("report.tar.gz"))?,
            b"a,b\n1,2\n"
        );
        Ok(())
    }

    #[test]
    fn test_make_tar_overwrites_previous_archive() -> Result<()> {
        let source = tempdir()?;
        fs::write(source.path().join("version.txt"), "v1")?;
        let destination = tempdir()?;

        let first = make_tar("archive", source.path(), destination.path())?;
        fs::write(source.path().join("version.txt"), "v2")?;
        let second = make_tar("archive", source.path(), destination.path())?;
        assert_eq!(first, second);

        let extracted = tempdir()?;
        unpack(&second, extracted.path())?;
        assert_eq!(
            fs::read_to_string(extracted.path().join("archive/version.txt"))?,
            "v2"
        );
        Ok(())
    }

    #[test]
    fn test_make_tar_does_not_mutate_source() -> Result<()> {
        let source = tempdir()?;
        populate(source.path())?;
        let snapshot = tempdir()?;
        populate(snapshot.path())?;
        let destination = tempdir()?;

        make_tar("archive", source.path(), destination.path())?;
        assert_same_tree(snapshot.path(), source.path())?;
        Ok(())
    }

    #[test]
    fn test_make_tar_missing_source() -> Result<()> {
        let base = tempdir()?;
        let destination = tempdir()?;
        let result = make_tar("archive", &base.path().join("missing"), destination.path());

        let err = result.unwrap_err();
        let io_err = err.root_cause().downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io_err.kind(), std::io::ErrorKind::NotFound);
        assert!(!destination.path().join("archive").exists());
        Ok(())
    }

    #[test]
    fn test_make_tar_missing_destination() -> Result<()> {
        let source = tempdir()?;
        populate(source.path())?;
        let base = tempdir()?;
        let result = make_tar("archive", source.path(), &base.path().join("no/such/dir"));

        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to create archive file"));
        assert!(err.root_cause().downcast_ref::<std::io::Error>().is_some());
        Ok(())
    }

    #[test]
    fn test_make_tar_into_its_own_source() -> Result<()> {
        let source = tempdir()?;
        fs::write(source.path().join("data.txt"), "payload")?;

        // Run twice so the second pass also meets the previous archive on disk.
        make_tar("backup.tar.gz", source.path(), source.path())?;
        let archive_path = make_tar("backup.tar.gz", source.path(), source.path())?;

        let extracted = tempdir()?;
        let names = unpack(&archive_path, extracted.path())?;
        assert_eq!(
            names,
            BTreeSet::from([
                "backup.tar.gz".to_string(),
                "backup.tar.gz/data.txt".to_string(),
            ])
        );
        Ok(())
    }

    #[test]
    fn test_make_tar_into_nested_destination() -> Result<()> {
        let source = tempdir()?;
        populate(source.path())?;
        let nested = source.path().join("subdir");

        let archive_path = make_tar("archive", source.path(), &nested)?;

        let extracted = tempdir()?;
        let names = unpack(&archive_path, extracted.path())?;
        assert!(names.contains("archive/subdir/file2.txt"));
        assert!(!names.contains("archive/subdir/archive"));
        Ok(())
    }

    #[test]
    fn test_default_options_use_best_compression() {
        assert_eq!(TarOptions::default().compression, Compression::best());
        assert!(!TarOptions::default().follow_symlinks);
    }

    #[test]
    fn test_make_tar_rejects_empty_name() -> Result<()> {
        let source = tempdir()?;
        let destination = tempdir()?;
        let err = make_tar("", source.path(), destination.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SpellsError>(),
            Some(SpellsError::FileSystem(_))
        ));
        Ok(())
    }

    #[test]
    fn test_make_tar_with_compression_levels() -> Result<()> {
        let source = tempdir()?;
        fs::write(source.path().join("repeat.txt"), "spell ".repeat(4096))?;
        let destination = tempdir()?;

        let stored = make_tar_with(
            "stored",
            source.path(),
            destination.path(),
            &TarOptions {
                compression: Compression::none(),
                ..TarOptions::default()
            },
        )?;
        let best = make_tar_with(
            "best",
            source.path(),
            destination.path(),
            &TarOptions {
                compression: Compression::best(),
                ..TarOptions::default()
            },
        )?;
        assert!(fs::metadata(&best)?.len() < fs::metadata(&stored)?.len());

        let extracted = tempdir()?;
        unpack(&stored, extracted.path())?;
        unpack(&best, extracted.path())?;
        assert_same_tree(source.path(), &extracted.path().join("stored"))?;
        assert_same_tree(source.path(), &extracted.path().join("best"))?;
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_make_tar_stores_symlinks_as_links() -> Result<()> {
        let source = tempdir()?;
        fs::write(source.path().join("real.txt"), "data")?;
        std::os::unix::fs::symlink("real.txt", source.path().join("link.txt"))?;
        let destination = tempdir()?;

        let archive_path = make_tar("archive", source.path(), destination.path())?;

        let mut listing = Archive::new(GzDecoder::new(File::open(&archive_path)?));
        let mut saw_link = false;
        for entry in listing.entries()? {
            let entry = entry?;
            if entry.path()?.ends_with("link.txt") {
                assert_eq!(entry.header().entry_type(), tar::EntryType::Symlink);
                assert_eq!(
                    entry.link_name()?.as_deref(),
                    Some(Path::new("real.txt"))
                );
                saw_link = true;
            }
        }
        assert!(saw_link);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_make_tar_follow_symlinks_stores_targets() -> Result<()> {
        let source = tempdir()?;
        fs::write(source.path().join("real.txt"), "data")?;
        std::os::unix::fs::symlink("real.txt", source.path().join("link.txt"))?;
        let destination = tempdir()?;

        let options = TarOptions {
            follow_symlinks: true,
            ..TarOptions::default()
        };
        let archive_path = make_tar_with("archive", source.path(), destination.path(), &options)?;

        let mut listing = Archive::new(GzDecoder::new(File::open(&archive_path)?));
        for entry in listing.entries()? {
            let entry = entry?;
            if entry.path()?.ends_with("link.txt") {
                assert_eq!(entry.header().entry_type(), tar::EntryType::Regular);
            }
        }
        Ok(())
    }
}
