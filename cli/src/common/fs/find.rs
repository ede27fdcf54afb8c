//! # Spells Recursive File Lookup
//!
//! File: cli/src/common/fs/find.rs
//!
//! ## Overview
//!
//! This module locates a regular file by name anywhere below a root directory.
//! The name may be an exact file name (`target.txt`) or a glob-style pattern
//! (`*.log`, `report-??.csv`, `data[0-9].bin`). A name containing `/`
//! (`sub/target.txt`, `*/cfg/*.toml`) is matched against the trailing components of
//! each entry's path relative to the root, one pattern component per path component.
//!
//! ## Architecture
//!
//! - `walkdir::WalkDir` descends the tree depth-first without following symlinked
//!   directories. The root itself is never a candidate.
//! - `glob::Pattern` does the name matching. Wildcards never cross a `/`, and names
//!   that are not valid UTF-8 never match.
//! - Only regular files qualify. A symlink qualifies when it resolves to a regular
//!   file; directories and special files never do.
//! - The first qualifying entry wins. No sorting is applied, so with duplicate names
//!   the winner depends on the order the filesystem enumerates directory entries.
//! - Any error while walking (permission denied on a subdirectory, an entry vanishing
//!   mid-walk) aborts the search and is returned; nothing is skipped silently.
//!
//! ## Usage
//!
//! ```rust
//! use spells::fs::find::find_file_by_name;
//! # use std::fs;
//! # use tempfile::tempdir;
//!
//! # fn main() -> anyhow::Result<()> {
//! # let root = tempdir()?;
//! # fs::create_dir_all(root.path().join("a/b"))?;
//! # fs::write(root.path().join("a/b/target.txt"), "")?;
//! let found = find_file_by_name("target.txt", root.path())?;
//! assert_eq!(found, Some(root.path().join("a/b/target.txt")));
//!
//! assert_eq!(find_file_by_name("absent.txt", root.path())?, None);
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{Result, SpellsError};
use anyhow::Context;
use glob::{MatchOptions, Pattern};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// # Find File By Name (`find_file_by_name`)
///
/// Recursively searches `path` for a regular file whose name matches `name`.
///
/// ## Arguments
///
/// * `name` - Exact file name or glob pattern for the file name, optionally preceded
///   by parent directory components (`sub/target.txt`).
/// * `path` - Root directory of the search. Must exist and be a directory.
///
/// ## Returns
///
/// * `Result<Option<PathBuf>>` - `Some(path)` for the first match in traversal order,
///   `None` when no regular file matches.
///
/// ## Errors
///
/// Returns an `Err` if:
/// - `name` is not a valid pattern (`SpellsError::InvalidPattern`).
/// - `path` does not exist (root cause `std::io::Error` of kind `NotFound`).
/// - `path` is not a directory (`SpellsError::NotADirectory`).
/// - A directory below `path` cannot be read.
pub fn find_file_by_name(name: &str, path: &Path) -> Result<Option<PathBuf>> {
    let matcher = NameMatcher::new(name)?;

    let root_meta = fs::metadata(path)
        .with_context(|| format!("Failed to access search root '{}'", path.display()))?;
    if !root_meta.is_dir() {
        anyhow::bail!(SpellsError::NotADirectory {
            path: path.to_path_buf()
        });
    }

    debug!("Searching '{}' for files named '{}'", path.display(), name);
    for entry_result in WalkDir::new(path).min_depth(1).follow_links(false) {
        let entry = entry_result.with_context(|| {
            format!("Failed to read entry while searching '{}'", path.display())
        })?;
        let relative = entry.path().strip_prefix(path).with_context(|| {
            format!(
                "Entry '{}' is outside search root '{}'",
                entry.path().display(),
                path.display()
            )
        })?;
        if !matcher.matches(relative) {
            continue;
        }
        if is_regular_file(&entry) {
            info!("Found '{}' at {}", name, entry.path().display());
            return Ok(Some(entry.into_path()));
        }
        debug!("Skipping non-file match: {}", entry.path().display());
    }

    debug!("No file named '{}' under '{}'", name, path.display());
    Ok(None)
}

/// Glob pattern over the last `depth` components of a root-relative path.
struct NameMatcher {
    pattern: Pattern,
    depth: usize,
}

impl NameMatcher {
    const OPTIONS: MatchOptions = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    fn new(name: &str) -> Result<Self> {
        let parts: Vec<&str> = name.split('/').filter(|part| !part.is_empty()).collect();
        let pattern = Pattern::new(&parts.join("/")).map_err(SpellsError::from)?;
        Ok(Self {
            pattern,
            depth: parts.len().max(1),
        })
    }

    fn matches(&self, relative: &Path) -> bool {
        let names: Vec<&std::ffi::OsStr> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name),
                _ => None,
            })
            .collect();
        if names.len() < self.depth {
            return false;
        }
        let mut tail = String::new();
        for (index, name) in names[names.len() - self.depth..].iter().enumerate() {
            // Lossy conversion could turn an undecodable name into a false match.
            let Some(name) = name.to_str() else {
                return false;
            };
            if index > 0 {
                tail.push('/');
            }
            tail.push_str(name);
        }
        self.pattern.matches_with(&tail, Self::OPTIONS)
    }
}

// Symlinks count when their target is a regular file; dangling links do not.
fn is_regular_file(entry: &DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    entry.path_is_symlink()
        && fs::metadata(entry.path())
            .map(|meta| meta.is_file())
            .unwrap_or(false)
}
