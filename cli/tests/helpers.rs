//! # Spells Library Integration Tests
//!
//! File: cli/tests/helpers.rs
//!
//! ## Overview
//!
//! Exercises the public library API end to end, the way the backend service uses it:
//! stage files in a scoped temporary directory, bundle them, and look them up again.
//!

mod common;
use common::sample_tree;
use flate2::read::GzDecoder;
use spells::{find_file_by_name, make_tar, with_temporary_dir, Result, TemporaryDir};
use std::fs::{self, File};
use std::path::PathBuf;
use tar::Archive;

#[test]
fn test_stage_bundle_and_unpack_round_trip() -> Result<()> {
    let scratch = with_temporary_dir(|scratch| {
        let staged = scratch.join("staging");
        sample_tree(&staged);
        let out = scratch.join("out");
        fs::create_dir(&out)?;

        let archive = make_tar("archive", &staged, &out)?;
        assert_eq!(archive, out.join("archive"));

        let unpacked = scratch.join("unpacked");
        Archive::new(GzDecoder::new(File::open(&archive)?)).unpack(&unpacked)?;

        // The unpacked root is renamed; locate the nested file through it.
        let found = find_file_by_name("target.txt", &unpacked)?;
        assert_eq!(found, Some(unpacked.join("archive/src/nested/target.txt")));
        assert_eq!(
            fs::read(unpacked.join("archive/assets/logo.bin"))?,
            fs::read(staged.join("assets/logo.bin"))?
        );
        Ok(scratch.to_path_buf())
    })?;
    assert!(!scratch.exists());
    Ok(())
}

#[test]
fn test_archive_does_not_match_as_directory() -> Result<()> {
    let dir = TemporaryDir::acquire()?;
    fs::create_dir_all(dir.path().join("target.txt"))?;
    assert_eq!(find_file_by_name("target.txt", dir.path())?, None);
    dir.close()
}

#[test]
fn test_failed_scope_still_cleans_up() {
    let mut staged: Option<PathBuf> = None;
    let result: Result<()> = with_temporary_dir(|scratch| {
        staged = Some(scratch.to_path_buf());
        make_tar("archive", &scratch.join("missing"), scratch)?;
        Ok(())
    });

    assert!(result.is_err());
    assert!(!staged.unwrap().exists());
}
