//! # Spells Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test crates in `cli/tests/`. Each `.rs` file
//! there is compiled as its own test crate and pulls this module in with `mod common;`.
//!

// Not every test crate uses every helper.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::Path;

/// # Get Spells Command (`spells_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `spells` binary.
///
/// ## Panics
/// Panics if the `spells` binary cannot be found via `Command::cargo_bin`.
pub fn spells_cmd() -> Command {
    Command::cargo_bin("spells").expect("Failed to find spells binary for testing")
}

/// Lays out a small tree under `root`:
///
/// ```text
/// root/readme.md
/// root/src/lib.rs
/// root/src/nested/target.txt
/// root/assets/logo.bin
/// ```
pub fn sample_tree(root: &Path) {
    fs::create_dir_all(root.join("src/nested")).unwrap();
    fs::create_dir_all(root.join("assets")).unwrap();
    fs::write(root.join("readme.md"), "# sample\n").unwrap();
    fs::write(root.join("src/lib.rs"), "pub fn answer() -> u32 { 42 }\n").unwrap();
    fs::write(root.join("src/nested/target.txt"), "needle").unwrap();
    fs::write(root.join("assets/logo.bin"), [0u8, 1, 2, 3, 254, 255]).unwrap();
}
