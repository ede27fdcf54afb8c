//! # Spells Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! This module groups the filesystem helpers:
//!
//! - **`temp`**: scoped temporary directories that are removed on every exit path
//!   (`with_temporary_dir`, `TemporaryDir`).
//! - **`find`**: recursive lookup of a regular file by exact name or glob pattern
//!   (`find_file_by_name`).
//!
//! The two are independent; neither calls the other.
//!

/// Recursive file lookup by name (`find_file_by_name`).
pub mod find;
/// Scoped temporary directories (`with_temporary_dir`, `TemporaryDir`).
pub mod temp;
