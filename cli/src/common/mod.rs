//! # Spells Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! This module is the organizational root for the helpers themselves, kept apart from
//! the shared infrastructure in `core` (errors, configuration).
//!
//! - **`archive`**: gzipped tarball creation (`archive::tar::make_tar`).
//! - **`fs`**: scoped temporary directories (`fs::temp`) and recursive file lookup
//!   (`fs::find`).
//!
//! The helpers are synchronous and blocking, keep no state between calls, and never
//! retry: every failure is returned to the caller.
//!

/// Utilities for building archive files (gzipped tarballs).
pub mod archive;
/// Utilities for temporary directories and file lookup.
pub mod fs;
