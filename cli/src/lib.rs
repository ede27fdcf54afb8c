//! # Spells
//!
//! File: cli/src/lib.rs
//!
//! ## Overview
//!
//! Small filesystem helpers for backend services:
//!
//! - [`with_temporary_dir`] / [`TemporaryDir`]: a fresh empty directory that is
//!   removed, contents included, whenever the owning scope ends.
//! - [`make_tar`]: writes `destination/name` as a gzipped tarball whose single
//!   top-level entry is `source` renamed to `name`.
//! - [`find_file_by_name`]: the first regular file below a root whose name matches
//!   an exact name or glob pattern.
//!
//! All operations are synchronous and return [`Result`] (`anyhow::Result`), keeping
//! the underlying `std::io::Error` reachable for callers that need its kind.
//!
//! ```rust
//! use spells::{find_file_by_name, make_tar, with_temporary_dir};
//! use std::fs;
//!
//! # fn main() -> anyhow::Result<()> {
//! with_temporary_dir(|scratch| {
//!     let source = scratch.join("payload");
//!     fs::create_dir_all(source.join("nested"))?;
//!     fs::write(source.join("nested/manifest.json"), "{}")?;
//!
//!     let archive = make_tar("bundle.tar.gz", &source, scratch)?;
//!     assert!(archive.is_file());
//!
//!     let manifest = find_file_by_name("*.json", scratch)?;
//!     assert_eq!(manifest, Some(source.join("nested/manifest.json")));
//!     Ok(())
//! })
//! # }
//! ```
//!

pub mod common;
pub mod core;

pub use crate::common::archive::tar::{make_tar, make_tar_with, TarOptions};
pub use crate::common::fs::find::find_file_by_name;
pub use crate::common::fs::temp::{with_temporary_dir, with_temporary_dir_in, TemporaryDir};
pub use crate::common::{archive, fs};
pub use crate::core::error::{Result, SpellsError};
