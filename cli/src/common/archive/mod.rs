//! # Spells Archive Utilities Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! This module groups the archive-related helpers. Spells writes one format only,
//! a gzip-compressed tarball, through the `tar` submodule.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use spells::archive;
//! use std::path::Path;
//!
//! # fn run() -> anyhow::Result<()> {
//! let archive_path = archive::tar::make_tar(
//!     "release.tar.gz",
//!     Path::new("./build/output"),
//!     Path::new("./dist"),
//! )?;
//! println!("Archive written to {}", archive_path.display());
//! # Ok(())
//! # }
//! ```
//!

pub mod tar;
