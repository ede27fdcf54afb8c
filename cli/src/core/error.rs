//! # Spells Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout Spells. The helpers never
//! recover or retry locally; every failure travels back to the caller with its
//! underlying cause intact.
//!
//! ## Architecture
//!
//! The error system consists of two components:
//! - `SpellsError`: a custom error enum using `thiserror` for failures that have no
//!   natural `std::io::Error` representation (bad patterns, bad configuration,
//!   "path is not a directory").
//! - `Result<T>`: a type alias for `anyhow::Result<T>`.
//!
//! Plain I/O failures are *not* wrapped in `SpellsError`. They stay `std::io::Error`
//! values with path context attached through `anyhow::Context`, so callers can still
//! inspect the `io::ErrorKind`:
//!
//! ```rust
//! use spells::fs::find::find_file_by_name;
//! use std::path::Path;
//!
//! let err = find_file_by_name("target.txt", Path::new("/does/not/exist")).unwrap_err();
//! let io_err = err.root_cause().downcast_ref::<std::io::Error>().unwrap();
//! assert_eq!(io_err.kind(), std::io::ErrorKind::NotFound);
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for Spells.
#[derive(Error, Debug)]
pub enum SpellsError {
    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Path '{}' is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("Invalid file name pattern: {source}")]
    InvalidPattern {
        #[from]
        source: glob::PatternError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to remove temporary directory '{}': {source}", .path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Type alias for Result using anyhow::Error.
/// Anyhow keeps the original cause reachable through `root_cause()` and `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;
