//! # Spells Scoped Temporary Directories
//!
//! File: cli/src/common/fs/temp.rs
//!
//! ## Overview
//!
//! This module hands out fresh, uniquely-named, empty directories that live exactly
//! as long as the scope that asked for them. On every way out of that scope (normal
//! return, early `?` return, or a panic unwinding through it) the directory and
//! everything inside it is removed.
//!
//! ## Architecture
//!
//! Two entry points, both built on `tempfile::TempDir`:
//!
//! - **`with_temporary_dir`** / **`with_temporary_dir_in`**: closure-scoped form.
//!   The body receives `&Path`; cleanup runs after the body no matter how it ended,
//!   and a cleanup failure is reported rather than swallowed.
//! - **`TemporaryDir`**: guard form for callers that need the directory across
//!   several statements. `close()` removes it and reports failures; simply dropping
//!   the guard removes it on a best-effort basis (this is also what happens while a
//!   panic unwinds).
//!
//! A guard is `Send` but not `Clone`; two threads writing into the same directory
//! must coordinate themselves.
//!
//! ## Usage
//!
//! ```rust
//! use spells::fs::temp::with_temporary_dir;
//! use std::fs;
//!
//! # fn main() -> anyhow::Result<()> {
//! let kept = with_temporary_dir(|dir| {
//!     fs::write(dir.join("scratch.txt"), "work in progress")?;
//!     Ok(dir.to_path_buf())
//! })?;
//! assert!(!kept.exists());
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{Result, SpellsError};
use anyhow::Context;
use std::path::Path;
use tempfile::TempDir;
use tracing::{debug, warn};

/// An exclusively owned temporary directory, removed on `close()` or drop.
#[derive(Debug)]
pub struct TemporaryDir {
    inner: TempDir,
}

impl TemporaryDir {
    /// Creates a new empty directory in the platform's temporary area.
    pub fn acquire() -> Result<Self> {
        let inner = tempfile::tempdir().context("Failed to create temporary directory")?;
        debug!("Acquired temporary directory {}", inner.path().display());
        Ok(Self { inner })
    }

    /// Creates a new empty directory under `base` instead of the platform temp area.
    pub fn acquire_in(base: &Path) -> Result<Self> {
        let inner = tempfile::tempdir_in(base).with_context(|| {
            format!(
                "Failed to create temporary directory in '{}'",
                base.display()
            )
        })?;
        debug!("Acquired temporary directory {}", inner.path().display());
        Ok(Self { inner })
    }

    /// Path of the directory. Valid until the guard is closed or dropped.
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Recursively removes the directory, reporting any failure.
    ///
    /// # Errors
    ///
    /// Returns `SpellsError::Cleanup` when removal fails, e.g. because another
    /// process already deleted or locked part of the tree.
    pub fn close(self) -> Result<()> {
        let path = self.inner.path().to_path_buf();
        self.inner
            .close()
            .map_err(|source| SpellsError::Cleanup {
                path: path.clone(),
                source,
            })?;
        debug!("Released temporary directory {}", path.display());
        Ok(())
    }
}

impl AsRef<Path> for TemporaryDir {
    fn as_ref(&self) -> &Path {
        self.path()
    }
}

/// # Run With Temporary Directory (`with_temporary_dir`)
///
/// Acquires a fresh directory in the platform temp area, runs `body` with its path,
/// then removes the directory and everything in it.
///
/// ## Returns
///
/// * `Result<T>` - whatever `body` returned, provided cleanup succeeded.
///
/// ## Errors
///
/// - Acquisition failure.
/// - `body`'s own error, after the directory has been removed.
/// - `SpellsError::Cleanup` if removal fails. When `body` had also failed, its
///   message is attached to the cleanup error as context.
pub fn with_temporary_dir<T, F>(body: F) -> Result<T>
where
    F: FnOnce(&Path) -> Result<T>,
{
    run_scoped(TemporaryDir::acquire()?, body)
}

/// Same as [`with_temporary_dir`], creating the directory under `base`.
pub fn with_temporary_dir_in<T, F>(base: &Path, body: F) -> Result<T>
where
    F: FnOnce(&Path) -> Result<T>,
{
    run_scoped(TemporaryDir::acquire_in(base)?, body)
}

fn run_scoped<T, F>(dir: TemporaryDir, body: F) -> Result<T>
where
    F: FnOnce(&Path) -> Result<T>,
{
    // A panic in `body` unwinds through here and `dir` is dropped, which still
    // removes the directory.
    let outcome = body(dir.path());
    let cleanup = dir.close();

    match (outcome, cleanup) {
        (Ok(value), Ok(())) => Ok(value),
        (Err(body_err), Ok(())) => Err(body_err),
        (Ok(_), Err(cleanup_err)) => Err(cleanup_err),
        (Err(body_err), Err(cleanup_err)) => {
            warn!("Temporary directory cleanup failed after scoped body error: {body_err:#}");
            Err(cleanup_err.context(format!("Scoped body had already failed: {body_err:#}")))
        }
    }
}
