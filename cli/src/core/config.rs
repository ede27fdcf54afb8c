//! # Spells Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads, merges and validates the optional configuration that tunes the
//! helpers: the gzip level and symlink policy used when building tarballs, and the
//! base directory in which scoped temporary directories are created.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.spells.toml` in the start directory or its ancestors
//!    (the search stops at the first directory containing `.git`)
//! 2. User-specific `config.toml` in the platform config directory
//!    (e.g. `~/.config/spells/config.toml` on Linux)
//! 3. Default values defined in the code
//!
//! Project values override user values field by field. Paths are expanded (`~` to
//! the home directory) and the merged result is validated before use.
//!
//! ## Examples
//!
//! ```toml
//! [archive]
//! compression_level = 9
//! follow_symlinks = false
//!
//! [temp]
//! base_dir = "~/scratch"
//! ```
//!
//! ```rust,no_run
//! # fn main() -> anyhow::Result<()> {
//! let cfg = spells::core::config::load_config()?;
//! let options = cfg.archive.tar_options();
//! # Ok(())
//! # }
//! ```
//!
use crate::common::archive::tar::TarOptions;
use crate::common::fs::temp::TemporaryDir;
use crate::core::error::{Result, SpellsError};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Name of the project-level configuration file searched for in ancestors.
pub const PROJECT_CONFIG_FILENAME: &str = ".spells.toml";

/// Highest gzip level accepted by `flate2`.
const MAX_COMPRESSION_LEVEL: u32 = 9;

/// One configuration file as written on disk. Every field is optional so that a
/// file only overrides the values it actually sets.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    #[serde(default)]
    pub archive: ArchiveLayer,
    #[serde(default)]
    pub temp: TempLayer,
}

/// The `[archive]` table of a single file.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ArchiveLayer {
    pub compression_level: Option<u32>,
    pub follow_symlinks: Option<bool>,
}

/// The `[temp]` table of a single file.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TempLayer {
    pub base_dir: Option<String>,
}

/// The effective configuration after merging all layers and applying defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    pub archive: ArchiveConfig,
    pub temp: TempConfig,
}

/// Settings for `spells tar` / `make_tar_with`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveConfig {
    /// Gzip level, 0 (store) to 9 (best).
    pub compression_level: u32,
    /// Archive the targets of symlinks instead of the links themselves.
    pub follow_symlinks: bool,
}

/// Settings for scoped temporary directories.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TempConfig {
    /// Directory under which temporary directories are created (can use ~).
    /// `None` means the platform temporary area.
    pub base_dir: Option<String>,
}

fn default_compression_level() -> u32 {
    9
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            compression_level: default_compression_level(),
            follow_symlinks: false,
        }
    }
}

impl ArchiveConfig {
    /// Converts the configured values into options for the tar builder.
    pub fn tar_options(&self) -> TarOptions {
        TarOptions {
            compression: flate2::Compression::new(self.compression_level),
            follow_symlinks: self.follow_symlinks,
        }
    }
}

impl TempConfig {
    /// The configured base directory, if any, as a path.
    pub fn base_dir_path(&self) -> Option<PathBuf> {
        self.base_dir.as_ref().map(PathBuf::from)
    }

    /// Acquires a scoped temporary directory honouring `base_dir`.
    pub fn acquire(&self) -> Result<TemporaryDir> {
        match self.base_dir_path() {
            Some(base) => TemporaryDir::acquire_in(&base),
            None => TemporaryDir::acquire(),
        }
    }
}

/// Loads the merged configuration, starting the project search in the current directory.
pub fn load_config() -> Result<Config> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    load_config_from(&current_dir)
}

/// Loads the merged configuration, starting the project search in `start_dir`.
pub fn load_config_from(start_dir: &Path) -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config(start_dir)?;
    let mut merged_config = merge_configs(user_config, project_config);
    expand_config_paths(&mut merged_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<ConfigLayer>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "Spells", "spells") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.is_file() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config(start_dir: &Path) -> Result<Option<ConfigLayer>> {
    if let Some(project_config_path) = find_project_config_path(start_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!(
            "No project configuration file ({}) found in '{}' or ancestors.",
            PROJECT_CONFIG_FILENAME,
            start_dir.display()
        );
        Ok(None)
    }
}

/// Walks from `start_dir` up towards the filesystem root looking for `.spells.toml`.
/// A directory holding `.git` is the last one inspected.
pub fn find_project_config_path(start_dir: &Path) -> Option<PathBuf> {
    let mut path = start_dir;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

/// Reads and parses a single TOML configuration file.
pub fn load_config_from_path(path: &Path) -> Result<ConfigLayer> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Overlays `project` on top of `user`, then fills whatever neither file set with
/// the built-in defaults. A field counts as set whenever the file names it, even if
/// the value equals the default.
pub fn merge_configs(user: Option<ConfigLayer>, project: Option<ConfigLayer>) -> Config {
    let user = user.unwrap_or_default();
    let project = project.unwrap_or_default();
    Config {
        archive: ArchiveConfig {
            compression_level: project
                .archive
                .compression_level
                .or(user.archive.compression_level)
                .unwrap_or_else(default_compression_level),
            follow_symlinks: project
                .archive
                .follow_symlinks
                .or(user.archive.follow_symlinks)
                .unwrap_or(false),
        },
        temp: TempConfig {
            base_dir: project.temp.base_dir.or(user.temp.base_dir),
        },
    }
}

fn expand_config_paths(config: &mut Config) {
    if let Some(base_dir) = config.temp.base_dir.as_mut() {
        *base_dir = shellexpand::tilde(base_dir.as_str()).into_owned();
        debug!("Expanded temp base directory: {}", base_dir);
    }
}

/// Rejects values the helpers cannot honour.
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("Validating final configuration...");
    if config.archive.compression_level > MAX_COMPRESSION_LEVEL {
        return Err(anyhow!(SpellsError::Config(format!(
            "archive.compression_level must be between 0 and {}, got {}",
            MAX_COMPRESSION_LEVEL, config.archive.compression_level
        ))));
    }
    if let Some(base_dir) = config.temp.base_dir_path() {
        if !base_dir.exists() {
            warn!(
                "Configured temp base directory '{}' does not exist.",
                base_dir.display()
            );
        } else if !base_dir.is_dir() {
            return Err(anyhow!(SpellsError::Config(format!(
                "Configured temp base directory '{}' exists but is not a directory.",
                base_dir.display()
            ))));
        }
    }
    Ok(())
}
