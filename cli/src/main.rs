//! # Spells Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Thin command-line front end over the `spells` library. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Loading the layered configuration (`core::config`)
//! - Routing execution to the archive and lookup helpers
//!
//! ## Examples
//!
//! ```bash
//! # Bundle ./build as dist/release.tar.gz (top-level entry "release.tar.gz")
//! spells tar release.tar.gz ./build ./dist
//!
//! # Locate the first Cargo.lock below the current directory, with debug logs
//! spells -vv find Cargo.lock
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level (`RUST_LOG` takes precedence)
//! 3. Run the command
//! 4. Report any error on stderr and exit with status 1
//!
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use spells::core::config;
use spells::core::error::Result;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "spells",
    about = "Filesystem helpers: gzipped tarballs and recursive file lookup",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write DESTINATION/NAME as a gzipped tarball of SOURCE, stored under NAME.
    Tar(TarArgs),
    /// Print the first regular file below PATH whose name matches NAME.
    Find(FindArgs),
}

#[derive(Args, Debug)]
struct TarArgs {
    /// Archive file name, also used as the top-level entry name inside the archive.
    name: String,
    /// File or directory to archive.
    source: PathBuf,
    /// Directory receiving the archive.
    #[arg(default_value = ".")]
    destination: PathBuf,
}

#[derive(Args, Debug)]
struct FindArgs {
    /// Exact file name or glob pattern (quote it to keep the shell from expanding it).
    name: String,
    /// Directory to search.
    #[arg(default_value = ".")]
    path: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Tar(args) => handle_tar(args),
        Commands::Find(args) => handle_find(args),
    };

    match command_result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!("Command execution failed: {:?}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Builds the archive with the configured options. Always succeeds or errors.
fn handle_tar(args: TarArgs) -> Result<bool> {
    let cfg = config::load_config().context("Failed to load configuration")?;
    let archive_path = spells::make_tar_with(
        &args.name,
        &args.source,
        &args.destination,
        &cfg.archive.tar_options(),
    )?;
    println!("{}", archive_path.display());
    Ok(true)
}

/// Returns `Ok(false)` when nothing matched so the process exits non-zero.
fn handle_find(args: FindArgs) -> Result<bool> {
    match spells::find_file_by_name(&args.name, &args.path)? {
        Some(found) => {
            println!("{}", found.display());
            Ok(true)
        }
        None => {
            eprintln!(
                "No file matching '{}' found under '{}'",
                args.name,
                args.path.display()
            );
            Ok(false)
        }
    }
}
