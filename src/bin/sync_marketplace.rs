//! Sync the CLI marketplace catalog with the extended metadata file.
//!
//! Usage:
//!   sync-marketplace             # rewrite .claude-plugin/marketplace.json
//!   sync-marketplace --check     # fail if marketplace.json is stale
//!   sync-marketplace --root DIR  # operate on another checkout

use anyhow::{Context, Result};
use clap::Parser;
use marketplace_sync::{CatalogPaths, DISALLOWED_KEYS, find_repo_root};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sync-marketplace")]
#[command(about = "Strip internal-only fields from the extended marketplace catalog")]
struct Cli {
    /// Repository root containing .claude-plugin/ (discovered when omitted).
    #[arg(long)]
    root: Option<PathBuf>,
    /// Compare against the existing marketplace.json instead of writing it.
    #[arg(long)]
    check: bool,
    /// Emit debug logs on stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(err) = run(cli) {
        eprintln!("❌ {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let root = match cli.root {
        Some(root) => root,
        None => find_repo_root().context("locating repository root")?,
    };
    let paths = CatalogPaths::for_root(&root);
    debug!(
        extended = %paths.extended.display(),
        cli = %paths.cli.display(),
        "resolved catalog paths"
    );

    if cli.check {
        let report = marketplace_sync::check(&paths.extended, &paths.cli, DISALLOWED_KEYS)?;
        println!(
            "✅ CLI marketplace catalog is in sync ({} plugins) -> {}",
            report.plugins,
            report.destination.display()
        );
    } else {
        let report = marketplace_sync::sync(&paths.extended, &paths.cli, DISALLOWED_KEYS)?;
        println!(
            "✅ Synced CLI marketplace catalog -> {}",
            report.destination.display()
        );
    }
    Ok(())
}
