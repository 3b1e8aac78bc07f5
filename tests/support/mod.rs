#![allow(dead_code)]

use anyhow::{Context, Result};
use marketplace_sync::CatalogPaths;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

// Throwaway checkout with an empty .claude-plugin/ directory.
pub struct FixtureRepo {
    temp: TempDir,
    pub paths: CatalogPaths,
}

impl FixtureRepo {
    pub fn new() -> Result<Self> {
        let temp = TempDir::new().context("failed to allocate fixture repo")?;
        fs::create_dir_all(temp.path().join(".claude-plugin"))?;
        let paths = CatalogPaths::for_root(temp.path());
        Ok(Self { temp, paths })
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn write_extended(&self, contents: &str) -> Result<()> {
        fs::write(&self.paths.extended, contents)
            .with_context(|| format!("writing {}", self.paths.extended.display()))
    }

    pub fn write_extended_json(&self, value: &Value) -> Result<()> {
        self.write_extended(&serde_json::to_string(value)?)
    }

    pub fn write_cli(&self, contents: &str) -> Result<()> {
        fs::write(&self.paths.cli, contents)
            .with_context(|| format!("writing {}", self.paths.cli.display()))
    }

    pub fn read_cli(&self) -> Result<String> {
        fs::read_to_string(&self.paths.cli)
            .with_context(|| format!("reading {}", self.paths.cli.display()))
    }

    pub fn read_cli_json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.read_cli()?)?)
    }
}

pub fn sync_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_sync-marketplace"))
}

// Runs the binary against `root`, with logging env cleared so stderr only
// carries the tool's own diagnostics.
pub fn run_sync(root: &Path, extra_args: &[&str]) -> Result<Output> {
    Command::new(sync_binary())
        .arg("--root")
        .arg(root)
        .args(extra_args)
        .env_remove("RUST_LOG")
        .env_remove("MARKETPLACE_ROOT")
        .output()
        .context("failed to execute sync-marketplace")
}
