use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod catalog;
pub mod error;
pub mod sanitize;
pub mod sync;

pub use catalog::CatalogDocument;
pub use error::SyncError;
pub use sanitize::{DISALLOWED_KEYS, sanitize_entry};
pub use sync::{SyncReport, check, sync};

const PLUGIN_DIR: &str = ".claude-plugin";
const EXTENDED_CATALOG: &str = "marketplace.extended.json";
const CLI_CATALOG: &str = "marketplace.json";
pub const ROOT_ENV: &str = "MARKETPLACE_ROOT";

/// Source and destination of a sync, both under `<root>/.claude-plugin/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPaths {
    pub extended: PathBuf,
    pub cli: PathBuf,
}

impl CatalogPaths {
    pub fn for_root(root: &Path) -> Self {
        let plugin_dir = root.join(PLUGIN_DIR);
        Self {
            extended: plugin_dir.join(EXTENDED_CATALOG),
            cli: plugin_dir.join(CLI_CATALOG),
        }
    }
}

fn is_repo_root(candidate: &Path) -> bool {
    candidate.join(PLUGIN_DIR).is_dir()
}

fn repo_root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !hint_path.exists() || !is_repo_root(&hint_path) {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        if is_repo_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the repository whose `.claude-plugin/` catalogs should be synced.
///
/// Checks `MARKETPLACE_ROOT`, then the ancestors of the running executable,
/// then the root baked in at build time via `MARKETPLACE_ROOT_HINT`.
pub fn find_repo_root() -> Result<PathBuf> {
    if let Ok(env_root) = env::var(ROOT_ENV) {
        if let Some(root) = repo_root_from_hint(&env_root) {
            return Ok(root);
        }
    }

    if let Ok(exe_path) = env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            if let Some(root) = search_upwards(exe_dir) {
                return Ok(root);
            }
        }
    }

    if let Some(hint) = option_env!("MARKETPLACE_ROOT_HINT") {
        if let Some(root) = repo_root_from_hint(hint) {
            return Ok(root);
        }
    }

    bail!(
        "Unable to locate a repository containing {PLUGIN_DIR}/. Set {ROOT_ENV} or pass --root."
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn catalog_paths_live_under_plugin_dir() {
        let paths = CatalogPaths::for_root(Path::new("/repo"));
        assert_eq!(
            paths.extended,
            Path::new("/repo/.claude-plugin/marketplace.extended.json")
        );
        assert_eq!(paths.cli, Path::new("/repo/.claude-plugin/marketplace.json"));
    }

    #[test]
    fn search_upwards_finds_nearest_plugin_dir() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(PLUGIN_DIR)).unwrap();
        let nested = temp.path().join("target/release");
        fs::create_dir_all(&nested).unwrap();
        let found = search_upwards(&nested).unwrap();
        assert_eq!(found, fs::canonicalize(temp.path()).unwrap());
    }

    #[test]
    fn hint_without_plugin_dir_is_ignored() {
        let temp = TempDir::new().unwrap();
        assert!(repo_root_from_hint(temp.path().to_str().unwrap()).is_none());
        assert!(repo_root_from_hint("").is_none());
        fs::create_dir_all(temp.path().join(PLUGIN_DIR)).unwrap();
        assert!(repo_root_from_hint(temp.path().to_str().unwrap()).is_some());
    }
}
