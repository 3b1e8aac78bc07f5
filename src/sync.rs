//! Source-to-destination sync pipeline.
//!
//! `sync` is strictly linear: load (with all validation gates), sanitize,
//! render, write. Any failure before the write leaves the destination as it
//! was. `check` runs the same steps but compares instead of writing.

use crate::catalog::CatalogDocument;
use crate::error::{Result, SyncError};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Outcome of a successful sync or check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub destination: PathBuf,
    pub plugins: usize,
    pub stripped_fields: usize,
}

/// Derive the public catalog at `destination` from the extended catalog at
/// `source`, dropping every key in `disallowed` from each plugin entry.
pub fn sync(source: &Path, destination: &Path, disallowed: &[&str]) -> Result<SyncReport> {
    let (rendered, report) = prepare(source, destination, disallowed)?;
    write_replacing(destination, rendered.as_bytes())?;
    debug!(
        destination = %destination.display(),
        bytes = rendered.len(),
        "wrote sanitized catalog"
    );
    Ok(report)
}

/// Verify that `destination` already holds exactly what `sync` would write.
///
/// Never writes. A missing or stale destination is `SyncError::OutOfDate`.
pub fn check(source: &Path, destination: &Path, disallowed: &[&str]) -> Result<SyncReport> {
    let (rendered, report) = prepare(source, destination, disallowed)?;
    let current = match fs::read(destination) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(SyncError::OutOfDate {
                path: destination.to_path_buf(),
            });
        }
        Err(err) => {
            return Err(SyncError::Read {
                path: destination.to_path_buf(),
                source: err,
            });
        }
    };
    if current != rendered.as_bytes() {
        return Err(SyncError::OutOfDate {
            path: destination.to_path_buf(),
        });
    }
    Ok(report)
}

fn prepare(source: &Path, destination: &Path, disallowed: &[&str]) -> Result<(String, SyncReport)> {
    debug!(source = %source.display(), "loading extended catalog");
    let document = CatalogDocument::load(source)?;
    let (sanitized, stripped_fields) = document.sanitized(disallowed);
    let rendered = sanitized.render()?;
    let report = SyncReport {
        destination: destination.to_path_buf(),
        plugins: sanitized.plugins().len(),
        stripped_fields,
    };
    debug!(
        plugins = report.plugins,
        stripped = report.stripped_fields,
        "sanitized extended catalog"
    );
    Ok((rendered, report))
}

const MAX_LINK_HOPS: usize = 40;

// Stage next to the real target so the final rename stays on one filesystem.
// The replacement keeps the target's permissions; a new file gets 0666 minus
// the process umask, the same as a plain `fs::write`.
fn write_replacing(destination: &Path, contents: &[u8]) -> Result<()> {
    let write_err = |source: io::Error| SyncError::Write {
        path: destination.to_path_buf(),
        source,
    };
    let target = resolve_link_target(destination).map_err(write_err)?;
    let existing = match fs::metadata(&target) {
        Ok(meta) => Some(meta.permissions()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => return Err(write_err(err)),
    };
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".marketplace-sync").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut staged = builder.tempfile_in(dir).map_err(write_err)?;
    staged.write_all(contents).map_err(write_err)?;
    if let Some(permissions) = existing {
        staged
            .as_file()
            .set_permissions(permissions)
            .map_err(write_err)?;
    }
    staged.as_file().sync_all().map_err(write_err)?;
    staged.persist(&target).map_err(|err| write_err(err.error))?;
    if target.as_path() != destination {
        debug!(resolved = %target.display(), "followed symlinked destination");
    }
    Ok(())
}

// Follows symlinks without requiring the final target to exist, so a dangling
// link still gets its target created rather than being replaced.
fn resolve_link_target(path: &Path) -> io::Result<PathBuf> {
    let mut current = path.to_path_buf();
    for _ in 0..MAX_LINK_HOPS {
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {
                let link = fs::read_link(&current)?;
                current = match current.parent() {
                    Some(parent) => parent.join(link),
                    None => link,
                };
            }
            Ok(_) => return Ok(current),
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(current),
            Err(err) => return Err(err),
        }
    }
    Err(io::Error::other(format!(
        "too many levels of symbolic links at {}",
        path.display()
    )))
}
