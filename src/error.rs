//! Failure taxonomy for a marketplace sync.
//!
//! Every variant is terminal for the run. The validation variants
//! (`MissingInput`, `Parse`, `Schema`) are raised before anything touches the
//! destination file. I/O variants keep the underlying error as their source
//! rather than in the message; render with `{:#}` through anyhow to see both.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Missing extended marketplace catalog at {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("Failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {}: {message}", file_label(path))]
    Parse { path: PathBuf, message: String },

    #[error("Invalid marketplace format: expected \"plugins\" array.")]
    Schema,

    #[error("Failed to serialize sanitized catalog")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CLI marketplace catalog at {} is out of date; run sync-marketplace", path.display())]
    OutOfDate { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, SyncError>;

fn file_label(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_the_file_not_the_full_path() {
        let err = SyncError::Parse {
            path: PathBuf::from("/repo/.claude-plugin/marketplace.extended.json"),
            message: "EOF while parsing an object at line 1 column 9".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse marketplace.extended.json: EOF while parsing an object at line 1 column 9"
        );
    }

    #[test]
    fn missing_input_reports_path() {
        let err = SyncError::MissingInput {
            path: PathBuf::from("/repo/.claude-plugin/marketplace.extended.json"),
        };
        assert!(err.to_string().contains("/repo/.claude-plugin/marketplace.extended.json"));
    }
}
