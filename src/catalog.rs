//! Marketplace catalog documents.
//!
//! A catalog is a JSON object whose `plugins` field is an array of plugin
//! entries. Everything else at the top level is opaque and is carried through
//! untouched. Loading runs the three validation gates in order (file present,
//! valid JSON, `plugins` array) so callers never see a half-valid document.

use crate::error::{Result, SyncError};
use crate::sanitize::{disallowed_keys_in, sanitize_entry};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

const PLUGINS_FIELD: &str = "plugins";

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogDocument {
    fields: Map<String, Value>,
}

impl CatalogDocument {
    /// Read and validate the catalog at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SyncError::MissingInput {
                path: path.to_path_buf(),
            });
        }
        let raw = fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => SyncError::MissingInput {
                path: path.to_path_buf(),
            },
            _ => SyncError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;
        Self::parse(&raw, path)
    }

    /// Parse catalog text. `origin` is only used for error reporting.
    pub fn parse(raw: &str, origin: &Path) -> Result<Self> {
        let value: Value = serde_json::from_str(raw).map_err(|err| SyncError::Parse {
            path: origin.to_path_buf(),
            message: err.to_string(),
        })?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) if fields.get(PLUGINS_FIELD).is_some_and(Value::is_array) => {
                Ok(Self { fields })
            }
            _ => Err(SyncError::Schema),
        }
    }

    pub fn plugins(&self) -> &[Value] {
        self.fields
            .get(PLUGINS_FIELD)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Shallow copy of this document with every plugin entry filtered.
    ///
    /// Also returns how many fields were dropped across all entries.
    pub fn sanitized(&self, disallowed: &[&str]) -> (Self, usize) {
        let mut stripped = 0;
        let plugins: Vec<Value> = self
            .plugins()
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                let dropped = disallowed_keys_in(entry, disallowed);
                if !dropped.is_empty() {
                    let name = entry
                        .get("name")
                        .and_then(serde_json::Value::as_str)
                        .unwrap_or("<unnamed>");
                    debug!(
                        index = idx,
                        plugin = name,
                        keys = ?dropped,
                        "stripping internal fields"
                    );
                }
                stripped += dropped.len();
                sanitize_entry(entry, disallowed)
            })
            .collect();

        let mut fields = self.fields.clone();
        // Replacing an existing key keeps its position in the ordered map.
        fields.insert(PLUGINS_FIELD.to_string(), Value::Array(plugins));
        (Self { fields }, stripped)
    }

    /// Pretty JSON with two-space indentation and a trailing newline.
    pub fn render(&self) -> Result<String> {
        let mut rendered = serde_json::to_string_pretty(&self.fields)?;
        rendered.push('\n');
        Ok(rendered)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}
