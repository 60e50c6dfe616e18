//! A single JSON locale file held in memory.
//!
//! The document is parsed completely before anything is written, and it is
//! persisted through a sibling temporary file that is renamed over the
//! original. A failed parse therefore never touches the file on disk, and a
//! crash during the write leaves either the old or the new content.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::Builder;
use tracing::warn;

use crate::errors::MergeError;
use crate::observability::telemetry::sanitize_for_log;

/// Default indentation width, in spaces.
pub const DEFAULT_INDENT: usize = 4;

/// An object-rooted JSON document loaded from `path`.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleDocument {
    path: PathBuf,
    root: Map<String, Value>,
    original: String,
}

impl LocaleDocument {
    /// Read and parse the locale file at `path`.
    ///
    /// Fails with `NotFound` when the file is missing, `Parse` when the
    /// content is not UTF-8 JSON, and `Validation` when the root is not an
    /// object.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MergeError> {
        let path = path.as_ref();
        let original = fs::read_to_string(path).map_err(|e| MergeError::from_read(path, e))?;
        Self::parse(path, original)
    }

    /// Parse `content` as the document stored at `path`.
    pub fn parse(path: impl AsRef<Path>, content: String) -> Result<Self, MergeError> {
        let path = path.as_ref();
        let value: Value =
            serde_json::from_str(&content).map_err(|e| MergeError::from_json(path, &e))?;

        let root = match value {
            Value::Object(map) => map,
            other => {
                return Err(MergeError::Validation {
                    path: path.to_path_buf(),
                    message: format!("root must be an object, found {}", type_name(&other)),
                })
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            root,
            original: content,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Text the document was loaded from.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Insert `key` or replace its whole value.
    ///
    /// Existing keys keep their position; a new key is appended. The previous
    /// value is returned. No deep merge happens: nested keys that only exist
    /// in the old value are gone afterwards.
    pub fn upsert(&mut self, key: &str, value: Value) -> Result<Option<Value>, MergeError> {
        if key.is_empty() {
            return Err(MergeError::Validation {
                path: self.path.clone(),
                message: "patch key must not be empty".to_string(),
            });
        }
        Ok(self.root.insert(key.to_string(), value))
    }

    /// Serialize the document with `indent` spaces, non-ASCII kept literal.
    pub fn render(&self, indent: usize) -> Result<String, MergeError> {
        let indent_bytes = vec![b' '; indent];
        let formatter = PrettyFormatter::with_indent(&indent_bytes);
        let mut buf = Vec::with_capacity(self.original.len() + 256);
        let mut ser = Serializer::with_formatter(&mut buf, formatter);
        self.root
            .serialize(&mut ser)
            .map_err(|e| MergeError::Validation {
                path: self.path.clone(),
                message: format!("document cannot be serialized: {e}"),
            })?;

        // serde_json only ever emits UTF-8
        String::from_utf8(buf).map_err(|e| MergeError::Validation {
            path: self.path.clone(),
            message: format!("serializer produced invalid UTF-8: {e}"),
        })
    }

    /// True when `rendered` matches the loaded text byte for byte.
    pub fn is_unchanged(&self, rendered: &str) -> bool {
        self.original == rendered
    }
}

/// Copy the current file to `<file>.bak`, returning the backup path.
pub fn write_backup(path: &Path) -> Result<PathBuf, MergeError> {
    let mut backup = path.as_os_str().to_owned();
    backup.push(".bak");
    let backup = PathBuf::from(backup);
    fs::copy(path, &backup).map_err(|e| MergeError::io(&backup, "back up to", e))?;
    Ok(backup)
}

/// Replace the file at `path` with `contents` via temp file + rename.
///
/// Symlinks are resolved first so the link survives and its target receives
/// the new content. The temporary file lives next to that target so the final
/// rename stays on one filesystem. Permissions of the existing file are
/// carried over.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), MergeError> {
    let target = match fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(_) => path.to_path_buf(),
    };
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let prefix = target
        .file_name()
        .map(|n| format!(".{}.", n.to_string_lossy()))
        .unwrap_or_else(|| ".locale-patch.".to_string());

    let mut temp_file = Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| MergeError::io(path, "create temporary file for", e))?;
    temp_file
        .write_all(contents)
        .map_err(|e| MergeError::io(path, "write temporary file for", e))?;
    temp_file
        .as_file_mut()
        .sync_all()
        .map_err(|e| MergeError::io(path, "flush", e))?;

    if let Ok(meta) = fs::metadata(&target) {
        if let Err(e) = fs::set_permissions(temp_file.path(), meta.permissions()) {
            warn!(
                file = %sanitize_for_log(&target.display().to_string()),
                error = %e,
                "Could not carry permissions over to rewritten locale file"
            );
        }
    }

    temp_file
        .persist(&target)
        .map_err(|e| MergeError::io(path, "replace", e.error))?;
    Ok(())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
