//! Configuration Management
//!
//! Loads the patch manifest from TOML. A manifest carries:
//! - The top-level key to upsert (default `affiliate`)
//! - Batch policy, indentation and backup settings
//! - The ordered list of target files with their values
//!
//! When no manifest is found the built-in affiliate patch set is used.

pub mod builtin;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::errors::PatchError;
use crate::merge::{BatchPolicy, MergeOptions, PatchEntry, PatchSet, DEFAULT_INDENT, DEFAULT_KEY};

/// Manifest file looked up in the working directory.
pub const DEFAULT_MANIFEST_NAME: &str = "locale-patch.toml";

/// Largest indentation accepted from a manifest.
pub const MAX_INDENT: usize = 16;

/// Where the active manifest came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ManifestSource {
    /// Compiled-in affiliate patch set
    #[default]
    BuiltIn,
    File(PathBuf),
}

impl std::fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestSource::BuiltIn => write!(f, "built-in"),
            ManifestSource::File(p) => write!(f, "{}", p.display()),
        }
    }
}

/// One `[[entries]]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestEntry {
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// JSON file holding the value, relative to the manifest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_file: Option<PathBuf>,
}

impl ManifestEntry {
    pub fn inline(path: impl Into<PathBuf>, value: Value) -> Self {
        Self {
            path: path.into(),
            value: Some(value),
            value_file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default = "default_key")]
    pub key: String,
    #[serde(default)]
    pub policy: BatchPolicy,
    #[serde(default = "default_indent")]
    pub indent: usize,
    #[serde(default)]
    pub backup: bool,
    #[serde(default)]
    pub entries: Vec<ManifestEntry>,

    /// Directory relative entry paths resolve against (set via CLI, not persisted)
    #[serde(skip)]
    pub locales_dir: Option<PathBuf>,

    #[serde(skip)]
    pub source: ManifestSource,
}

fn default_key() -> String {
    DEFAULT_KEY.to_string()
}
fn default_indent() -> usize {
    DEFAULT_INDENT
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            key: default_key(),
            policy: BatchPolicy::default(),
            indent: default_indent(),
            backup: false,
            entries: Vec::new(),
            locales_dir: None,
            source: ManifestSource::BuiltIn,
        }
    }
}

impl Manifest {
    /// The affiliate patch set for es, en and ru.
    pub fn builtin() -> Self {
        Self {
            entries: builtin::entries(),
            ..Self::default()
        }
    }

    /// Load a manifest.
    ///
    /// `path` wins; otherwise `LOCALE_PATCH_MANIFEST`, then
    /// `locale-patch.toml`, then `~/.config/locale-patch/manifest.toml`,
    /// then the built-in set. Environment overrides apply last.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let env_path = std::env::var("LOCALE_PATCH_MANIFEST").ok();
        let explicit = path.or(env_path.as_deref().filter(|p| !p.is_empty()));

        let mut manifest = match explicit {
            Some(p) => Self::from_file(Path::new(p))?,
            None => {
                let mut candidates = vec![PathBuf::from(DEFAULT_MANIFEST_NAME)];
                if let Some(home) = dirs::home_dir() {
                    candidates.push(home.join(".config/locale-patch/manifest.toml"));
                }

                let mut loaded = None;
                for candidate in &candidates {
                    if candidate.is_file() {
                        loaded = Some(Self::from_file(candidate)?);
                        break;
                    }
                }
                loaded.unwrap_or_else(|| {
                    tracing::debug!("No manifest file found, using built-in patch set");
                    Self::builtin()
                })
            }
        };

        manifest.apply_env_overrides(|name| std::env::var(name).ok())?;
        Ok(manifest)
    }

    /// Read and parse a manifest file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PatchError::Config(format!("cannot read manifest {}: {}", path.display(), e))
        })?;
        let mut manifest: Manifest = toml::from_str(&content)
            .map_err(|e| PatchError::Config(format!("{}: {}", path.display(), e)))?;
        manifest.source = ManifestSource::File(path.to_path_buf());
        Ok(manifest)
    }

    /// Apply `LOCALE_PATCH_KEY`, `LOCALE_PATCH_POLICY` and `LOCALE_PATCH_INDENT`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("LOCALE_PATCH_KEY") {
            self.key = key;
        }
        if let Some(policy) = lookup("LOCALE_PATCH_POLICY") {
            self.policy = policy
                .parse()
                .map_err(|e: String| PatchError::Config(format!("LOCALE_PATCH_POLICY: {}", e)))?;
        }
        if let Some(indent) = lookup("LOCALE_PATCH_INDENT") {
            self.indent = indent.trim().parse().map_err(|_| {
                PatchError::Config(format!(
                    "LOCALE_PATCH_INDENT must be a number, got '{}'",
                    indent
                ))
            })?;
        }
        Ok(())
    }

    /// Directory holding the manifest file, if any.
    pub fn manifest_dir(&self) -> Option<&Path> {
        match &self.source {
            ManifestSource::File(p) => Some(p.parent().unwrap_or_else(|| Path::new(""))),
            ManifestSource::BuiltIn => None,
        }
    }

    /// Base directory for relative entry paths.
    pub fn base_dir(&self) -> PathBuf {
        if let Some(dir) = &self.locales_dir {
            return dir.clone();
        }
        match self.manifest_dir() {
            Some(dir) => dir.to_path_buf(),
            None => PathBuf::from(builtin::DEFAULT_LOCALES_DIR),
        }
    }

    /// Check the manifest shape before touching any locale file.
    pub fn validate(&self) -> std::result::Result<(), PatchError> {
        if self.key.trim().is_empty() {
            return Err(PatchError::Config("key must not be empty".to_string()));
        }
        if self.entries.is_empty() {
            return Err(PatchError::Config(format!(
                "manifest {} has no entries",
                self.source
            )));
        }
        if self.indent > MAX_INDENT {
            return Err(PatchError::Config(format!(
                "indent {} is larger than {}",
                self.indent, MAX_INDENT
            )));
        }
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.path.as_os_str().is_empty() {
                return Err(PatchError::Config(format!("entry {} has an empty path", i + 1)));
            }
            match (&entry.value, &entry.value_file) {
                (Some(_), Some(_)) => {
                    return Err(PatchError::Config(format!(
                        "entry {} ({}) sets both value and value_file",
                        i + 1,
                        entry.path.display()
                    )))
                }
                (None, None) => {
                    return Err(PatchError::Config(format!(
                        "entry {} ({}) needs value or value_file",
                        i + 1,
                        entry.path.display()
                    )))
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Validate, resolve paths and load `value_file`s into a `PatchSet`.
    pub fn resolve(&self) -> std::result::Result<PatchSet, PatchError> {
        self.validate()?;

        let base = self.base_dir();
        let value_base = self
            .manifest_dir()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(self.entries.len());

        for entry in &self.entries {
            let path = join_relative(&base, &entry.path);
            if !seen.insert(lexical_key(&path)) {
                return Err(PatchError::Config(format!(
                    "{} is listed more than once",
                    path.display()
                )));
            }

            let value = match (&entry.value, &entry.value_file) {
                (Some(v), _) => v.clone(),
                (None, Some(file)) => load_value_file(&join_relative(&value_base, file))?,
                (None, None) => {
                    return Err(PatchError::Config(format!(
                        "{} has no value",
                        path.display()
                    )))
                }
            };
            entries.push(PatchEntry::new(path, value));
        }

        Ok(PatchSet::new(self.key.clone(), entries))
    }

    pub fn merge_options(&self, dry_run: bool) -> MergeOptions {
        MergeOptions {
            indent: self.indent,
            policy: self.policy,
            dry_run,
            backup: self.backup,
        }
    }
}

/// `path` without `.` components, for spotting the same target written two ways.
fn lexical_key(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn join_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() || base.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Read a JSON patch value from disk.
pub fn load_value_file(path: &Path) -> std::result::Result<Value, PatchError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        PatchError::Config(format!("cannot read value file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        PatchError::Config(format!("value file {} is not valid JSON: {}", path.display(), e))
    })
}
