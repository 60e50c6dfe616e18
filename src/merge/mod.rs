//! Locale Merging
//!
//! Upserts one top-level key into a list of JSON locale files.
//! - `merge_one`: load, replace `document[key]`, persist atomically
//! - `merge_all`: run a `PatchSet` in order under a `BatchPolicy`
//!
//! Entries target independent files, so order only affects reporting and,
//! under fail-fast, which entries are skipped after a failure.

pub mod document;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, info_span};

use crate::errors::MergeError;
use crate::observability::telemetry::sanitize_for_log;
pub use document::{LocaleDocument, DEFAULT_INDENT};

/// Top-level key written by the built-in patch set.
pub const DEFAULT_KEY: &str = "affiliate";

/// What to do with the remaining entries once one has failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BatchPolicy {
    /// Stop at the first failure; later entries are skipped
    #[default]
    FailFast,
    /// Process every entry and report all failures at the end
    KeepGoing,
}

impl std::fmt::Display for BatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchPolicy::FailFast => write!(f, "fail-fast"),
            BatchPolicy::KeepGoing => write!(f, "keep-going"),
        }
    }
}

impl std::str::FromStr for BatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "fail-fast" | "failfast" => Ok(BatchPolicy::FailFast),
            "keep-going" | "keepgoing" => Ok(BatchPolicy::KeepGoing),
            other => Err(format!(
                "unknown batch policy '{}', expected fail-fast or keep-going",
                other
            )),
        }
    }
}

/// One target file and the value to store under the patch key.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchEntry {
    pub path: PathBuf,
    pub value: Value,
}

impl PatchEntry {
    pub fn new(path: impl Into<PathBuf>, value: Value) -> Self {
        Self {
            path: path.into(),
            value,
        }
    }

    /// Base name used in confirmations, e.g. `es.json`.
    pub fn display_name(&self) -> String {
        display_name(&self.path)
    }
}

/// The key name plus the ordered entries of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchSet {
    pub key: String,
    pub entries: Vec<PatchEntry>,
}

impl PatchSet {
    pub fn new(key: impl Into<String>, entries: Vec<PatchEntry>) -> Self {
        Self {
            key: key.into(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Knobs that change how files are written, not what is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    pub indent: usize,
    pub policy: BatchPolicy,
    pub dry_run: bool,
    pub backup: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            policy: BatchPolicy::FailFast,
            dry_run: false,
            backup: false,
        }
    }
}

/// Result of a successful `merge_one`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeOutcome {
    /// File rewritten with the new value
    Updated,
    /// Rendered output equals the current file; nothing written
    Unchanged,
    /// Dry run: the file would have been rewritten
    WouldUpdate,
}

impl std::fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeOutcome::Updated => write!(f, "updated"),
            MergeOutcome::Unchanged => write!(f, "unchanged"),
            MergeOutcome::WouldUpdate => write!(f, "would update"),
        }
    }
}

/// Per-entry status inside a `MergeReport`.
#[derive(Debug)]
pub enum EntryStatus {
    Done(MergeOutcome),
    Failed(MergeError),
    /// Not attempted because an earlier entry failed under fail-fast
    Skipped,
}

#[derive(Debug)]
pub struct EntryReport {
    pub path: PathBuf,
    pub status: EntryStatus,
}

impl EntryReport {
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, EntryStatus::Failed(_))
    }
}

/// Everything that happened during one `merge_all`.
#[derive(Debug)]
pub struct MergeReport {
    pub key: String,
    pub dry_run: bool,
    pub entries: Vec<EntryReport>,
}

impl MergeReport {
    fn count(&self, pred: impl Fn(&EntryStatus) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.status)).count()
    }

    pub fn updated(&self) -> usize {
        self.count(|s| {
            matches!(
                s,
                EntryStatus::Done(MergeOutcome::Updated | MergeOutcome::WouldUpdate)
            )
        })
    }

    pub fn unchanged(&self) -> usize {
        self.count(|s| matches!(s, EntryStatus::Done(MergeOutcome::Unchanged)))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, EntryStatus::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, EntryStatus::Skipped))
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &MergeError> {
        self.entries.iter().filter_map(|e| match &e.status {
            EntryStatus::Failed(err) => Some(err),
            _ => None,
        })
    }
}

/// Applies fixed-key upserts to locale files.
#[derive(Debug, Clone, Default)]
pub struct LocaleMerger {
    options: MergeOptions,
}

impl LocaleMerger {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Set `path[key] = value` and persist the whole document.
    ///
    /// The file is only written after it has been fully parsed and the new
    /// content rendered. Running twice with the same value yields
    /// `Unchanged` the second time.
    pub fn merge_one(
        &self,
        path: impl AsRef<Path>,
        key: &str,
        value: Value,
    ) -> Result<MergeOutcome, MergeError> {
        let path = path.as_ref();
        if key.is_empty() {
            return Err(MergeError::Validation {
                path: path.to_path_buf(),
                message: "patch key must not be empty".to_string(),
            });
        }

        let mut doc = LocaleDocument::load(path)?;
        let previous = doc.upsert(key, value)?;
        debug!(
            file = %sanitize_for_log(&path.display().to_string()),
            replaced = previous.is_some(),
            "Key staged"
        );

        let rendered = doc.render(self.options.indent)?;
        if doc.is_unchanged(&rendered) {
            return Ok(MergeOutcome::Unchanged);
        }
        if self.options.dry_run {
            return Ok(MergeOutcome::WouldUpdate);
        }

        if self.options.backup {
            let backup = document::write_backup(path)?;
            debug!(backup = %sanitize_for_log(&backup.display().to_string()), "Backup written");
        }
        document::write_atomic(path, rendered.as_bytes())?;
        Ok(MergeOutcome::Updated)
    }

    /// Run every entry of `set` in order.
    pub fn merge_all(&self, set: &PatchSet) -> MergeReport {
        self.merge_all_with(set, |_| {})
    }

    /// Like `merge_all`, calling `on_entry` as soon as each entry settles so
    /// confirmations appear in processing order.
    pub fn merge_all_with<F>(&self, set: &PatchSet, mut on_entry: F) -> MergeReport
    where
        F: FnMut(&EntryReport),
    {
        let mut entries = Vec::with_capacity(set.len());
        let mut halted = false;

        for entry in &set.entries {
            let report = if halted {
                EntryReport {
                    path: entry.path.clone(),
                    status: EntryStatus::Skipped,
                }
            } else {
                let status = self.run_entry(&set.key, entry);
                if matches!(status, EntryStatus::Failed(_))
                    && self.options.policy == BatchPolicy::FailFast
                {
                    halted = true;
                }
                EntryReport {
                    path: entry.path.clone(),
                    status,
                }
            };
            on_entry(&report);
            entries.push(report);
        }

        let report = MergeReport {
            key: set.key.clone(),
            dry_run: self.options.dry_run,
            entries,
        };
        info!(
            key = %report.key,
            updated = report.updated(),
            unchanged = report.unchanged(),
            failed = report.failed(),
            skipped = report.skipped(),
            "Patch set finished"
        );
        report
    }

    fn run_entry(&self, key: &str, entry: &PatchEntry) -> EntryStatus {
        let file = sanitize_for_log(&entry.display_name());
        let span = info_span!(
            "locale.merge",
            file = file.as_str(),
            outcome = tracing::field::Empty,
        );
        let _enter = span.enter();

        match self.merge_one(&entry.path, key, entry.value.clone()) {
            Ok(outcome) => {
                span.record("outcome", outcome.to_string().as_str());
                info!("Locale file {}", outcome);
                EntryStatus::Done(outcome)
            }
            Err(e) => {
                span.record("outcome", "failed");
                error!(error = %sanitize_for_log(&e.to_string()), "Locale merge failed");
                EntryStatus::Failed(e)
            }
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
