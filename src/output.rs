//! Output Control Module
//!
//! Console rendering for merge runs, driven by CLI flags:
//! - `quiet`: only failures are printed
//! - `output_format`: human text lines or one JSON summary object
//!
//! Confirmation lines go to stdout, failures to stderr.

use colored::*;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::merge::{EntryReport, EntryStatus, MergeOutcome, MergeReport, PatchSet};

/// Global output mode flags (set once at startup)
static QUIET_MODE: AtomicBool = AtomicBool::new(false);
static JSON_MODE: AtomicBool = AtomicBool::new(false);

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

/// Initialize output modes from CLI flags
pub fn init(quiet: bool, format: OutputFormat) {
    QUIET_MODE.store(quiet, Ordering::SeqCst);
    JSON_MODE.store(format == OutputFormat::Json, Ordering::SeqCst);
}

#[inline]
pub fn is_quiet() -> bool {
    QUIET_MODE.load(Ordering::SeqCst)
}

#[inline]
pub fn is_json() -> bool {
    JSON_MODE.load(Ordering::SeqCst)
}

/// One text line for an entry, e.g. `Updated es.json`.
pub fn entry_line(entry: &EntryReport) -> String {
    let name = entry.file_name();
    match &entry.status {
        EntryStatus::Done(MergeOutcome::Updated) => {
            format!("{} {}", "Updated".green(), name)
        }
        EntryStatus::Done(MergeOutcome::Unchanged) => {
            format!("{} {}", "Unchanged".dimmed(), name)
        }
        EntryStatus::Done(MergeOutcome::WouldUpdate) => {
            format!("{} {}", "Would update".yellow(), name)
        }
        EntryStatus::Failed(e) => format!("{} {}: {}", "Failed".red().bold(), name, e),
        EntryStatus::Skipped => format!("{} {}", "Skipped".dimmed(), name),
    }
}

/// Print an entry as soon as it settles (text mode only).
pub fn print_entry(entry: &EntryReport) {
    if is_json() {
        return;
    }
    if entry.is_failure() {
        eprintln!("{}", entry_line(entry));
    } else if !is_quiet() {
        println!("{}", entry_line(entry));
    }
}

/// Final summary line for text mode.
pub fn summary_line(report: &MergeReport) -> String {
    let mut parts = vec![format!(
        "{} {}",
        report.updated(),
        if report.dry_run { "to update" } else { "updated" }
    )];
    if report.unchanged() > 0 {
        parts.push(format!("{} unchanged", report.unchanged()));
    }
    if report.failed() > 0 {
        parts.push(format!("{} failed", report.failed()).red().to_string());
    }
    if report.skipped() > 0 {
        parts.push(format!("{} skipped", report.skipped()));
    }
    format!("'{}': {}", report.key, parts.join(", "))
}

#[derive(Debug, Serialize)]
pub struct EntrySummary {
    pub file: String,
    pub path: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub key: String,
    pub dry_run: bool,
    pub entries: Vec<EntrySummary>,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl From<&MergeReport> for RunSummary {
    fn from(report: &MergeReport) -> Self {
        let entries = report
            .entries
            .iter()
            .map(|e| {
                let (status, error_kind, error) = match &e.status {
                    EntryStatus::Done(MergeOutcome::Updated) => ("updated", None, None),
                    EntryStatus::Done(MergeOutcome::Unchanged) => ("unchanged", None, None),
                    EntryStatus::Done(MergeOutcome::WouldUpdate) => ("would_update", None, None),
                    EntryStatus::Failed(err) => ("failed", Some(err.kind()), Some(err.to_string())),
                    EntryStatus::Skipped => ("skipped", None, None),
                };
                EntrySummary {
                    file: e.file_name(),
                    path: e.path.display().to_string(),
                    status,
                    error_kind,
                    error,
                }
            })
            .collect();

        Self {
            key: report.key.clone(),
            dry_run: report.dry_run,
            entries,
            updated: report.updated(),
            unchanged: report.unchanged(),
            failed: report.failed(),
            skipped: report.skipped(),
        }
    }
}

/// Print the end-of-run summary in the active format.
pub fn print_report(report: &MergeReport) {
    if is_json() {
        match serde_json::to_string_pretty(&RunSummary::from(report)) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("{} failed to render summary: {}", "Error:".red(), e),
        }
    } else if !is_quiet() {
        println!("{}", summary_line(report));
    }
}

/// Lines for `plan`: one per entry with whether the target exists.
pub fn plan_lines(set: &PatchSet, source: &str) -> Vec<String> {
    let mut lines = vec![format!(
        "Key '{}' from {} ({} file(s))",
        set.key,
        source,
        set.len()
    )];
    for entry in &set.entries {
        let marker = if entry.path.is_file() {
            "ok".green()
        } else {
            "missing".red()
        };
        lines.push(format!("  [{}] {}", marker, entry.path.display()));
    }
    lines
}

#[derive(Debug, Serialize)]
struct PlanEntry {
    path: String,
    exists: bool,
}

/// Print the plan in the active format.
pub fn print_plan(set: &PatchSet, source: &str) {
    if is_json() {
        let entries: Vec<PlanEntry> = set
            .entries
            .iter()
            .map(|e| PlanEntry {
                path: e.path.display().to_string(),
                exists: e.path.is_file(),
            })
            .collect();
        let plan = serde_json::json!({
            "key": set.key,
            "source": source,
            "entries": entries,
        });
        println!("{}", plan);
    } else {
        for line in plan_lines(set, source) {
            println!("{}", line);
        }
    }
}
