//! locale-patch - keep JSON locale files in step
//!
//! Upserts one top-level key (the `affiliate` block by default) into a set of
//! JSON translation files while leaving every other namespace untouched.
//!
//! - **Merge**: parse fully, replace one key, persist via temp file + rename
//! - **Manifest**: TOML list of target files and values, or the built-in set
//! - **Batch policy**: fail-fast or keep-going with an aggregate summary
//!
//! # Quick Start
//!
//! ```ignore
//! use locale_patch::config::Manifest;
//! use locale_patch::merge::LocaleMerger;
//!
//! let manifest = Manifest::load(None)?;
//! let set = manifest.resolve()?;
//! let report = LocaleMerger::new(manifest.merge_options(false)).merge_all(&set);
//! assert!(report.is_success());
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod merge;
pub mod observability;
pub mod output;

pub use config::Manifest;
pub use errors::{MergeError, PatchError};
pub use merge::{LocaleDocument, LocaleMerger, MergeOptions, MergeOutcome, PatchEntry, PatchSet};
