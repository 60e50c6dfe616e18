use std::path::{Path, PathBuf};
use thiserror::Error;

/// The central error type for locale-patch.
///
/// Merge failures carry the offending file so the operator can tell which
/// entry of a batch broke; configuration problems are reported before any
/// locale file is touched.
#[derive(Error, Debug)]
pub enum PatchError {
    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Carries the exit code of the first failing entry
    #[error("{failed} of {total} locale file(s) failed")]
    Batch {
        failed: usize,
        total: usize,
        exit_code: u8,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure while upserting a key into a single locale document.
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Locale file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in {} at line {line}, column {column}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Invalid locale document {}: {message}", path.display())]
    Validation { path: PathBuf, message: String },

    #[error("Failed to {operation} {}: {source}", path.display())]
    Io {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl MergeError {
    /// Classify an I/O error raised while reading `path`.
    pub(crate) fn from_read(path: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => MergeError::NotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::InvalidData => MergeError::Parse {
                path: path.to_path_buf(),
                line: 0,
                column: 0,
                message: "file is not valid UTF-8".to_string(),
            },
            _ => MergeError::Io {
                path: path.to_path_buf(),
                operation: "read",
                source,
            },
        }
    }

    pub(crate) fn from_json(path: &Path, err: &serde_json::Error) -> Self {
        MergeError::Parse {
            path: path.to_path_buf(),
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }

    pub(crate) fn io(path: &Path, operation: &'static str, source: std::io::Error) -> Self {
        MergeError::Io {
            path: path.to_path_buf(),
            operation,
            source,
        }
    }

    /// Path of the locale file this error refers to.
    pub fn path(&self) -> &Path {
        match self {
            MergeError::NotFound { path }
            | MergeError::Parse { path, .. }
            | MergeError::Validation { path, .. }
            | MergeError::Io { path, .. } => path,
        }
    }

    /// Short machine-readable label used in JSON summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            MergeError::NotFound { .. } => "not_found",
            MergeError::Parse { .. } => "parse",
            MergeError::Validation { .. } => "validation",
            MergeError::Io { .. } => "io",
        }
    }
}

pub type Result<T> = std::result::Result<T, PatchError>;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;
pub const EXIT_NOT_FOUND: u8 = 3;
pub const EXIT_INVALID_DOCUMENT: u8 = 4;

/// Exit code for a single merge failure.
pub fn merge_exit_code(e: &MergeError) -> u8 {
    match e {
        MergeError::NotFound { .. } => EXIT_NOT_FOUND,
        MergeError::Parse { .. } | MergeError::Validation { .. } => EXIT_INVALID_DOCUMENT,
        MergeError::Io { .. } => EXIT_ERROR,
    }
}

/// Determine the appropriate process exit code for an error.
pub fn get_exit_code(e: &anyhow::Error) -> u8 {
    if let Some(patch_err) = e.downcast_ref::<PatchError>() {
        return match patch_err {
            PatchError::Merge(m) => merge_exit_code(m),
            PatchError::Config(_) => EXIT_CONFIG_ERROR,
            PatchError::Batch { exit_code, .. } => *exit_code,
            PatchError::Other(_) => EXIT_ERROR,
        };
    }

    if let Some(merge_err) = e.downcast_ref::<MergeError>() {
        return merge_exit_code(merge_err);
    }

    // anyhow context wrappers hide the concrete type from downcast_ref
    for cause in e.chain() {
        if let Some(merge_err) = cause.downcast_ref::<MergeError>() {
            return merge_exit_code(merge_err);
        }
        if let Some(PatchError::Config(_)) = cause.downcast_ref::<PatchError>() {
            return EXIT_CONFIG_ERROR;
        }
    }

    EXIT_ERROR
}
