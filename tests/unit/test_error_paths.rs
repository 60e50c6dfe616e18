//! Error path and edge case tests
//!
//! These tests focus on failures that must leave locale files untouched:
//! - Missing files
//! - Malformed or non-object JSON
//! - Invalid keys
//! - Unwritable locale directories
//! - Exit code mapping

use locale_patch::errors::{
    get_exit_code, MergeError, PatchError, EXIT_CONFIG_ERROR, EXIT_INVALID_DOCUMENT,
    EXIT_NOT_FOUND,
};
use locale_patch::merge::LocaleMerger;
use serde_json::json;
use std::fs;
use tempfile::tempdir;

mod merge_error_tests {
    use super::*;

    #[test]
    fn test_missing_file_is_not_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en.json");

        let err = LocaleMerger::default()
            .merge_one(&path, "affiliate", json!({"title": "X"}))
            .unwrap_err();

        assert!(matches!(err, MergeError::NotFound { .. }));
        assert_eq!(err.path(), path.as_path());
        assert!(!path.exists());
    }

    #[test]
    fn test_truncated_json_left_unmodified() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("es.json");
        let truncated = "{\n    \"nav\": {\n        \"home\": \"Ini";
        fs::write(&path, truncated).unwrap();

        let err = LocaleMerger::default()
            .merge_one(&path, "affiliate", json!({}))
            .unwrap_err();

        match &err {
            MergeError::Parse { line, .. } => assert!(*line >= 3),
            other => panic!("expected Parse, got {other:?}"),
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), truncated);
    }

    #[test]
    fn test_empty_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en.json");
        fs::write(&path, "").unwrap();
        let err = LocaleMerger::default()
            .merge_one(&path, "affiliate", json!({}))
            .unwrap_err();
        assert!(matches!(err, MergeError::Parse { .. }));
    }

    #[test]
    fn test_string_root_is_validation_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en.json");
        fs::write(&path, "\"just a string\"").unwrap();

        let err = LocaleMerger::default()
            .merge_one(&path, "affiliate", json!({}))
            .unwrap_err();

        assert!(matches!(err, MergeError::Validation { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "\"just a string\"");
    }

    #[test]
    fn test_directory_instead_of_file() {
        let dir = tempdir().unwrap();
        let err = LocaleMerger::default()
            .merge_one(dir.path(), "affiliate", json!({}))
            .unwrap_err();
        assert!(!matches!(err, MergeError::NotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_failure_is_io_and_leaves_file_intact() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let locales = dir.path().join("locales");
        fs::create_dir(&locales).unwrap();
        let path = locales.join("en.json");
        let original = "{\n    \"a\": 1\n}";
        fs::write(&path, original).unwrap();
        fs::set_permissions(&locales, fs::Permissions::from_mode(0o555)).unwrap();

        // privileged users ignore directory modes
        if fs::write(locales.join("writable"), "").is_ok() {
            fs::set_permissions(&locales, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = LocaleMerger::default().merge_one(&path, "affiliate", json!({"title": "X"}));
        let leftovers: Vec<_> = fs::read_dir(&locales)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        fs::set_permissions(&locales, fs::Permissions::from_mode(0o755)).unwrap();

        let err = result.unwrap_err();
        assert!(matches!(err, MergeError::Io { .. }));
        assert_eq!(err.kind(), "io");
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_empty_key_checked_before_read() {
        let dir = tempdir().unwrap();
        let err = LocaleMerger::default()
            .merge_one(dir.path().join("missing.json"), "", json!({}))
            .unwrap_err();
        assert!(matches!(err, MergeError::Validation { .. }));
    }
}

mod exit_code_tests {
    use super::*;

    #[test]
    fn test_codes_by_kind() {
        let not_found: anyhow::Error = MergeError::NotFound {
            path: "en.json".into(),
        }
        .into();
        assert_eq!(get_exit_code(&not_found), EXIT_NOT_FOUND);

        let parse: anyhow::Error = MergeError::Parse {
            path: "en.json".into(),
            line: 1,
            column: 1,
            message: "EOF".to_string(),
        }
        .into();
        assert_eq!(get_exit_code(&parse), EXIT_INVALID_DOCUMENT);

        let config: anyhow::Error = PatchError::Config("bad".to_string()).into();
        assert_eq!(get_exit_code(&config.context("loading manifest")), EXIT_CONFIG_ERROR);
    }
}
