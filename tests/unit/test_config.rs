//! Unit tests for the config module
//!
//! Tests cover:
//! - Manifest defaults and TOML parsing
//! - Built-in patch set
//! - Path resolution and value files
//! - Validation failures

use locale_patch::config::{builtin, Manifest, ManifestEntry, ManifestSource};
use locale_patch::errors::PatchError;
use locale_patch::merge::BatchPolicy;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// ============================================================================
// Built-in patch set Tests
// ============================================================================

mod builtin_tests {
    use super::*;

    #[test]
    fn test_builtin_targets_three_locales() {
        let set = Manifest::builtin().resolve().unwrap();
        let paths: Vec<PathBuf> = set.entries.iter().map(|e| e.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("src/locales/es.json"),
                PathBuf::from("src/locales/en.json"),
                PathBuf::from("src/locales/ru.json"),
            ]
        );
        assert_eq!(set.key, "affiliate");
    }

    #[test]
    fn test_builtin_values() {
        assert_eq!(builtin::spanish()["title"], "Programa de Afiliados");
        assert_eq!(builtin::english()["balance"]["pending"], "Pending balance");
        assert_eq!(builtin::russian()["stats"]["clicks"], "Клики по ссылке");
    }

    #[test]
    fn test_builtin_source_display() {
        assert_eq!(ManifestSource::BuiltIn.to_string(), "built-in");
    }
}

// ============================================================================
// Manifest file Tests
// ============================================================================

mod manifest_file_tests {
    use super::*;

    fn write_manifest(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("locale-patch.toml");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(
            &dir,
            r#"
key = "promo"
indent = 2
backup = true

[[entries]]
path = "i18n/de.json"
value = { title = "Partnerprogramm" }
"#,
        );

        let manifest = Manifest::load(path.to_str()).unwrap();

        assert_eq!(manifest.source, ManifestSource::File(path.clone()));
        assert_eq!(manifest.indent, 2);
        assert!(manifest.backup);
        let set = manifest.resolve().unwrap();
        assert_eq!(set.entries[0].path, dir.path().join("i18n/de.json"));
        assert_eq!(set.entries[0].value, json!({"title": "Partnerprogramm"}));
    }

    #[test]
    fn test_locales_dir_overrides_manifest_dir() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(
            &dir,
            r#"
[[entries]]
path = "fr.json"
value = "x"
"#,
        );
        let mut manifest = Manifest::from_file(&path).unwrap();
        manifest.locales_dir = Some(PathBuf::from("/srv/locales"));
        let set = manifest.resolve().unwrap();
        assert_eq!(set.entries[0].path, PathBuf::from("/srv/locales/fr.json"));
    }

    #[test]
    fn test_absolute_entry_path_kept() {
        let mut manifest = Manifest::default();
        manifest
            .entries
            .push(ManifestEntry::inline("/abs/en.json", json!(1)));
        let set = manifest.resolve().unwrap();
        assert_eq!(set.entries[0].path, PathBuf::from("/abs/en.json"));
    }

    #[test]
    fn test_invalid_value_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.json"), "{").unwrap();
        let path = write_manifest(
            &dir,
            r#"
[[entries]]
path = "en.json"
value_file = "broken.json"
"#,
        );
        let manifest = Manifest::from_file(&path).unwrap();
        let err = manifest.resolve().unwrap_err();
        assert!(matches!(err, PatchError::Config(_)));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, "policy = \"sometimes\"\n");
        assert!(Manifest::from_file(&path).is_err());
    }

    #[test]
    fn test_policy_round_trip_through_toml() {
        let mut manifest = Manifest {
            policy: BatchPolicy::KeepGoing,
            ..Manifest::default()
        };
        manifest
            .entries
            .push(ManifestEntry::inline("en.json", json!({"title": "X"})));
        let text = toml::to_string(&manifest).unwrap();
        assert!(text.contains("policy = \"keep-going\""));
        let back: Manifest = toml::from_str(&text).unwrap();
        assert_eq!(back.policy, BatchPolicy::KeepGoing);
        assert_eq!(back.entries, manifest.entries);
    }
}
