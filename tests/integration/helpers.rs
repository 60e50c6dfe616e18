//! Test helpers and utilities for integration tests

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Seed `src/locales/{es,en,ru}.json` under a fresh temp dir.
pub fn workspace_with_locales() -> TempDir {
    let dir = TempDir::new().unwrap();
    let locales = dir.path().join("src/locales");
    fs::create_dir_all(&locales).unwrap();
    fs::write(
        locales.join("es.json"),
        r#"{"nav": {"home": "Inicio"}}"#,
    )
    .unwrap();
    fs::write(locales.join("en.json"), r#"{"nav": {"home": "Home"}}"#).unwrap();
    fs::write(
        locales.join("ru.json"),
        r#"{"nav": {"home": "Главная"}}"#,
    )
    .unwrap();
    dir
}

pub fn locale_path(dir: &TempDir, lang: &str) -> PathBuf {
    dir.path().join("src/locales").join(format!("{}.json", lang))
}

pub fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

/// The binary, sandboxed to `dir` with colors and env overrides cleared.
#[allow(deprecated)]
pub fn locale_patch(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("locale-patch").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("LOCALE_PATCH_MANIFEST")
        .env_remove("LOCALE_PATCH_KEY")
        .env_remove("LOCALE_PATCH_POLICY")
        .env_remove("LOCALE_PATCH_INDENT");
    cmd
}
