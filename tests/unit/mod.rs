//! Unit tests for locale-patch modules
//!
//! These tests drive the public API against temporary locale files.

mod test_config;
mod test_error_paths;
