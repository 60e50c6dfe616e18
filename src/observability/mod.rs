//! Observability module
//!
//! Logging setup shared by the library and the CLI.

pub mod telemetry;
