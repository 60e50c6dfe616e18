//! Integration tests for the locale-patch binary
//!
//! Every test runs inside its own temporary working directory with a fake
//! HOME, so no manifest outside the sandbox can be picked up.

mod helpers;

pub use helpers::*;
