//! Telemetry & Logging
//!
//! Structured logging for locale merges.
//! - Quiet by default so confirmations stay the only stdout output
//! - `RUST_LOG` or `--verbose` turns on the stderr subscriber
//! - Paths and error text are escaped before they reach a log line

use std::sync::Once;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used by `--verbose` when `RUST_LOG` is not set.
pub const VERBOSE_FILTER: &str = "info";

static INIT: Once = Once::new();

/// Sanitize a string for safe log output by escaping control characters.
/// Locale paths come from manifests, so a crafted name must not forge log lines.
pub fn sanitize_for_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x1b' => out.push_str("\\e"),
            '\x00' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            _ => out.push(c),
        }
    }
    out
}

/// Pick the filter directive: `RUST_LOG` wins, then `--verbose`, else none.
pub fn resolve_filter(rust_log: Option<&str>, verbose: bool) -> Option<String> {
    match rust_log {
        Some(f) if !f.trim().is_empty() => Some(f.to_string()),
        _ if verbose => Some(VERBOSE_FILTER.to_string()),
        _ => None,
    }
}

/// Initialize global tracing subscriber.
/// Without `RUST_LOG` and without `verbose`, nothing is installed.
pub fn init_tracing(verbose: bool) {
    let rust_log = std::env::var("RUST_LOG").ok();
    if let Some(filter) = resolve_filter(rust_log.as_deref(), verbose) {
        init_tracing_with_filter(&filter);
    }
}

/// Initialize with custom filter string
pub fn init_tracing_with_filter(filter: &str) {
    INIT.call_once(|| {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(false)
            .with_line_number(false)
            .with_level(true)
            .compact()
            .with_writer(std::io::stderr);

        let filter_layer = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));

        let _ = tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .try_init();
    });
}

/// Initialize tracing for tests
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
