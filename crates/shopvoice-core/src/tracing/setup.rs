//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Filter used when `SHOPVOICE_LOG` is unset or unparseable.
pub const DEFAULT_FILTER: &str = "shopvoice=info";

/// Build the log filter from a directive string, falling back to
/// [`DEFAULT_FILTER`] when it is absent or invalid.
pub fn build_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize the shopvoice tracing/logging system.
///
/// Reads the `SHOPVOICE_LOG` environment variable for per-module log levels.
/// Format: `SHOPVOICE_LOG=shopvoice_storage=debug,shopvoice_core=warn`
///
/// Falls back to `shopvoice=info` if `SHOPVOICE_LOG` is not set or is invalid.
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let directives = std::env::var("SHOPVOICE_LOG").ok();
        let filter = build_filter(directives.as_deref());

        // A host application may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
