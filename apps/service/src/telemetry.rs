//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "MUTSCOPE_LOG";

/// Target prefix matching every crate of the workspace.
const DEFAULT_FILTER: &str = "mutscope=info";

/// Initialize logging to stderr.
///
/// Reads `MUTSCOPE_LOG` for per-target levels, e.g.
/// `MUTSCOPE_LOG=mutscope=debug,mutscope_remote=trace`.
/// Falls back to `mutscope=info` if unset or invalid.
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing(json: bool) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let registry = tracing_subscriber::registry().with(filter);
        if json {
            registry
                .with(fmt::layer().json().with_writer(std::io::stderr).with_current_span(true))
                .init();
        } else {
            registry
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .init();
        }
    });
}

