//! Structured logging setup.
//!
//! Wraps `tracing-subscriber` so every binary logs the same way: plain text
//! on stderr (stdout is reserved for results), filtered by the `SELCOV_LOG`
//! environment variable or, when that is unset, by a verbosity level.

use std::io;

use tracing_subscriber::EnvFilter;

use crate::warning::color_enabled;

/// Environment variable holding an `EnvFilter` directive, e.g. `selcov=debug`.
pub const LOG_ENV: &str = "SELCOV_LOG";

/// Map a `-v` count to the default filter directive.
#[must_use]
pub const fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Initialize the global logger.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(color_enabled())
        .try_init();
}
