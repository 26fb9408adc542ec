//! Tracing setup for binaries built on hsmkit.
//!
//! The library itself only emits `tracing` events. Programs call [`init`]
//! once at startup to print them to stderr, leaving stdout for command
//! output.

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `HSMKIT_LOG=debug`.
pub const LOG_ENV: &str = "HSMKIT_LOG";

const DEFAULT_FILTER: &str = "warn";

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Install a stderr fmt subscriber filtered by [`LOG_ENV`].
///
/// Safe to call more than once; an already installed global subscriber is
/// left in place.
pub fn init() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let result = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init();

        if result.is_err() {
            tracing::debug!("global tracing subscriber already initialized");
        }
    });
}
