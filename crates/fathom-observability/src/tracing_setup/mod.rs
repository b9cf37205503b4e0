//! Tracing setup: structured logging with an env-controlled filter.

pub mod events;

use fathom_core::config::ObservabilityConfig;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "FATHOM_LOG";

/// Initialize the global tracing subscriber.
///
/// `FATHOM_LOG` takes precedence over `config.log_level`. Output goes to
/// stderr so stdout stays clean for answers. Calling this twice is a no-op.
pub fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let result = if config.json_logs {
        builder
            .with_file(true)
            .with_line_number(true)
            .json()
            .try_init()
    } else {
        builder.compact().try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Initialize tracing with a custom filter string (for testing or embedding).
pub fn init_tracing_with_filter(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true)
        .with_test_writer()
        .try_init();
}
