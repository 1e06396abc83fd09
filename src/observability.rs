//! Observability utilities.

use crate::types::ObservabilityConfig;
use std::sync::OnceLock;
use tracing::Subscriber;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Build the subscriber described by `config` without installing it.
///
/// Logs go to stderr; stdout carries the MCP protocol. `RUST_LOG` wins over
/// the configured level when set.
pub fn subscriber(config: &ObservabilityConfig) -> Box<dyn Subscriber + Send + Sync> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if config.json_logs {
        Box::new(
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr)),
        )
    } else {
        Box::new(
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact().with_writer(std::io::stderr)),
        )
    }
}

/// Install the global subscriber once for the process.
pub fn init_tracing(config: &ObservabilityConfig) {
    TRACING_INIT.get_or_init(|| {
        if let Err(err) = subscriber(config).try_init() {
            eprintln!("tracing init skipped: {err}");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::subscriber;
    use crate::types::ObservabilityConfig;

    // Scoped subscribers only: the global default belongs to the binary.
    #[test]
    fn subscriber_builds_for_both_formats() {
        for json_logs in [false, true] {
            let config = ObservabilityConfig {
                json_logs,
                ..ObservabilityConfig::default()
            };
            tracing::subscriber::with_default(subscriber(&config), || {
                assert!(tracing::enabled!(tracing::Level::ERROR));
                tracing::error!(json_logs, "subscriber smoke event");
            });
        }
    }
}
