//! Diagnostic logging setup.
//!
//! Structured events go to stderr through `tracing-subscriber`. `RUST_LOG`
//! wins over the configured level so a single run can be turned up without
//! editing the config file.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
}

impl LoggingConfig {
    pub fn new(configured: Option<String>) -> Self {
        let level = std::env::var("RUST_LOG")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or(configured)
            .unwrap_or_else(|| DEFAULT_LEVEL.to_string());
        Self { level }
    }
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_is_harmless() {
        let config = LoggingConfig {
            level: "debug".to_string(),
        };
        init_logging(&config);
        init_logging(&config);
        tracing::debug!("still alive");
    }

    #[test]
    fn invalid_level_falls_back() {
        let config = LoggingConfig {
            level: "=[not a filter".to_string(),
        };
        init_logging(&config);
    }
}
