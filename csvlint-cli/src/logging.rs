//! Diagnostic logging setup.
//!
//! Reports are written to stdout; logs always go to stderr so the two never
//! mix. `RUST_LOG` overrides the configured filter.

use tracing::Level;
use tracing_subscriber::util::TryInitError;

/// Configuration for the CLI's logging setup.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for dependencies
    pub level: Level,
    /// Log level for the csvlint crates
    pub csvlint_level: Level,
    /// Whether to emit JSON lines instead of plain text
    pub json_format: bool,
    /// Environment filter override
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            csvlint_level: Level::WARN,
            json_format: false,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Sets whether to use JSON output format.
    pub fn with_json_format(mut self, enabled: bool) -> Self {
        self.json_format = enabled;
        self
    }

    /// Builds the environment filter string.
    pub fn env_filter(&self) -> String {
        if let Some(ref filter) = self.env_filter {
            filter.clone()
        } else {
            let crate_level = self.csvlint_level.as_str().to_lowercase();
            format!(
                "{},csvlint_core={crate_level},csvlint_cli={crate_level}",
                self.level.as_str().to_lowercase()
            )
        }
    }
}

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<(), TryInitError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.env_filter()));

    let fmt_layer = if config.json_format {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let config = LoggingConfig::default();
        assert_eq!(
            config.env_filter(),
            "warn,csvlint_core=warn,csvlint_cli=warn"
        );
        assert!(!config.json_format);
    }

    #[test]
    fn test_crate_level_applies_to_both_crates() {
        let config = LoggingConfig {
            level: Level::INFO,
            csvlint_level: Level::DEBUG,
            ..LoggingConfig::default()
        }
        .with_json_format(true);
        assert_eq!(
            config.env_filter(),
            "info,csvlint_core=debug,csvlint_cli=debug"
        );
        assert!(config.json_format);
    }

    #[test]
    fn test_filter_override() {
        let config = LoggingConfig {
            env_filter: Some("csvlint_core=trace".to_string()),
            ..LoggingConfig::default()
        };
        assert_eq!(config.env_filter(), "csvlint_core=trace");
    }
}
