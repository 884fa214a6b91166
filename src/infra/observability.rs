//! Structured logging setup.
//!
//! Text output for interactive use, JSON when the container's log collector
//! reads stdout. `RUST_LOG` overrides the default filter.

use std::str::FromStr;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" | "compact" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("Unknown log format: {}", other)),
        }
    }
}

/// Default directive when `RUST_LOG` is not set.
#[must_use]
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "datalab=debug,info" } else { "datalab=info,warn" }
}

/// Installs the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_tracing(format: LogFormat, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .json(),
            )
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("TEXT".parse::<LogFormat>(), Ok(LogFormat::Text));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_default_directive() {
        assert!(default_directive(true).contains("debug"));
        assert!(!default_directive(false).contains("debug"));
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_tracing(LogFormat::Text, false);
        init_tracing(LogFormat::Json, true);
    }
}
