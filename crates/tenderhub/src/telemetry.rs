use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(
                    f,
                    "invalid log level/filter '{}': unable to build EnvFilter",
                    value
                )
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Crates whose events follow the configured level.
const MARKETPLACE_TARGETS: [&str; 2] = ["tenderhub", "tenderhub_api"];

/// Dependencies stay at this level unless the configured one is quieter.
const DEPENDENCY_LEVEL: &str = "warn";

/// Expand a bare level such as `debug` into per-target directives. Anything
/// that already names targets is used verbatim.
pub fn default_directives(log_level: &str) -> String {
    let level = log_level.trim();
    if level.contains(|c| c == '=' || c == ',') {
        return level.to_string();
    }

    let dependencies = match level.to_ascii_lowercase().as_str() {
        "error" | "off" => level,
        _ => DEPENDENCY_LEVEL,
    };
    let mut directives = dependencies.to_string();
    for target in MARKETPLACE_TARGETS {
        directives.push_str(&format!(",{target}={level}"));
    }
    directives
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directives(&config.log_level)).map_err(|source| {
            TelemetryError::EnvFilter {
                value: config.log_level.clone(),
                source,
            }
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_levels_apply_to_marketplace_targets() {
        assert_eq!(
            default_directives("debug"),
            "warn,tenderhub=debug,tenderhub_api=debug"
        );
        assert_eq!(
            default_directives(" info "),
            "warn,tenderhub=info,tenderhub_api=info"
        );
        assert_eq!(
            default_directives("error"),
            "error,tenderhub=error,tenderhub_api=error"
        );
    }

    #[test]
    fn explicit_directives_pass_through() {
        assert_eq!(
            default_directives("tenderhub=trace,axum=info"),
            "tenderhub=trace,axum=info"
        );
        assert!(EnvFilter::try_new(default_directives("trace")).is_ok());
    }

    #[test]
    fn rejects_malformed_filters() {
        std::env::remove_var("RUST_LOG");
        let config = TelemetryConfig {
            log_level: "tenderhub=verbose".to_string(),
        };
        match init(&config) {
            Err(TelemetryError::EnvFilter { value, .. }) => assert_eq!(value, config.log_level),
            other => panic!("expected env filter error, got {other:?}"),
        }
    }
}
