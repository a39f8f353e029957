use crate::stderr_buffer::BufferedStderr;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("telemetry error: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Pick the filter: `--verbose` forces debug, then `RUST_LOG`, then the
/// configured level.
pub fn build_filter(log_level: &str, verbose: bool) -> Result<EnvFilter, TelemetryError> {
    if verbose {
        return Ok(EnvFilter::new("debug"));
    }
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(log_level).map_err(|source| TelemetryError::EnvFilter {
            value: log_level.to_string(),
            source,
        }),
    }
}

/// Install the global subscriber. Output goes through the stderr buffer so
/// lines logged while the TUI owns the terminal show up after it exits.
pub fn init(log_level: &str, verbose: bool) -> Result<(), TelemetryError> {
    let env_filter = build_filter(log_level, verbose)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .with_writer(BufferedStderr)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_ignores_bad_level() {
        assert!(build_filter("not a [valid filter", true).is_ok());
    }

    #[test]
    fn test_invalid_level_reported() {
        // only meaningful when RUST_LOG is unset in the test environment
        if std::env::var_os("RUST_LOG").is_none() {
            let err = build_filter("qbit=loud", false).unwrap_err();
            assert!(err.to_string().contains("qbit=loud"));
        }
    }
}
