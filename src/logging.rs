//! Tracing subscriber setup.
//!
//! Log level resolution order: `DISSENT_LOG_LEVEL` environment variable,
//! then the `[logging]` config section, then "info". Output goes to
//! stderr so panel responses on stdout stay clean for piping.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Initialize the global tracing subscriber.
///
/// Safe to call once per process; subsequent calls are ignored so tests
/// that each set up logging do not panic.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_env("DISSENT_LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match config.format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    // Already initialized (e.g. by a test harness).
    let _ = result;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_reentrant() {
        let config = LoggingConfig::default();
        init(&config);
        init(&config);
    }
}
