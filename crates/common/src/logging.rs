//! Logging and tracing initialization.

use std::fs::OpenOptions;
use std::sync::Mutex;

use crate::config::LoggingConfig;
use crate::error::VidpromptResult;

/// Initialize the tracing subscriber from the logging configuration.
///
/// Output goes to stderr, or is appended to `config.file` when set (with
/// ANSI colors disabled). `RUST_LOG` overrides the configured level.
/// Repeated initialization is a no-op.
pub fn init_logging(config: &LoggingConfig) -> VidpromptResult<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let writer = Mutex::new(file);
            if config.json {
                let subscriber = fmt::Subscriber::builder()
                    .with_env_filter(filter)
                    .json()
                    .with_writer(writer)
                    .finish();
                tracing::subscriber::set_global_default(subscriber).ok();
            } else {
                let subscriber = fmt::Subscriber::builder()
                    .with_env_filter(filter)
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(writer)
                    .finish();
                tracing::subscriber::set_global_default(subscriber).ok();
            }
        }
        None => {
            if config.json {
                let subscriber = fmt::Subscriber::builder()
                    .with_env_filter(filter)
                    .json()
                    .finish();
                tracing::subscriber::set_global_default(subscriber).ok();
            } else {
                let subscriber = fmt::Subscriber::builder()
                    .with_env_filter(filter)
                    .with_target(true)
                    .finish();
                tracing::subscriber::set_global_default(subscriber).ok();
            }
        }
    }

    Ok(())
}

/// Initialize logging with defaults (useful for tests and quick scripts).
pub fn init_default_logging() {
    let _ = init_logging(&LoggingConfig::default());
}
