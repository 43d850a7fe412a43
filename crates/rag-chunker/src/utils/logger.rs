use crate::config::{LogFormat, LoggingConfig};
use crate::utils::error::ChunkerError;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub fn init_logger(config: &LoggingConfig) -> Result<(), ChunkerError> {
    // RUST_LOG wins over the configured level
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone());
    let filter = EnvFilter::try_new(&log_level).map_err(|e| ChunkerError::Logging(e.to_string()))?;

    // Optional file sink (daily rotation)
    let file_appender = match &config.directory {
        Some(dir) => Some(
            RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("rag-chunker")
                .filename_suffix("log")
                .build(dir)
                .map_err(|e| ChunkerError::Logging(e.to_string()))?,
        ),
        None => None,
    };

    // stdout is reserved for CLI output, logs go to stderr
    match config.format {
        LogFormat::Json => {
            let file_layer = file_appender.map(|appender| {
                fmt::layer()
                    .json()
                    .with_writer(appender)
                    .with_target(true)
                    .with_level(true)
                    .with_thread_ids(true)
                    .boxed()
            });

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true)
                        .with_thread_ids(true),
                )
                .with(file_layer)
                .try_init()
                .map_err(|e| ChunkerError::Logging(e.to_string()))?;
        }
        LogFormat::Pretty => {
            let file_layer = file_appender.map(|appender| {
                fmt::layer()
                    .with_writer(appender)
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(false) // No colors in file
                    .boxed()
            });

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true)
                        .with_thread_ids(false),
                )
                .with(file_layer)
                .try_init()
                .map_err(|e| ChunkerError::Logging(e.to_string()))?;
        }
    }

    Ok(())
}
