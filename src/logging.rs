//! Tracing subscriber setup.
//!
//! Console output is text or JSON depending on `logging.format`. Warnings and
//! errors are additionally appended to `logging.error_log`.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::config::{LogFormat, LoggingConfig};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to open error log {path}: {source}")]
    ErrorLog {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to install tracing subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global subscriber using `filter` (an `EnvFilter` directive string).
pub fn init_tracing(config: &LoggingConfig, filter: &str) -> Result<(), LoggingError> {
    let error_log = open_error_log(&config.error_log)?;

    let error_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(error_log))
        .with_filter(LevelFilter::WARN);

    let registry = tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(error_layer);

    match config.format {
        LogFormat::Text => registry.with(fmt::layer()).try_init()?,
        LogFormat::Json => registry.with(fmt::layer().json()).try_init()?,
    }

    Ok(())
}

/// Open the error log for appending, creating parent directories as needed.
fn open_error_log(path: &str) -> Result<File, LoggingError> {
    let to_err = |source| LoggingError::ErrorLog {
        path: path.to_string(),
        source,
    };

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(to_err)?;
        }
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(to_err)
}
