use std::path::PathBuf;

use color_eyre::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config;

lazy_static::lazy_static! {
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

/// Default log file location.
pub fn default_log_path() -> PathBuf {
    config::get_data_dir().join(LOG_FILE.as_str())
}

/// Initialize logging with custom path and/or level.
///
/// The CLI level wins over `RUST_LOG`; without either the filter is WARN.
pub fn init_with(custom_log_path: Option<PathBuf>, level: Option<tracing::Level>) -> Result<()> {
    let log_path = custom_log_path.unwrap_or_else(default_log_path);
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    // open once up front so a bad path fails here instead of inside the writer
    std::fs::OpenOptions::new().create(true).append(true).open(&log_path)?;

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.unwrap_or(tracing::Level::WARN).into())
        .from_env_lossy();

    let writer_path = log_path.clone();
    let file_subscriber = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(move || -> Box<dyn std::io::Write> {
            match std::fs::OpenOptions::new().create(true).append(true).open(&writer_path) {
                Ok(file) => Box::new(file),
                Err(_) => Box::new(std::io::sink()),
            }
        })
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .try_init()?;

    tracing::debug!(path = %log_path.display(), "logging initialized");
    Ok(())
}
