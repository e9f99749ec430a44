//! # Lifecycle Logging Module / 生命周期日志模块
//!
//! Installs the process-wide `tracing` subscriber that appends run lifecycle
//! events to a plain-text log file.
//!
//! 安装进程级 `tracing` 订阅器，将运行生命周期事件追加到纯文本日志文件。

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable that overrides the log filter (e.g. `OTA_LOG=debug`).
pub const LOG_ENV: &str = "OTA_LOG";

/// Opens `log_file` in append mode and routes all events at or above the
/// configured level into it.
///
/// Fails if the file cannot be opened or if a global subscriber is
/// already installed.
pub fn init(log_file: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file: {}", log_file.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .context("Failed to install the log subscriber")?;

    Ok(())
}
