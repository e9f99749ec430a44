//! # File System Operations Module / 文件系统操作模块
//!
//! This module resolves where a run's artifacts are written and how they
//! are named.
//!
//! 此模块确定一次运行的产物写入位置及其命名方式。

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::models::Imei;

/// Timestamp format embedded in artifact file names.
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// The two files a run produces.
/// 一次运行生成的两个文件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    /// Directory both artifacts live in / 两个产物所在的目录
    pub folder: PathBuf,
    /// Result table with the embedded summary chart / 带嵌入摘要图表的结果表
    pub report: PathBuf,
    /// Per-command invocation transcript / 每条命令的调用记录
    pub transcript: PathBuf,
}

impl ReportPaths {
    /// Names the artifacts `<imei>_OTA_Cmd_TestResult_<ts>.html` and
    /// `<imei>_OTA_Cmd_Test_Logs_<ts>.txt` inside `folder`.
    pub fn new(folder: &Path, imei: &Imei, started_at: &DateTime<Local>) -> Self {
        let stamp = started_at.format(OUTPUT_TIMESTAMP_FORMAT);
        Self {
            folder: folder.to_path_buf(),
            report: folder.join(format!("{imei}_OTA_Cmd_TestResult_{stamp}.html")),
            transcript: folder.join(format!("{imei}_OTA_Cmd_Test_Logs_{stamp}.txt")),
        }
    }

    /// Places the artifacts next to the command-set file they were produced from.
    pub fn beside(command_file: &Path, imei: &Imei, started_at: &DateTime<Local>) -> Self {
        Self::new(&output_folder(command_file), imei, started_at)
    }
}

/// The directory that contains `command_file`, or `.` for a bare file name.
pub fn output_folder(command_file: &Path) -> PathBuf {
    match command_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Creates (or truncates) a file, creating its parent directory if needed.
pub fn create_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))
}

/// Gets the absolute path from a potentially relative path.
///
/// # Returns
/// Canonicalized absolute path, or an error if the path doesn't exist
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).with_context(|| format!("Failed to resolve path: {}", path.display()))
}
