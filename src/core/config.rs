//! # Configuration Module / 配置模块
//!
//! This module defines the runner configuration (loaded from `OtaRunner.toml`)
//! and the loader for command-set files.
//!
//! 此模块定义运行器配置（从 `OtaRunner.toml` 加载）以及命令集文件的加载器。

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::core::models::TestCommand;

/// Default name of the runner configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "OtaRunner.toml";

/// Settings for the external device command tool.
/// 外部设备命令工具的设置。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ToolConfig {
    /// The program and its leading arguments, split with shell rules.
    /// The IMEI and the command text are appended to these.
    ///
    /// 程序及其前置参数，按 shell 规则拆分。IMEI 和命令文本会追加在其后。
    #[serde(default = "default_tool_command")]
    pub command: String,
    /// Upper bound for a single invocation, in seconds. `0` waits forever.
    /// 单次调用的上限时间（秒）。`0` 表示无限等待。
    #[serde(default = "default_invoke_timeout")]
    pub invoke_timeout_secs: u64,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            command: default_tool_command(),
            invoke_timeout_secs: default_invoke_timeout(),
        }
    }
}

impl ToolConfig {
    pub fn invoke_timeout(&self) -> Option<Duration> {
        (self.invoke_timeout_secs > 0).then(|| Duration::from_secs(self.invoke_timeout_secs))
    }
}

/// Pacing and abort policy for the run loop.
/// 运行循环的节奏与中止策略。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScheduleConfig {
    /// Pause between two consecutive commands, in milliseconds.
    #[serde(default = "default_command_delay_ms")]
    pub command_delay_ms: u64,
    /// Number of `Check_IMEI` outcomes after which the run aborts itself.
    /// `0` disables the automatic abort.
    #[serde(default = "default_imei_abort_threshold")]
    pub imei_abort_threshold: u32,
    /// Whether an abort request cuts the inter-command pause short.
    #[serde(default = "default_true")]
    pub interruptible_delay: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            command_delay_ms: default_command_delay_ms(),
            imei_abort_threshold: default_imei_abort_threshold(),
            interruptible_delay: true,
        }
    }
}

/// Pre-flight reachability check settings.
/// 运行前可达性检查设置。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_probe_url")]
    pub url: String,
    #[serde(default = "default_probe_attempts")]
    pub attempts: u32,
    #[serde(default = "default_probe_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_probe_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_probe_url(),
            attempts: default_probe_attempts(),
            timeout_secs: default_probe_timeout_secs(),
            retry_delay_secs: default_probe_retry_delay_secs(),
        }
    }
}

/// Represents the whole runner configuration, loaded from a TOML file.
/// Every section is optional and falls back to its defaults.
///
/// 代表从 TOML 文件加载的整个运行器配置。每个部分都是可选的，缺省时使用默认值。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RunnerConfig {
    /// The language for the runner's output messages (e.g., "en", "zh-CN").
    /// 运行器输出消息的语言（例如 "en", "zh-CN"）。
    #[serde(default = "default_language")]
    pub language: String,
    /// Append-only lifecycle log / 仅追加的生命周期日志
    #[serde(default = "default_log_file")]
    pub log_file: String,
    #[serde(default)]
    pub tool: ToolConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            log_file: default_log_file(),
            tool: ToolConfig::default(),
            schedule: ScheduleConfig::default(),
            network: NetworkConfig::default(),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_log_file() -> String {
    "ota_test_automation.log".to_string()
}

fn default_tool_command() -> String {
    "java -jar ota-cmdutil-0.0.1-SNAPSHOT.jar".to_string()
}

fn default_invoke_timeout() -> u64 {
    120
}

fn default_command_delay_ms() -> u64 {
    4000
}

fn default_imei_abort_threshold() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

fn default_probe_url() -> String {
    "http://www.google.com".to_string()
}

fn default_probe_attempts() -> u32 {
    3
}

fn default_probe_timeout_secs() -> u64 {
    5
}

fn default_probe_retry_delay_secs() -> u64 {
    1
}

/// Loads and parses the runner configuration from a TOML file.
pub fn load_runner_config(path: &Path) -> Result<RunnerConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// One entry of a command-set file. Spreadsheet-style column names
/// are accepted as aliases.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommandEntry {
    #[serde(alias = "Commands")]
    pub command: String,
    #[serde(default, alias = "Expected Response")]
    pub expected_response: String,
}

/// On-disk layout of a TOML command set: a list of `[[commands]]` tables.
/// TOML 命令集的磁盘布局：`[[commands]]` 表的列表。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommandSet {
    pub commands: Vec<CommandEntry>,
}

impl CommandSet {
    pub fn into_commands(self) -> Vec<TestCommand> {
        self.commands
            .into_iter()
            .enumerate()
            .map(|(i, entry)| TestCommand::new(i + 1, entry.command, entry.expected_response))
            .collect()
    }
}

/// Reads an ordered command set from a `.toml` or `.json` file.
///
/// JSON files may hold either a bare array of entries or an object with a
/// `commands` array. The order of the file is the execution order.
///
/// 从 `.toml` 或 `.json` 文件读取有序的命令集。文件中的顺序即执行顺序。
pub fn load_command_set(path: &Path) -> Result<Vec<TestCommand>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read command file: {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase);

    let set = match extension.as_deref() {
        Some("toml") => toml::from_str::<CommandSet>(&content)
            .with_context(|| format!("Failed to parse command file: {}", path.display()))?,
        Some("json") => parse_json_command_set(&content)
            .with_context(|| format!("Failed to parse command file: {}", path.display()))?,
        _ => bail!(
            "Unsupported command file format (expected .toml or .json): {}",
            path.display()
        ),
    };

    Ok(set.into_commands())
}

fn parse_json_command_set(content: &str) -> Result<CommandSet> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    if value.is_array() {
        let commands: Vec<CommandEntry> = serde_json::from_value(value)?;
        Ok(CommandSet { commands })
    } else {
        Ok(serde_json::from_value(value)?)
    }
}
