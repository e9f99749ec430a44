//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures used throughout the runner:
//! test commands, normalized responses, outcomes, result rows, counters and
//! the per-run context.
//!
//! 此模块定义了整个运行器中使用的核心数据结构：
//! 测试命令、规范化响应、结果类别、结果行、计数器和每次运行的上下文。

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Number of digits in a valid IMEI.
pub const IMEI_LEN: usize = 15;

/// Errors raised while validating run inputs, before anything is executed.
/// 在执行任何操作之前验证运行输入时产生的错误。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("IMEI must be a 15-digit integer value, got '{0}'")]
    InvalidImei(String),
    #[error("please enter the tester name")]
    MissingTester,
    #[error("command file not found: {0}")]
    MissingCommandFile(String),
}

/// A validated 15-digit IMEI.
/// 经过验证的 15 位 IMEI。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Imei(String);

impl Imei {
    /// Parses an IMEI, accepting exactly 15 ASCII digits and nothing else.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.len() == IMEI_LEN && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ValidationError::InvalidImei(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Imei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single row of the command set: the command text to send and the
/// response the device is expected to answer with.
///
/// 命令集中的单行：要发送的命令文本以及设备预期返回的响应。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCommand {
    /// 1-based position in the input / 在输入中的位置（从 1 开始）
    pub ordinal: usize,
    /// The command text passed to the device tool / 传递给设备工具的命令文本
    pub command: String,
    /// The expected normalized response / 预期的规范化响应
    pub expected_response: String,
}

impl TestCommand {
    pub fn new(ordinal: usize, command: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            ordinal,
            command: command.into(),
            expected_response: expected.into(),
        }
    }
}

/// The raw result of one device tool invocation.
/// 单次设备工具调用的原始结果。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInvocation {
    /// The literal command line, as written to the transcript.
    /// 字面命令行，按原样写入日志记录。
    pub invocation: String,
    /// Captured standard output / 捕获的标准输出
    pub stdout: String,
    /// Whether the process launched and exited successfully.
    /// 进程是否成功启动并成功退出。
    pub succeeded: bool,
}

/// A device response after parsing: either an extracted payload or one of the
/// recognized error tags.
///
/// 解析后的设备响应：提取的有效载荷或已识别的错误标记之一。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedResponse {
    /// Text that followed the `Response:` marker.
    Payload(String),
    /// The tool reported `operation failed`.
    DeviceOffline,
    /// The tool reported `Read timed out`.
    MqttIssue,
    /// The tool reported error code `404001`.
    ImeiNotFound,
    /// Nothing recognizable in the output.
    NoResponse,
}

impl NormalizedResponse {
    pub const DEVICE_OFFLINE: &'static str = "Device is offline";
    pub const MQTT_ISSUE: &'static str = "MQTT response issue";
    pub const IMEI_NOT_FOUND: &'static str = "Response not received, Check IMEI";
    pub const NO_RESPONSE: &'static str = "No response found";

    /// The display rendering of the response, as it appears in the report.
    /// 响应的显示形式，即在报告中出现的形式。
    pub fn as_str(&self) -> &str {
        match self {
            NormalizedResponse::Payload(text) => text,
            NormalizedResponse::DeviceOffline => Self::DEVICE_OFFLINE,
            NormalizedResponse::MqttIssue => Self::MQTT_ISSUE,
            NormalizedResponse::ImeiNotFound => Self::IMEI_NOT_FOUND,
            NormalizedResponse::NoResponse => Self::NO_RESPONSE,
        }
    }
}

impl fmt::Display for NormalizedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The classification of one executed command.
/// 单个已执行命令的分类结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The actual response matched the expected one exactly.
    Pass,
    /// The actual response differed and is not a recognized device error.
    Fail,
    /// The device was offline.
    DeviceOffline,
    /// The MQTT read timed out.
    MqttError,
    /// The tool could not reach the device under this IMEI.
    CheckImei,
}

impl Outcome {
    /// Returns `true` for the outcomes that count towards the error counter.
    pub fn is_error(self) -> bool {
        matches!(
            self,
            Outcome::DeviceOffline | Outcome::MqttError | Outcome::CheckImei
        )
    }

    /// The label written into the report's result column.
    /// 写入报告结果列的标签。
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Pass => "Pass",
            Outcome::Fail => "Fail",
            Outcome::DeviceOffline => "Device Offline",
            Outcome::MqttError => "MQTT Error",
            Outcome::CheckImei => "Check_IMEI",
        }
    }

    /// CSS class used by the HTML report.
    pub fn css_class(self) -> &'static str {
        match self {
            Outcome::Pass => "status-Passed",
            Outcome::Fail => "status-Failed",
            Outcome::DeviceOffline | Outcome::MqttError | Outcome::CheckImei => "status-Error",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One line of the result table. Created once per executed command and never
/// modified afterwards.
///
/// 结果表中的一行。每个已执行命令创建一次，之后不再修改。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    /// 1-based position among executed commands / 在已执行命令中的位置（从 1 开始）
    pub serial: usize,
    pub timestamp: DateTime<Local>,
    pub command: String,
    pub expected: String,
    pub actual: String,
    pub outcome: Outcome,
}

/// Running totals for a run. `executed == passed + failed + errors` holds after
/// every call to [`RunCounters::record`].
///
/// 一次运行的累计计数。每次调用 [`RunCounters::record`] 后，
/// `executed == passed + failed + errors` 始终成立。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounters {
    pub executed: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
}

impl RunCounters {
    pub fn record(&mut self, outcome: Outcome) {
        self.executed += 1;
        match outcome {
            Outcome::Pass => self.passed += 1,
            Outcome::Fail => self.failed += 1,
            Outcome::DeviceOffline | Outcome::MqttError | Outcome::CheckImei => self.errors += 1,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.executed == self.passed + self.failed + self.errors
    }
}

/// Why a run stopped before executing every command.
/// 运行在执行完所有命令之前停止的原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AbortReason {
    /// The operator requested the abort.
    User,
    /// Too many `Check_IMEI` responses were received.
    ImeiNotFound,
}

/// The terminal state of a run.
/// 一次运行的终止状态。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RunState {
    /// Every command was executed.
    Completed,
    /// The run stopped at a loop boundary before the end of the command set.
    Aborted(AbortReason),
    /// An infrastructure error ended the loop; the rows gathered so far are kept.
    Failed(String),
}

impl RunState {
    pub fn is_failed(&self) -> bool {
        matches!(self, RunState::Failed(_))
    }
}

/// Everything the scheduler needs to know about the run it is executing,
/// including the abort token shared with the caller.
///
/// 调度器执行运行所需的全部信息，包括与调用方共享的中止令牌。
#[derive(Debug, Clone)]
pub struct RunContext {
    pub imei: Imei,
    pub tester_name: String,
    pub version_info: String,
    pub started_at: DateTime<Local>,
    started: Instant,
    abort: CancellationToken,
}

impl RunContext {
    pub fn new(imei: Imei, tester_name: impl Into<String>, version_info: impl Into<String>) -> Self {
        Self::with_abort_token(imei, tester_name, version_info, CancellationToken::new())
    }

    /// Creates a context whose abort flag is the given token, so an already
    /// installed handler (e.g. Ctrl-C) can stop the run.
    pub fn with_abort_token(
        imei: Imei,
        tester_name: impl Into<String>,
        version_info: impl Into<String>,
        abort: CancellationToken,
    ) -> Self {
        Self {
            imei,
            tester_name: tester_name.into(),
            version_info: version_info.into(),
            started_at: Local::now(),
            started: Instant::now(),
            abort,
        }
    }

    /// A handle the triggering side keeps to request an abort.
    /// 触发方持有的用于请求中止的句柄。
    pub fn abort_handle(&self) -> CancellationToken {
        self.abort.clone()
    }

    pub fn request_abort(&self) {
        self.abort.cancel();
    }

    pub fn is_abort_requested(&self) -> bool {
        self.abort.is_cancelled()
    }

    pub(crate) fn abort_token(&self) -> &CancellationToken {
        &self.abort
    }

    /// Time elapsed since the context was created.
    pub fn elapsed(&self) -> std::time::Duration {
        self.started.elapsed()
    }
}

/// Validates the tester name entered for a run.
pub fn validate_tester(name: &str) -> Result<&str, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingTester)
    } else {
        Ok(trimmed)
    }
}
