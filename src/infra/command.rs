//! # Command Invocation Module / 命令调用模块
//!
//! This module runs the external device command tool, one process per test
//! row, and captures what it prints.
//!
//! 此模块运行外部设备命令工具（每个测试行一个进程），并捕获其输出。

use anyhow::{Context, Result, anyhow};
use std::future::Future;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

use crate::core::config::ToolConfig;
use crate::core::models::RawInvocation;

/// Anything able to send one command to the device under a given IMEI.
///
/// Implementations must never fail: launch errors, bad exit codes and
/// timeouts are reported through [`RawInvocation::succeeded`] and an output
/// that may be empty.
///
/// 任何能够以给定 IMEI 向设备发送一条命令的对象。
/// 实现绝不能返回错误：启动错误、异常退出码和超时都通过
/// [`RawInvocation::succeeded`] 以及可能为空的输出来报告。
pub trait CommandInvoker {
    fn invoke(&self, imei: &str, command: &str) -> impl Future<Output = RawInvocation> + Send;
}

/// The production invoker: `<program> <base args...> <imei> <command>`.
/// 生产环境的调用器：`<program> <base args...> <imei> <command>`。
#[derive(Debug, Clone)]
pub struct ExternalTool {
    program: String,
    base_args: Vec<String>,
    timeout: Option<Duration>,
}

impl ExternalTool {
    pub fn new(program: impl Into<String>, base_args: Vec<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            base_args,
            timeout,
        }
    }

    /// Builds the tool from its configured command line. Environment variables
    /// and `~` are expanded before the line is split with shell rules.
    pub fn from_config(config: &ToolConfig) -> Result<Self> {
        let expanded = shellexpand::full(&config.command)
            .with_context(|| format!("Failed to expand tool command: {}", config.command))?
            .to_string();

        let mut parts = shlex::split(&expanded)
            .ok_or_else(|| anyhow!("Failed to parse tool command: {}", expanded))?
            .into_iter();

        let program = parts
            .next()
            .ok_or_else(|| anyhow!("Empty tool command after parsing."))?;

        Ok(Self::new(program, parts.collect(), config.invoke_timeout()))
    }

    /// The command line as written to the transcript.
    /// 写入日志记录的命令行。
    pub fn command_line(&self, imei: &str, command: &str) -> String {
        let mut line = self.program.clone();
        for arg in self.base_args.iter().map(String::as_str).chain([imei, command]) {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    fn build_command(&self, imei: &str, command: &str) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.base_args)
            .arg(imei)
            .arg(command)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        detach_from_console(&mut cmd);
        cmd
    }
}

impl CommandInvoker for ExternalTool {
    async fn invoke(&self, imei: &str, command: &str) -> RawInvocation {
        let invocation = self.command_line(imei, command);
        let capture = spawn_and_capture(self.build_command(imei, command));

        let (status_res, captured) = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, capture).await {
                Ok(res) => res,
                Err(_) => {
                    // Dropping the capture future drops the child, which kills it.
                    warn!(command, timeout_secs = limit.as_secs(), "device tool timed out");
                    return RawInvocation {
                        invocation,
                        stdout: String::new(),
                        succeeded: false,
                    };
                }
            },
            None => capture.await,
        };

        if !captured.stderr.trim().is_empty() {
            debug!(command, stderr = %captured.stderr.trim(), "device tool stderr");
        }

        let succeeded = match status_res {
            Ok(status) => status.success(),
            Err(e) => {
                warn!(program = %self.program, error = %e, "failed to run device tool");
                false
            }
        };

        RawInvocation {
            invocation,
            stdout: captured.stdout,
            succeeded,
        }
    }
}

#[cfg(windows)]
fn detach_from_console(cmd: &mut tokio::process::Command) {
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    cmd.creation_flags(CREATE_NO_WINDOW);
}

/// Puts the tool in its own process group, so a terminal Ctrl-C reaches only
/// the runner and the command in flight finishes.
#[cfg(unix)]
fn detach_from_console(cmd: &mut tokio::process::Command) {
    cmd.process_group(0);
}

#[cfg(not(any(unix, windows)))]
fn detach_from_console(_cmd: &mut tokio::process::Command) {}

/// The two output streams of a finished process.
/// 已结束进程的两个输出流。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Spawns a command and captures its stdout and stderr separately.
/// Both streams are drained concurrently so a chatty stderr cannot block the
/// child. Bytes that are not valid UTF-8 are replaced rather than dropped.
///
/// # Returns
/// A tuple containing:
/// - The `ExitStatus` of the process wrapped in an `io::Result`.
/// - The captured output; empty if the process could not be spawned.
///
/// 派生一个命令，分别捕获其 stdout 和 stderr。
/// 两个输出流被并发读取，因此大量的 stderr 输出不会阻塞子进程。
pub async fn spawn_and_capture(
    mut cmd: tokio::process::Command,
) -> (std::io::Result<ExitStatus>, CapturedOutput) {
    let mut child = match cmd
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => return (Err(e), CapturedOutput::default()),
    };

    let stdout_handle = child.stdout.take().map(|s| tokio::spawn(read_all(s)));
    let stderr_handle = child.stderr.take().map(|s| tokio::spawn(read_all(s)));

    let status = child.wait().await;

    let mut captured = CapturedOutput::default();
    if let Some(handle) = stdout_handle {
        match handle.await {
            Ok(text) => captured.stdout = text,
            Err(e) => warn!("Failed to join stdout task: {}", e),
        }
    }
    if let Some(handle) = stderr_handle {
        match handle.await {
            Ok(text) => captured.stderr = text,
            Err(e) => warn!("Failed to join stderr task: {}", e),
        }
    }

    (status, captured)
}

async fn read_all<R: AsyncRead + Unpin>(mut reader: R) -> String {
    let mut buf = Vec::new();
    if let Err(e) = reader.read_to_end(&mut buf).await {
        debug!("output stream closed early: {}", e);
    }
    String::from_utf8_lossy(&buf).into_owned()
}
