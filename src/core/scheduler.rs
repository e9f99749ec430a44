//! # Run Scheduler Module / 运行调度模块
//!
//! This module drives a run: it walks the command set strictly in order,
//! one invocation at a time, classifies every response, keeps the counters,
//! applies the abort policies and paces the device with a fixed delay.
//!
//! 此模块驱动一次运行：严格按顺序逐条执行命令集（每次一个调用），
//! 对每个响应进行分类，维护计数器，应用中止策略，并以固定延迟控制设备负载。
//!
//! ## Lifecycle / 生命周期
//!
//! `Idle -> Running -> {Completed | Aborted | Failed}`. The terminal state is
//! reported in [`RunRecord::state`].

use chrono::Local;
use std::io::Write;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::core::classifier::classify;
use crate::core::config::ScheduleConfig;
use crate::core::models::{
    AbortReason, Outcome, ResultRow, RunContext, RunCounters, RunState, TestCommand,
};
use crate::core::parser::parse_output;
use crate::infra::command::CommandInvoker;
use crate::reporting::transcript::Transcript;

/// Pacing and abort policy of a run.
/// 一次运行的节奏与中止策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPolicy {
    /// Pause between two commands. Not applied after the last one.
    /// 两条命令之间的暂停时间。最后一条命令之后不暂停。
    pub command_delay: Duration,
    /// `Check_IMEI` outcomes that trigger the automatic abort. `0` disables it.
    /// 触发自动中止的 `Check_IMEI` 结果次数。`0` 表示禁用。
    pub imei_abort_threshold: u32,
    /// Lets an abort request end the pause early.
    /// 允许中止请求提前结束暂停。
    pub interruptible_delay: bool,
}

impl Default for RunPolicy {
    fn default() -> Self {
        Self::from(&ScheduleConfig::default())
    }
}

impl From<&ScheduleConfig> for RunPolicy {
    fn from(config: &ScheduleConfig) -> Self {
        Self {
            command_delay: Duration::from_millis(config.command_delay_ms),
            imei_abort_threshold: config.imei_abort_threshold,
            interruptible_delay: config.interruptible_delay,
        }
    }
}

/// Callbacks through which the caller follows a run. All methods default to
/// doing nothing. Implementations must return quickly; they run on the loop.
///
/// 调用方跟踪运行进度的回调接口。所有方法默认不执行任何操作。
/// 实现必须快速返回，因为它们在运行循环中执行。
pub trait RunObserver {
    /// A row was classified and appended to the results.
    fn on_row_complete(&mut self, _row: &ResultRow, _counters: &RunCounters) {}

    /// Percentage of the command set executed so far, truncated.
    fn on_progress(&mut self, _percent: u8) {}

    /// The `Check_IMEI` threshold was reached; the run stops after this row.
    fn on_imei_abort(&mut self, _threshold: u32) {}
}

/// An observer that ignores every event.
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// What a run produced: the rows in execution order, the final counters and
/// how the run ended.
///
/// 一次运行的产物：按执行顺序排列的结果行、最终计数器以及运行的结束方式。
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub rows: Vec<ResultRow>,
    pub counters: RunCounters,
    pub state: RunState,
    /// Size of the command set the run was started with.
    pub total: usize,
}

/// Integer percentage of `executed` over `total`, rounded toward zero.
pub fn progress_percent(executed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (executed.min(total) * 100 / total) as u8
}

/// The sequential run loop.
pub struct Scheduler<I> {
    invoker: I,
    policy: RunPolicy,
}

impl<I: CommandInvoker> Scheduler<I> {
    pub fn new(invoker: I, policy: RunPolicy) -> Self {
        Self { invoker, policy }
    }

    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    pub fn policy(&self) -> &RunPolicy {
        &self.policy
    }

    /// Executes `commands` in order against the device in `ctx`.
    ///
    /// The abort token of `ctx` is checked before every command, never during
    /// an invocation. Commands that were not started do not appear in the
    /// record. A transcript write error ends the loop with
    /// [`RunState::Failed`]; the rows gathered until then are still returned.
    ///
    /// 按顺序对 `ctx` 中的设备执行 `commands`。
    /// 每条命令执行之前检查中止令牌，调用过程中不会检查。
    /// 未开始的命令不会出现在记录中。写入调用记录失败会以 [`RunState::Failed`]
    /// 结束循环，但之前收集的结果行仍会返回。
    pub async fn run<W, O>(
        &self,
        commands: &[TestCommand],
        ctx: &RunContext,
        transcript: &mut Transcript<W>,
        observer: &mut O,
    ) -> RunRecord
    where
        W: Write,
        O: RunObserver,
    {
        let total = commands.len();
        let abort = ctx.abort_token();
        let mut rows: Vec<ResultRow> = Vec::with_capacity(total);
        let mut counters = RunCounters::default();
        let mut check_imei_count: u32 = 0;
        let mut imei_abort_fired = false;

        info!(imei = %ctx.imei, tester = %ctx.tester_name, total, "run started");

        for (index, test) in commands.iter().enumerate() {
            if abort.is_cancelled() {
                let reason = if imei_abort_fired {
                    AbortReason::ImeiNotFound
                } else {
                    AbortReason::User
                };
                info!(executed = counters.executed, total, ?reason, "run aborted");
                return RunRecord {
                    rows,
                    counters,
                    state: RunState::Aborted(reason),
                    total,
                };
            }

            let raw = self.invoker.invoke(ctx.imei.as_str(), &test.command).await;
            let actual = parse_output(&raw.stdout);
            let outcome = classify(&test.expected_response, &actual);
            counters.record(outcome);
            debug_assert!(counters.is_consistent());

            debug!(
                ordinal = test.ordinal,
                command = %test.command,
                succeeded = raw.succeeded,
                outcome = %outcome,
                "command executed"
            );

            if outcome == Outcome::CheckImei {
                check_imei_count += 1;
                let threshold = self.policy.imei_abort_threshold;
                if threshold > 0 && check_imei_count == threshold {
                    imei_abort_fired = true;
                    abort.cancel();
                    warn!(
                        threshold = self.policy.imei_abort_threshold,
                        "response not received, aborting run"
                    );
                    observer.on_imei_abort(self.policy.imei_abort_threshold);
                }
            }

            let row = ResultRow {
                serial: counters.executed,
                timestamp: Local::now(),
                command: test.command.clone(),
                expected: test.expected_response.clone(),
                actual: actual.as_str().to_string(),
                outcome,
            };
            observer.on_row_complete(&row, &counters);
            rows.push(row);

            if let Err(e) = transcript.record(&raw.invocation, &raw.stdout) {
                error!(error = %e, "failed to write transcript, stopping run");
                observer.on_progress(progress_percent(counters.executed, total));
                return RunRecord {
                    rows,
                    counters,
                    state: RunState::Failed(format!("Failed to write transcript: {e}")),
                    total,
                };
            }

            observer.on_progress(progress_percent(counters.executed, total));

            if index + 1 < total {
                self.pause(abort).await;
            }
        }

        info!(executed = counters.executed, "all commands executed");
        RunRecord {
            rows,
            counters,
            state: RunState::Completed,
            total,
        }
    }

    async fn pause(&self, abort: &CancellationToken) {
        let delay = self.policy.command_delay;
        if delay.is_zero() {
            return;
        }
        if self.policy.interruptible_delay {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = abort.cancelled() => {}
            }
        } else {
            tokio::time::sleep(delay).await;
        }
    }
}
