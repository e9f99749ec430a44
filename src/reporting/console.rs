//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints the progress of a run and its final summary to the
//! console, with colored outcome labels and internationalization support.
//!
//! 此模块在控制台打印运行进度和最终摘要，支持彩色结果标签和国际化。

use colored::*;
use std::path::Path;

use crate::core::models::{Outcome, ResultRow, RunCounters, RunState};
use crate::core::scheduler::RunObserver;
use crate::infra::t;
use crate::reporting::html::state_text;

/// Colors an outcome label the way the report does.
/// 按照报告中的方式为结果标签着色。
pub fn colored_outcome(outcome: Outcome) -> ColoredString {
    match outcome {
        Outcome::Pass => outcome.label().green(),
        Outcome::Fail => outcome.label().red(),
        Outcome::DeviceOffline | Outcome::MqttError | Outcome::CheckImei => {
            outcome.label().yellow()
        }
    }
}

/// The one-line counter summary, e.g. `Executed:   2  Passed:   1  Failed:   0  Error:   1`.
pub fn format_counters(counters: &RunCounters, locale: &str) -> String {
    t!(
        "counters",
        locale = locale,
        executed = format!("{:3}", counters.executed),
        passed = format!("{:3}", counters.passed),
        failed = format!("{:3}", counters.failed),
        errors = format!("{:3}", counters.errors)
    )
    .to_string()
}

/// Follows a run on the console: one line per executed command.
/// 在控制台上跟踪运行：每条已执行的命令输出一行。
pub struct ConsoleObserver {
    locale: String,
    total: usize,
    pending: Option<String>,
}

impl ConsoleObserver {
    pub fn new(locale: &str, total: usize) -> Self {
        Self {
            locale: locale.to_string(),
            total,
            pending: None,
        }
    }
}

impl RunObserver for ConsoleObserver {
    fn on_row_complete(&mut self, row: &ResultRow, _counters: &RunCounters) {
        self.pending = Some(format!(
            "#{}/{} {} -> {} ({})",
            row.serial,
            self.total,
            row.command.cyan(),
            colored_outcome(row.outcome),
            row.actual
        ));
    }

    fn on_progress(&mut self, percent: u8) {
        if let Some(line) = self.pending.take() {
            println!("[{:>3}%] {}", percent, line);
        }
    }

    fn on_imei_abort(&mut self, threshold: u32) {
        println!(
            "{}",
            t!("run.imei_abort", locale = &self.locale, count = threshold)
                .red()
                .bold()
        );
    }
}

/// Prints the final summary of a run: state, counters and where the
/// artifacts were saved.
///
/// 打印一次运行的最终摘要：状态、计数以及产物的保存位置。
pub fn print_summary(counters: &RunCounters, state: &RunState, output_folder: &Path, locale: &str) {
    println!("\n{}", t!("summary_banner", locale = locale).bold());

    let state_line = state_text(state, locale);
    let state_colored = match state {
        RunState::Completed => state_line.green(),
        RunState::Aborted(_) => state_line.yellow(),
        RunState::Failed(_) => state_line.red(),
    };
    println!("  {}", state_colored);
    println!("  {}", format_counters(counters, locale));
    println!(
        "  {}",
        t!("results_saved_in", locale = locale, path = output_folder.display())
    );
}
