//! # Report Builder Module / 报告构建模块
//!
//! Turns a finished [`RunRecord`] into the immutable [`Report`] that the
//! renderers consume.
//!
//! 将已完成的 [`RunRecord`] 转换为供渲染器使用的不可变 [`Report`]。

use chrono::{DateTime, Local};
use serde::Serialize;
use std::time::Duration;

use crate::core::models::{ResultRow, RunContext, RunCounters, RunState};
use crate::core::scheduler::RunRecord;

/// Column headers of the result table, in order.
/// 结果表的列标题（按顺序）。
pub const RESULT_COLUMNS: [&str; 6] = [
    "Serial Number",
    "Timestamp",
    "Commands",
    "Expected Response",
    "Actual Response",
    "Test Case Result",
];

/// Timestamp format of the result table.
pub const ROW_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The summary half of a report.
/// 报告的摘要部分。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub imei: String,
    pub tester_name: String,
    pub version_info: String,
    pub started_at: DateTime<Local>,
    pub duration_secs: u64,
    pub counters: RunCounters,
    /// Size of the command set, executed or not.
    pub total: usize,
    pub state: RunState,
}

impl RunSummary {
    /// Run duration formatted as `{h}Hrs {m}Mins {s}Secs`.
    pub fn formatted_duration(&self) -> String {
        format_duration(Duration::from_secs(self.duration_secs))
    }

    /// Shares of passed, failed and error rows, in that order. All zero for an
    /// empty run.
    pub fn shares(&self) -> [f64; 3] {
        let c = &self.counters;
        let total = (c.passed + c.failed + c.errors) as f64;
        if total == 0.0 {
            return [0.0; 3];
        }
        [
            c.passed as f64 / total,
            c.failed as f64 / total,
            c.errors as f64 / total,
        ]
    }
}

/// The final artifact of a run. Built once and never modified.
/// 一次运行的最终产物。只构建一次，之后不再修改。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub rows: Vec<ResultRow>,
    pub summary: RunSummary,
}

impl Report {
    /// Builds the report, measuring the duration from the context's start.
    pub fn build(record: RunRecord, ctx: &RunContext) -> Self {
        Self::build_with_duration(record, ctx, ctx.elapsed())
    }

    pub fn build_with_duration(record: RunRecord, ctx: &RunContext, duration: Duration) -> Self {
        Self {
            summary: RunSummary {
                imei: ctx.imei.to_string(),
                tester_name: ctx.tester_name.clone(),
                version_info: ctx.version_info.clone(),
                started_at: ctx.started_at,
                duration_secs: duration.as_secs(),
                counters: record.counters,
                total: record.total,
                state: record.state,
            },
            rows: record.rows,
        }
    }

    /// The table cells of every row, in column order.
    /// 每一行的表格单元格（按列顺序）。
    pub fn table(&self) -> Vec<[String; 6]> {
        self.rows
            .iter()
            .map(|row| {
                [
                    row.serial.to_string(),
                    row.timestamp.format(ROW_TIMESTAMP_FORMAT).to_string(),
                    row.command.clone(),
                    row.expected.clone(),
                    row.actual.clone(),
                    row.outcome.label().to_string(),
                ]
            })
            .collect()
    }
}

/// Formats a duration as `{h}Hrs {m}Mins {s}Secs`, truncating sub-second parts.
/// 将持续时间格式化为 `{h}Hrs {m}Mins {s}Secs`，舍去不足一秒的部分。
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!(
        "{}Hrs {}Mins {}Secs",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}
