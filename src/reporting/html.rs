//! # HTML Reporting Module / HTML 报告模块
//!
//! This module renders the report of a run as a single HTML file: run
//! details, counters, the embedded summary chart and the result table.
//! The summary is also embedded as JSON for machine consumption.
//!
//! 此模块将一次运行的报告渲染为单个 HTML 文件：运行详情、计数、
//! 嵌入的摘要图表和结果表。摘要还以 JSON 形式嵌入，便于机器读取。

use anyhow::{Context, Result};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::io::Write;
use std::path::Path;

use crate::core::models::{AbortReason, RunState};
use crate::infra::fs::create_file;
use crate::infra::t;
use crate::reporting::chart::render_pie_chart;
use crate::reporting::report::{RESULT_COLUMNS, Report};

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = include_str!("assets/report.css");

/// Renders the complete report document.
///
/// # Arguments / 参数
/// * `report` - The report to render / 要渲染的报告
/// * `locale` - The locale used for labels / 标签使用的语言区域
pub fn render_html_report(report: &Report, locale: &str) -> Result<String> {
    let summary = &report.summary;
    let counters = &summary.counters;
    let summary_json = serde_json::to_string(summary)
        .context("Failed to serialize run summary")?
        // Keep the JSON from closing the surrounding script element.
        .replace("</", "<\\/");

    let markup: Markup = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("html_report.title", locale = locale, imei = &summary.imei).to_string()) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("html_report.main_header", locale = locale).to_string()) }
                table class="details" {
                    tr {
                        th { (t!("html_report.details.imei", locale = locale).to_string()) }
                        td { (summary.imei) }
                    }
                    tr {
                        th { (t!("html_report.details.version", locale = locale).to_string()) }
                        td { (summary.version_info) }
                    }
                    tr {
                        th { (t!("html_report.details.tester", locale = locale).to_string()) }
                        td { (summary.tester_name) }
                    }
                    tr {
                        th { (t!("html_report.details.started", locale = locale).to_string()) }
                        td { (summary.started_at.format("%Y-%m-%d %H:%M:%S").to_string()) }
                    }
                    tr {
                        th { (t!("html_report.details.duration", locale = locale).to_string()) }
                        td { (summary.formatted_duration()) }
                    }
                    tr {
                        th { (t!("html_report.details.state", locale = locale).to_string()) }
                        td { (state_text(&summary.state, locale)) }
                    }
                }
                div class="summary-container" {
                    div class="summary-item" {
                        span class="count" { (counters.executed) }
                        span class="label" { (t!("html_report.summary.executed", locale = locale).to_string()) }
                    }
                    div class="summary-item" {
                        span class="count passed-text" { (counters.passed) }
                        span class="label" { (t!("html_report.summary.passed", locale = locale).to_string()) }
                    }
                    div class="summary-item" {
                        span class="count failed-text" { (counters.failed) }
                        span class="label" { (t!("html_report.summary.failed", locale = locale).to_string()) }
                    }
                    div class="summary-item" {
                        span class="count error-text" { (counters.errors) }
                        span class="label" { (t!("html_report.summary.errors", locale = locale).to_string()) }
                    }
                }
                div class="report-body" {
                    table class="results" {
                        thead {
                            tr {
                                @for column in RESULT_COLUMNS {
                                    th { (column) }
                                }
                            }
                        }
                        tbody {
                            @for (row, cells) in report.rows.iter().zip(report.table()) {
                                tr {
                                    @for (i, cell) in cells.iter().enumerate() {
                                        @if i + 1 == RESULT_COLUMNS.len() {
                                            td { div class=(format!("status-cell {}", row.outcome.css_class())) { (cell) } }
                                        } @else {
                                            td { (cell) }
                                        }
                                    }
                                }
                            }
                        }
                    }
                    div class="chart" {
                        (render_pie_chart(summary, locale))
                    }
                }
                script type="application/json" id="run-summary" {
                    (PreEscaped(summary_json))
                }
            }
        }
    };

    Ok(markup.into_string())
}

/// Generates the HTML report and writes it to `output_path`.
///
/// # Errors / 错误
/// This function will return an error if the file cannot be created or written.
/// 如果无法创建或写入文件，此函数将返回错误。
pub fn write_html_report(report: &Report, output_path: &Path, locale: &str) -> Result<()> {
    let html = render_html_report(report, locale)?;
    let mut file = create_file(output_path)?;
    file.write_all(html.as_bytes())
        .with_context(|| format!("Failed to write report: {}", output_path.display()))?;
    Ok(())
}

/// Human-readable final state of a run.
pub fn state_text(state: &RunState, locale: &str) -> String {
    match state {
        RunState::Completed => t!("state.completed", locale = locale).to_string(),
        RunState::Aborted(AbortReason::User) => t!("state.aborted_user", locale = locale).to_string(),
        RunState::Aborted(AbortReason::ImeiNotFound) => {
            t!("state.aborted_imei", locale = locale).to_string()
        }
        RunState::Failed(message) => {
            t!("state.failed", locale = locale, error = message).to_string()
        }
    }
}
