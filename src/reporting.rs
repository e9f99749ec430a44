//! # Reporting Module / 报告模块
//!
//! This module builds the report of a run and renders it: a colored console
//! summary, an HTML result table with an embedded summary chart, and the
//! plain-text invocation transcript.
//!
//! 此模块构建一次运行的报告并进行呈现：彩色控制台摘要、
//! 嵌入摘要图表的 HTML 结果表以及纯文本调用记录。

pub mod chart;
pub mod console;
pub mod html;
pub mod report;
pub mod transcript;

// Re-export common reporting functions
pub use console::{ConsoleObserver, print_summary};
pub use html::write_html_report;
pub use report::{Report, RunSummary, format_duration};
pub use transcript::Transcript;
