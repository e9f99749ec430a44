//! # OTA Command Runner Library / OTA 命令运行器库
//!
//! This library provides the core functionality for the OTA command runner,
//! a sequential test executor that drives an external device command tool
//! against a single module (identified by its IMEI), classifies every response
//! and produces a per-run report.
//!
//! 此库为 OTA 命令运行器提供核心功能，
//! 这是一个顺序测试执行器，针对单个模块（由 IMEI 标识）驱动外部设备命令工具，
//! 对每个响应进行分类并生成每次运行的报告。
//!
//! ## Modules / 模块
//!
//! - `core` - Data models, parsing, classification and the run scheduler
//! - `infra` - Command invocation, network reachability, logging and file helpers
//! - `reporting` - Console output, HTML report, summary chart and transcript
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 数据模型、解析、分类和运行调度器
//! - `infra` - 命令调用、网络可达性、日志和文件辅助功能
//! - `reporting` - 控制台输出、HTML 报告、摘要图表和日志记录
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::classifier;
pub use core::config;
pub use core::models;
pub use core::parser;
pub use core::scheduler;

/// Initializes the application's internationalization (i18n) based on the system locale.
///
/// This function detects the user's system locale and sets the appropriate
/// language for the application's user interface. It attempts to match the full
/// locale (e.g., "zh-CN"), then just the language code (e.g., "en"), and
/// finally falls back to the default language ("en").
pub fn init() {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    rust_i18n::set_locale(resolve_locale(&locale));
}

/// Maps a requested locale onto one the binary ships translations for.
/// 将请求的语言区域映射到程序内置翻译的语言区域。
pub fn resolve_locale(requested: &str) -> &'static str {
    let available_locales: Vec<&'static str> = rust_i18n::available_locales!();

    // Try the full locale first (e.g., "zh-CN"), then the language part only
    // (e.g., "en" from "en-US"), and finally fall back to "en".
    if let Some(found) = available_locales.iter().copied().find(|l| *l == requested) {
        return found;
    }
    requested
        .split('-')
        .next()
        .and_then(|code| available_locales.iter().copied().find(|l| *l == code))
        .unwrap_or("en")
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
