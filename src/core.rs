//! # Core Module / 核心模块
//!
//! This module contains the core functionality of the OTA command runner,
//! including data models, configuration, output parsing, response
//! classification, the version probe and the run scheduler.
//!
//! 此模块包含 OTA 命令运行器的核心功能，
//! 包括数据模型、配置、输出解析、响应分类、版本探测和运行调度器。

pub mod classifier;
pub mod config;
pub mod models;
pub mod parser;
pub mod scheduler;
pub mod version;

// Re-exports
pub use classifier::classify;
pub use models::{Outcome, ResultRow, RunCounters, TestCommand};
pub use parser::parse_output;
pub use scheduler::Scheduler;
