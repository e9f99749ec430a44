//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for the runner,
//! including device tool invocation, the network reachability gate,
//! lifecycle logging and file system helpers.
//!
//! 此模块为运行器提供基础设施服务，
//! 包括设备工具调用、网络可达性检查、生命周期日志和文件系统辅助功能。

pub mod command;
pub mod fs;
pub mod logging;
pub mod network;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
