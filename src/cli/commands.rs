//! # CLI Commands / 命令行命令
//!
//! - `run` - Executes a command set against a device
//! - `init` - Writes a default configuration and a sample command set
//!
//! - `run` - 针对设备执行命令集
//! - `init` - 写入默认配置和示例命令集

pub mod init;
pub mod run;
