//! # Version Probe Module / 版本探测模块
//!
//! Asks the device for its firmware version before the run starts, so the
//! report can name the software that was tested.
//!
//! 在运行开始前向设备查询其固件版本，以便报告中注明被测试的软件。

use tracing::{info, warn};

use crate::core::models::Imei;
use crate::core::parser::RESPONSE_MARKER;
use crate::infra::command::CommandInvoker;

/// The command sent to read the version information.
pub const VERSION_COMMAND: &str = "GET VERINF";

/// Reported when the device does not answer with a usable version line.
pub const UNKNOWN_VERSION: &str = "RSW0x.x.x";

/// Queries the device version. Never fails: any problem degrades to
/// [`UNKNOWN_VERSION`].
///
/// 查询设备版本。此函数不会失败：任何问题都会降级为 [`UNKNOWN_VERSION`]。
pub async fn probe_version<I: CommandInvoker>(invoker: &I, imei: &Imei) -> String {
    let raw = invoker.invoke(imei.as_str(), VERSION_COMMAND).await;
    match extract_version(&raw.stdout) {
        Some(version) => {
            info!(%imei, version = %version, "device version detected");
            version
        }
        None => {
            warn!(%imei, "no version information received");
            UNKNOWN_VERSION.to_string()
        }
    }
}

/// Picks the third comma-separated field of a line starting with
/// `Response:`. When several such lines carry one, the last wins.
pub fn extract_version(output: &str) -> Option<String> {
    output
        .lines()
        .filter(|line| line.starts_with(RESPONSE_MARKER))
        .filter_map(|line| line.split(',').nth(2))
        .last()
        .map(str::to_string)
}
