//! # Output Parser Module / 输出解析模块
//!
//! Turns the free-text output of one device tool invocation into a
//! [`NormalizedResponse`].
//!
//! 将单次设备工具调用的自由文本输出转换为 [`NormalizedResponse`]。

use crate::core::models::NormalizedResponse;

/// Marker that precedes the device payload in the tool's output.
pub const RESPONSE_MARKER: &str = "Response:";

const OPERATION_FAILED: &str = "operation failed";
const READ_TIMED_OUT: &str = "Read timed out";
const IMEI_NOT_FOUND_CODE: &str = "404001";

/// Parses raw tool output into a normalized response.
///
/// The rules are checked in a fixed priority order and the first match wins,
/// so a payload is preferred even when an error marker appears alongside it:
///
/// 1. `Response:` present: everything after its first occurrence, trimmed.
/// 2. `operation failed`: [`NormalizedResponse::DeviceOffline`].
/// 3. `Read timed out`: [`NormalizedResponse::MqttIssue`].
/// 4. `404001`: [`NormalizedResponse::ImeiNotFound`].
/// 5. Anything else: [`NormalizedResponse::NoResponse`].
///
/// 按固定优先级检查规则，第一个匹配的规则生效。
pub fn parse_output(raw: &str) -> NormalizedResponse {
    if let Some((_, payload)) = raw.split_once(RESPONSE_MARKER) {
        NormalizedResponse::Payload(payload.trim().to_string())
    } else if raw.contains(OPERATION_FAILED) {
        NormalizedResponse::DeviceOffline
    } else if raw.contains(READ_TIMED_OUT) {
        NormalizedResponse::MqttIssue
    } else if raw.contains(IMEI_NOT_FOUND_CODE) {
        NormalizedResponse::ImeiNotFound
    } else {
        NormalizedResponse::NoResponse
    }
}
