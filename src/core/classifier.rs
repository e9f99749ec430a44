//! # Response Classifier Module / 响应分类模块
//!
//! Compares an expected response with the normalized actual one.
//!
//! 将预期响应与规范化后的实际响应进行比较。

use crate::core::models::{NormalizedResponse, Outcome};

/// Classifies a response against the expected value.
///
/// Exact equality of the rendered response wins over everything else, so a
/// command whose expected response is literally `Device is offline` passes
/// when the device is offline. Otherwise the recognized error tags map to
/// their own outcomes and any other mismatch is a [`Outcome::Fail`].
///
/// 渲染后的响应与预期值完全相等时优先判定为通过；
/// 否则已识别的错误标记映射到各自的结果类别，其余不匹配均为失败。
pub fn classify(expected: &str, actual: &NormalizedResponse) -> Outcome {
    if actual.as_str() == expected {
        return Outcome::Pass;
    }
    match actual {
        NormalizedResponse::DeviceOffline => Outcome::DeviceOffline,
        NormalizedResponse::MqttIssue => Outcome::MqttError,
        NormalizedResponse::ImeiNotFound => Outcome::CheckImei,
        NormalizedResponse::Payload(_) | NormalizedResponse::NoResponse => Outcome::Fail,
    }
}
