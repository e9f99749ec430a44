//! # Network Reachability Module / 网络可达性模块
//!
//! The pre-flight gate that refuses to start a run while the network the
//! device tool depends on is unreachable.
//!
//! 运行前检查：当设备工具依赖的网络不可达时拒绝开始运行。

use anyhow::{Context, Result};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

use crate::core::config::NetworkConfig;

/// A single reachability probe. Returns `true` when the endpoint answered.
/// 单次可达性探测。端点有应答时返回 `true`。
pub trait ReachabilityProbe {
    fn probe(&self) -> impl Future<Output = bool> + Send;
}

/// HTTP probe: any HTTP response counts as reachable, only transport errors
/// count as failures.
pub struct HttpProbe {
    client: Client,
    url: String,
}

impl HttpProbe {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config(config: &NetworkConfig) -> Result<Self> {
        Self::new(config.url.clone(), Duration::from_secs(config.timeout_secs))
    }
}

impl ReachabilityProbe for HttpProbe {
    async fn probe(&self) -> bool {
        match self.client.get(&self.url).send().await {
            Ok(resp) => {
                info!(url = %self.url, status = resp.status().as_u16(), "network reachable");
                true
            }
            Err(e) => {
                warn!(url = %self.url, error = %e, "network probe failed");
                false
            }
        }
    }
}

/// Retry policy of the gate.
/// 检查的重试策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatePolicy {
    pub attempts: u32,
    pub timeout: Duration,
    pub retry_delay: Duration,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            timeout: Duration::from_secs(5),
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl From<&NetworkConfig> for GatePolicy {
    fn from(config: &NetworkConfig) -> Self {
        Self {
            attempts: config.attempts.max(1),
            timeout: Duration::from_secs(config.timeout_secs),
            retry_delay: Duration::from_secs(config.retry_delay_secs),
        }
    }
}

/// Probes until the first success, at most `policy.attempts` times.
///
/// Each attempt is bounded by `policy.timeout`; a failed attempt is followed
/// by `policy.retry_delay` unless it was the last one.
///
/// 探测直到第一次成功，最多 `policy.attempts` 次。
/// 每次尝试受 `policy.timeout` 限制；失败的尝试之后等待 `policy.retry_delay`（最后一次除外）。
pub async fn check_reachable<P: ReachabilityProbe>(probe: &P, policy: &GatePolicy) -> bool {
    for attempt in 1..=policy.attempts {
        let reachable = tokio::time::timeout(policy.timeout, probe.probe())
            .await
            .unwrap_or(false);
        if reachable {
            return true;
        }
        warn!(attempt, attempts = policy.attempts, "network not reachable");
        if attempt < policy.attempts {
            tokio::time::sleep(policy.retry_delay).await;
        }
    }
    false
}
