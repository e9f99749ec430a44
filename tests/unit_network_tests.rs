use ota_cmd_runner::config::NetworkConfig;
use ota_cmd_runner::infra::network::{GatePolicy, ReachabilityProbe, check_reachable};
use std::future::pending;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Succeeds from the given attempt on; earlier attempts fail at once.
struct SucceedsOnAttempt {
    attempt: u32,
    calls: AtomicU32,
}

impl SucceedsOnAttempt {
    fn new(attempt: u32) -> Self {
        Self {
            attempt,
            calls: AtomicU32::new(0),
        }
    }
}

impl ReachabilityProbe for SucceedsOnAttempt {
    async fn probe(&self) -> bool {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        call >= self.attempt
    }
}

/// Never answers; only the per-attempt timeout ends it.
struct Hangs {
    calls: AtomicU32,
}

impl ReachabilityProbe for Hangs {
    async fn probe(&self) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        pending::<bool>().await
    }
}

fn policy() -> GatePolicy {
    GatePolicy {
        attempts: 3,
        timeout: Duration::from_secs(5),
        retry_delay: Duration::from_secs(1),
    }
}

#[tokio::test(start_paused = true)]
async fn test_first_attempt_succeeds() {
    let probe = SucceedsOnAttempt::new(1);
    let started = Instant::now();

    assert!(check_reachable(&probe, &policy()).await);
    assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_success_on_second_attempt() {
    let probe = SucceedsOnAttempt::new(2);
    let started = Instant::now();

    assert!(check_reachable(&probe, &policy()).await);
    assert_eq!(probe.calls.load(Ordering::SeqCst), 2);
    assert_eq!(started.elapsed(), Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_all_attempts_fail() {
    let probe = SucceedsOnAttempt::new(u32::MAX);
    let started = Instant::now();

    assert!(!check_reachable(&probe, &policy()).await);
    assert_eq!(probe.calls.load(Ordering::SeqCst), 3);
    // No pause after the last attempt.
    assert_eq!(started.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_hanging_probe_times_out_each_attempt() {
    let probe = Hangs {
        calls: AtomicU32::new(0),
    };
    let started = Instant::now();

    assert!(!check_reachable(&probe, &policy()).await);
    assert_eq!(probe.calls.load(Ordering::SeqCst), 3);
    assert_eq!(started.elapsed(), Duration::from_secs(3 * 5 + 2));
}

#[test]
fn test_policy_from_config_needs_one_attempt() {
    let config = NetworkConfig {
        attempts: 0,
        ..NetworkConfig::default()
    };
    let policy = GatePolicy::from(&config);
    assert_eq!(policy.attempts, 1);
    assert_eq!(policy.timeout, Duration::from_secs(5));
    assert_eq!(GatePolicy::default(), GatePolicy::from(&NetworkConfig::default()));
}
