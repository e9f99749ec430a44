use ota_cmd_runner::classifier::classify;
use ota_cmd_runner::models::{NormalizedResponse, Outcome, RunCounters};

#[test]
fn test_exact_match_passes() {
    let actual = NormalizedResponse::Payload("OK".to_string());
    assert_eq!(classify("OK", &actual), Outcome::Pass);
}

#[test]
fn test_comparison_is_case_sensitive() {
    let actual = NormalizedResponse::Payload("ok".to_string());
    assert_eq!(classify("OK", &actual), Outcome::Fail);
}

#[test]
fn test_empty_expected_matches_empty_payload() {
    let actual = NormalizedResponse::Payload(String::new());
    assert_eq!(classify("", &actual), Outcome::Pass);
}

#[test]
fn test_error_tags_map_to_error_outcomes() {
    assert_eq!(
        classify("OK", &NormalizedResponse::DeviceOffline),
        Outcome::DeviceOffline
    );
    assert_eq!(classify("OK", &NormalizedResponse::MqttIssue), Outcome::MqttError);
    assert_eq!(classify("OK", &NormalizedResponse::ImeiNotFound), Outcome::CheckImei);
    assert_eq!(classify("OK", &NormalizedResponse::NoResponse), Outcome::Fail);
}

#[test]
fn test_error_text_in_payload_is_a_plain_failure() {
    let actual = NormalizedResponse::Payload("Device is offline".to_string());
    assert_eq!(classify("OK", &actual), Outcome::Fail);
}

#[test]
fn test_expected_equal_to_rendering_passes() {
    assert_eq!(
        classify("Device is offline", &NormalizedResponse::DeviceOffline),
        Outcome::Pass
    );
}

#[test]
fn test_outcome_labels() {
    assert_eq!(Outcome::Pass.label(), "Pass");
    assert_eq!(Outcome::Fail.label(), "Fail");
    assert_eq!(Outcome::DeviceOffline.label(), "Device Offline");
    assert_eq!(Outcome::MqttError.label(), "MQTT Error");
    assert_eq!(Outcome::CheckImei.to_string(), "Check_IMEI");
    assert!(Outcome::CheckImei.is_error());
    assert!(!Outcome::Fail.is_error());
}

#[test]
fn test_counters_stay_consistent() {
    let mut counters = RunCounters::default();
    for outcome in [
        Outcome::Pass,
        Outcome::Fail,
        Outcome::DeviceOffline,
        Outcome::MqttError,
        Outcome::CheckImei,
        Outcome::Pass,
    ] {
        counters.record(outcome);
        assert!(counters.is_consistent());
    }
    assert_eq!(
        counters,
        RunCounters {
            executed: 6,
            passed: 2,
            failed: 1,
            errors: 3
        }
    );
}
