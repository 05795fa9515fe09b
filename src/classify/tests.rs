//! Tests for the classify module

use super::*;
use crate::http::{RawResponse, TransportError};
use serde_json::json;
use test_case::test_case;

fn ok(body: serde_json::Value) -> RawResponse {
    RawResponse::new(200, body.to_string())
}

// ============================================================================
// Success Tests
// ============================================================================

#[test]
fn test_classify_success() {
    let result = classify(&ok(json!({
        "api_version": "3.1",
        "metadata": {"kind": "vm", "total_matches": 1017, "length": 2, "offset": 1000},
        "entities": [{"metadata": {"uuid": "a"}}, {"metadata": {"uuid": "b"}}]
    })));

    let PageResult::Success(page) = result else {
        panic!("Expected Success");
    };
    assert_eq!(page.total_matches, 1017);
    assert_eq!(page.length, 2);
    assert_eq!(page.offset, 1000);
    assert_eq!(page.entities.len(), 2);
    assert_eq!(page.entities[1]["metadata"]["uuid"], "b");
}

#[test]
fn test_classify_created_status_is_success() {
    let result = classify(&RawResponse::new(
        201,
        json!({"metadata": {"total_matches": 0, "length": 0}}).to_string(),
    ));
    assert!(result.is_success());
    assert_eq!(result.length(), 0);
    assert_eq!(result.total_matches(), Some(0));
    assert!(result.failure().is_none());
}

#[test]
fn test_classify_without_entities_array() {
    let result = classify(&ok(json!({
        "metadata": {"total_matches": 12, "length": 12}
    })));

    let PageResult::Success(page) = result else {
        panic!("Expected Success");
    };
    assert_eq!(page.length, 12);
    assert_eq!(page.offset, 0);
    assert!(page.entities.is_empty());
}

#[test]
fn test_classify_counts_beyond_16_bits() {
    let result = classify(&ok(json!({
        "metadata": {"total_matches": 70_000, "length": 500}
    })));
    assert_eq!(result.total_matches(), Some(70_000));

    let result = classify(&ok(json!({
        "metadata": {"total_matches": 5_000_000_000_u64, "length": 500}
    })));
    assert_eq!(result.total_matches(), Some(5_000_000_000));
}

// ============================================================================
// Parse Failure Tests
// ============================================================================

#[test_case("not json at all"; "not json")]
#[test_case("{}"; "empty object")]
#[test_case(r#"{"metadata": {}}"#; "empty metadata")]
#[test_case(r#"{"metadata": {"length": 10}}"#; "missing total")]
#[test_case(r#"{"metadata": {"total_matches": 10}}"#; "missing length")]
#[test_case(r#"{"metadata": {"total_matches": "ten", "length": 10}}"#; "string total")]
#[test_case(r#"{"metadata": {"total_matches": -1, "length": 0}}"#; "negative total")]
#[test_case(r#"{"metadata": {"total_matches": 10, "length": 10}, "entities": {}}"#; "entities not array")]
fn test_classify_parse_failure(body: &str) {
    let result = classify(&RawResponse::new(200, body));

    let failure = result.failure().expect("Expected Failure");
    assert_eq!(failure.kind, FailureKind::Parse);
    assert_eq!(failure.status, Some(200));
    assert!(failure.detail.starts_with("Unexpected list response shape"));
    assert_eq!(result.total_matches(), None);
}

// ============================================================================
// Status Failure Tests
// ============================================================================

#[test_case(401, FailureKind::Network)]
#[test_case(403, FailureKind::Network)]
#[test_case(408, FailureKind::Network)]
#[test_case(429, FailureKind::Network)]
#[test_case(500, FailureKind::Network)]
#[test_case(503, FailureKind::Network)]
#[test_case(400, FailureKind::Protocol)]
#[test_case(404, FailureKind::Protocol)]
#[test_case(422, FailureKind::Protocol)]
#[test_case(302, FailureKind::Protocol)]
fn test_classify_status(status: u16, expected: FailureKind) {
    let result = classify(&RawResponse::new(status, "nope"));
    let failure = result.failure().expect("Expected Failure");
    assert_eq!(failure.kind, expected);
    assert_eq!(failure.status, Some(status));
    assert_eq!(failure.detail, format!("HTTP {status}: nope"));
}

#[test]
fn test_classify_uses_api_error_messages() {
    let body = json!({
        "api_version": "3.1",
        "code": 401,
        "message_list": [
            {"message": "Authentication required.", "reason": "AUTHENTICATION_REQUIRED"}
        ],
        "state": "ERROR"
    });
    let result = classify(&RawResponse::new(401, body.to_string()));
    let failure = result.failure().unwrap();
    assert_eq!(failure.detail, "HTTP 401: Authentication required.");
    assert_eq!(
        failure.to_string(),
        "network error: HTTP 401: Authentication required."
    );
}

#[test]
fn test_classify_truncates_long_bodies() {
    let body = "x".repeat(2000);
    let result = classify(&RawResponse::new(500, body));
    let detail = &result.failure().unwrap().detail;
    assert!(detail.ends_with("..."));
    assert!(detail.len() < 600);
}

// ============================================================================
// Transport Error Conversion Tests
// ============================================================================

#[test]
fn test_transport_errors_stay_distinct() {
    let network: PageFailure = TransportError::network("Request timeout after 5000ms").into();
    let protocol: PageFailure = TransportError::protocol("bad body").into();
    let other: PageFailure = TransportError::unclassified("???").into();

    assert_eq!(network.kind, FailureKind::Network);
    assert_eq!(network.detail, "Request timeout after 5000ms");
    assert_eq!(network.status, None);
    assert_eq!(protocol.kind, FailureKind::Protocol);
    assert_eq!(other.kind, FailureKind::Unclassified);

    let result: PageResult = TransportError::network("down").into();
    assert!(!result.is_success());
    assert_eq!(result.length(), 0);
}

#[test]
fn test_failure_serializes_without_missing_status() {
    let failure = PageFailure::new(FailureKind::Network, "down");
    assert_eq!(
        serde_json::to_value(&failure).unwrap(),
        json!({"kind": "network", "detail": "down"})
    );
}
