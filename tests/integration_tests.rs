//! Integration tests using mock HTTP server
//!
//! Tests the full flow: endpoint config → request builder → HTTP → classifier → sweep report

use pagesweep::auth::basic_auth_header;
use pagesweep::config::load_config_from_str;
use pagesweep::{
    fetch_all_entities, fetch_all_entities_with, Credentials, EndpointConfig, FailureKind,
    HttpTransport, PagingPolicy, ResourceKind, SweepSettings, SweepState, Sweeper,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

/// Serves `total` VMs, capping each page at 500 like the real endpoint
struct VmList {
    total: u64,
}

impl Respond for VmList {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        let length = body["length"].as_u64().unwrap().min(500);
        let offset = body.get("offset").and_then(Value::as_u64).unwrap_or(0);
        let count = self.total.saturating_sub(offset).min(length);

        let entities: Vec<Value> = (offset..offset + count)
            .map(|i| json!({"metadata": {"uuid": format!("vm-{i}")}, "spec": {"name": format!("vm{i}")}}))
            .collect();

        ResponseTemplate::new(200).set_body_json(json!({
            "api_version": "3.1",
            "metadata": {"kind": "vm", "total_matches": self.total, "length": count, "offset": offset},
            "entities": entities
        }))
    }
}

fn endpoint(server: &MockServer) -> EndpointConfig {
    EndpointConfig::builder(
        format!("{}/api/nutanix/v3", server.uri()),
        Credentials::new("admin", "nutanix/4u"),
    )
    .timeout(Duration::from_secs(5))
    .build()
    .unwrap()
}

fn vm() -> ResourceKind {
    ResourceKind::new("vm").unwrap()
}

async fn mount_vms(server: &MockServer, total: u64) {
    Mock::given(method("POST"))
        .and(path("/api/nutanix/v3/vms/list"))
        .respond_with(VmList { total })
        .mount(server)
        .await;
}

async fn requested_offsets(server: &MockServer) -> Vec<u64> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| {
            let body: Value = serde_json::from_slice(&r.body).unwrap();
            body.get("offset").and_then(Value::as_u64).unwrap_or(0)
        })
        .collect()
}

// ============================================================================
// Wire Format Tests
// ============================================================================

#[tokio::test]
async fn test_first_request_wire_format() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/nutanix/v3/vms/list"))
        .and(header("Accept", "application/json"))
        .and(header("Content-Type", "application/json"))
        .and(header("Cache-Control", "no-cache"))
        .and(header(
            "Authorization",
            basic_auth_header("admin", "nutanix/4u").as_str(),
        ))
        .and(body_json(json!({"kind": "vm", "length": 500})))
        .respond_with(VmList { total: 3 })
        .expect(1)
        .mount(&server)
        .await;

    let report = assert_ok!(fetch_all_entities(&endpoint(&server), &vm()).await);
    assert!(report.is_complete());
    assert_eq!(report.entities.len(), 3);
}

#[tokio::test]
async fn test_follow_up_requests_carry_offset() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"kind": "vm", "length": 500, "offset": 500})))
        .respond_with(VmList { total: 700 })
        .expect(1)
        .mount(&server)
        .await;
    mount_vms(&server, 700).await;

    let report = fetch_all_entities(&endpoint(&server), &vm()).await.unwrap();
    assert_eq!(report.offsets(), vec![0, 500]);
    assert_eq!(report.accumulated(), 700);
}

#[tokio::test]
async fn test_other_kinds_use_their_collection_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/nutanix/v3/images/list"))
        .and(body_json(json!({"kind": "image", "length": 500})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": {"kind": "image", "total_matches": 1, "length": 1},
            "entities": [{"metadata": {"uuid": "img-0"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let kind = ResourceKind::new("image").unwrap();
    let report = fetch_all_entities(&endpoint(&server), &kind).await.unwrap();
    assert_eq!(report.entities[0]["metadata"]["uuid"], "img-0");
}

// ============================================================================
// Sweep Tests
// ============================================================================

#[tokio::test]
async fn test_sweep_partial_last_page() {
    let server = MockServer::start().await;
    mount_vms(&server, 1017).await;

    let report = fetch_all_entities(&endpoint(&server), &vm()).await.unwrap();

    assert_eq!(report.state, SweepState::Done);
    assert_eq!(report.total_reported, Some(1017));
    assert_eq!(requested_offsets(&server).await, vec![0, 500, 1000]);

    let lengths: Vec<u64> = report.pages.iter().map(|p| p.length).collect();
    assert_eq!(lengths, vec![500, 500, 17]);
    assert_eq!(report.entities[1016]["metadata"]["uuid"], "vm-1016");
}

#[tokio::test]
async fn test_sweep_exact_multiple_under_both_policies() {
    for (policy, offsets) in [
        (PagingPolicy::Ceiling, vec![0, 500]),
        (PagingPolicy::Floor, vec![0, 500, 1000]),
    ] {
        let server = MockServer::start().await;
        mount_vms(&server, 1000).await;

        let report = fetch_all_entities_with(
            &endpoint(&server),
            &vm(),
            SweepSettings::new().with_policy(policy),
        )
        .await
        .unwrap();

        assert!(report.is_complete());
        assert_eq!(requested_offsets(&server).await, offsets);
    }
}

#[tokio::test]
async fn test_concurrent_sweep_keeps_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"offset": 500})))
        .respond_with(VmList { total: 1700 }.delayed())
        .mount(&server)
        .await;
    mount_vms(&server, 1700).await;

    let report = fetch_all_entities_with(
        &endpoint(&server),
        &vm(),
        SweepSettings::new().with_concurrency(4),
    )
    .await
    .unwrap();

    assert!(report.is_complete());
    assert_eq!(report.offsets(), vec![0, 500, 1000, 1500]);
    let uuids: Vec<&str> = report
        .entities
        .iter()
        .map(|e| e["metadata"]["uuid"].as_str().unwrap())
        .collect();
    assert_eq!(uuids[499..502].to_vec(), vec!["vm-499", "vm-500", "vm-501"]);
    assert_eq!(uuids.len(), 1700);
}

impl VmList {
    fn delayed(self) -> Delayed {
        Delayed(self)
    }
}

/// Answers like [`VmList`] but slowly, so later pages finish first
struct Delayed(VmList);

impl Respond for Delayed {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        self.0
            .respond(request)
            .set_delay(Duration::from_millis(300))
    }
}

// ============================================================================
// Failure Tests
// ============================================================================

#[tokio::test]
async fn test_unauthorized_is_network_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "api_version": "3.1",
            "code": 401,
            "message_list": [{"message": "Authentication required.", "reason": "AUTHENTICATION_REQUIRED"}],
            "state": "ERROR"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let report = fetch_all_entities(&endpoint(&server), &vm()).await.unwrap();

    assert_eq!(report.state, SweepState::Failed);
    let failure = report.failure.clone().unwrap();
    assert_eq!(failure.iteration, 0);
    assert_eq!(failure.failure.kind, FailureKind::Network);
    assert_eq!(failure.failure.status, Some(401));
    assert_eq!(failure.failure.detail, "HTTP 401: Authentication required.");

    let err = assert_err!(report.into_result());
    assert!(err.to_string().contains("iteration #0"));
}

#[tokio::test]
async fn test_timeout_mid_sweep_keeps_earlier_pages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"offset": 1000})))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    mount_vms(&server, 1017).await;

    let endpoint = EndpointConfig::builder(
        format!("{}/api/nutanix/v3", server.uri()),
        Credentials::new("admin", "nutanix/4u"),
    )
    .timeout(Duration::from_millis(300))
    .build()
    .unwrap();

    let report = fetch_all_entities(&endpoint, &vm()).await.unwrap();

    assert_eq!(report.state, SweepState::Failed);
    assert_eq!(report.entities.len(), 1000);

    let (entities, total, failure) = report.into_parts();
    assert_eq!(entities.len(), 1000);
    assert_eq!(total, Some(1017));
    let failure = failure.unwrap();
    assert_eq!(failure.iteration, 2);
    assert_eq!(failure.failure.kind, FailureKind::Network);
    assert_eq!(failure.failure.detail, "Request timeout after 300ms");
}

#[tokio::test]
async fn test_malformed_body_is_parse_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let report = fetch_all_entities(&endpoint(&server), &vm()).await.unwrap();
    let failure = report.failure.unwrap();
    assert_eq!(failure.failure.kind, FailureKind::Parse);
    assert!(report.pages.is_empty());
}

#[tokio::test]
async fn test_bad_request_is_protocol_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_string("bad kind"))
        .mount(&server)
        .await;

    let report = fetch_all_entities(&endpoint(&server), &vm()).await.unwrap();
    assert_eq!(report.failure.unwrap().failure.kind, FailureKind::Protocol);
}

// ============================================================================
// Config Integration Tests
// ============================================================================

#[tokio::test]
async fn test_sweep_from_parameter_file() {
    let server = MockServer::start().await;
    mount_vms(&server, 1234).await;

    let yaml = format!(
        r"
base_url: {}/api/nutanix/v3
username: admin
password: secret
timeout_ms: 2000
paging:
  page_size: 500
  policy: floor
  concurrency: 2
  collect_entities: false
  requests_per_second: 50
",
        server.uri()
    );
    let config = load_config_from_str(&yaml).unwrap();
    let endpoint = config.endpoint(config.password.clone().unwrap()).unwrap();

    let client = pagesweep::http::HttpClientConfig::builder()
        .rate_limit(config.rate_limit().unwrap())
        .build();
    let transport = HttpTransport::with_config(&endpoint, client).unwrap();
    let report = Sweeper::new(transport, endpoint)
        .with_settings(config.sweep_settings())
        .unwrap()
        .sweep(&vm())
        .await;

    assert!(report.is_complete());
    assert!(report.entities.is_empty());
    assert_eq!(report.policy, PagingPolicy::Floor);
    assert_eq!(requested_offsets(&server).await, vec![0, 500, 1000]);
}
