//! Integration tests for the HTTP API.
//!
//! These tests serve the real router on an ephemeral port and verify:
//! - The JSON contract of `POST /api/check-redirects`
//! - 400 responses for malformed bodies and invalid URLs
//! - Soft trace failures still answering 200 with the partial chain
//! - CORS headers and the `/status` counters

use std::sync::Arc;

use redirect_monitor::initialization::init_trace_client;
use redirect_monitor::server::{build_router, AppState};
use redirect_monitor::{Config, RedirectTracer, TraceStats};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper function to serve the API router on an ephemeral port and return
/// its base URL.
async fn spawn_api_server() -> String {
    let config = Config {
        timeout_seconds: 5,
        ..Default::default()
    };
    let client = init_trace_client(&config).expect("Failed to build trace client");
    let stats = Arc::new(TraceStats::new());
    let tracer = RedirectTracer::new(client, config.max_hops, stats);
    let app = build_router(AppState::new(tracer));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read listener address");
    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Test API server failed");
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn test_check_redirects_success_contract() {
    let upstream = MockServer::start().await;
    let uri = upstream.uri();
    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", format!("{uri}/end").as_str()),
        )
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/end"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&upstream)
        .await;

    let api = spawn_api_server().await;
    let response = reqwest::Client::new()
        .post(format!("{api}/api/check-redirects"))
        .json(&json!({ "url": format!("{uri}/start") }))
        .send()
        .await
        .expect("Request should reach the API");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Body should be JSON");

    assert_eq!(body["original_url"], format!("{uri}/start"));
    assert_eq!(body["final_url"], format!("{uri}/end"));
    assert_eq!(body["success"], true);
    assert_eq!(body["total_steps"], 2);
    assert!(body.get("error").is_none(), "error must be omitted on success");

    let steps = body["steps"].as_array().expect("steps should be an array");
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0]["sequence"], 1);
    assert_eq!(steps[0]["status_code"], 301);
    assert_eq!(steps[0]["url"], format!("{uri}/start"));
    assert_eq!(steps[0]["headers"]["Location"], format!("{uri}/end"));
    assert_eq!(steps[1]["sequence"], 2);
    assert_eq!(steps[1]["status_code"], 200);
    assert!(
        steps[1].get("headers").is_none(),
        "headers must be omitted when nothing was captured"
    );

    // Timestamps use a fixed wall-clock format
    let timestamp = steps[0]["timestamp"]
        .as_str()
        .expect("timestamp should be a string");
    assert!(
        chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").is_ok(),
        "Unexpected timestamp format: {timestamp}"
    );

    let duration = body["total_duration"]
        .as_str()
        .expect("total_duration should be a string");
    assert!(
        duration.ends_with("ns")
            || duration.ends_with("µs")
            || duration.ends_with("ms")
            || duration.ends_with('s'),
        "Unexpected duration format: {duration}"
    );
    assert!(steps[0]["elapsed_ms"].is_u64());
}

#[tokio::test]
async fn test_invalid_url_answers_400() {
    let api = spawn_api_server().await;
    let response = reqwest::Client::new()
        .post(format!("{api}/api/check-redirects"))
        .json(&json!({ "url": "not a valid url at all" }))
        .send()
        .await
        .expect("Request should reach the API");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Body should be JSON");
    assert_eq!(body["error"], "Invalid URL format");
}

#[tokio::test]
async fn test_malformed_body_answers_400() {
    let api = spawn_api_server().await;
    let response = reqwest::Client::new()
        .post(format!("{api}/api/check-redirects"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Request should reach the API");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Body should be JSON");
    assert_eq!(body["error"], "Invalid request format");
}

#[tokio::test]
async fn test_body_missing_url_field_answers_400() {
    let api = spawn_api_server().await;
    let response = reqwest::Client::new()
        .post(format!("{api}/api/check-redirects"))
        .json(&json!({ "target": "https://example.com" }))
        .send()
        .await
        .expect("Request should reach the API");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Body should be JSON");
    assert_eq!(body["error"], "Invalid request format");
}

#[tokio::test]
async fn test_soft_failure_still_answers_200() {
    let upstream = MockServer::start().await;
    let uri = upstream.uri();
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", format!("{uri}/loop").as_str()),
        )
        .mount(&upstream)
        .await;

    let api = spawn_api_server().await;
    let response = reqwest::Client::new()
        .post(format!("{api}/api/check-redirects"))
        .json(&json!({ "url": format!("{uri}/loop") }))
        .send()
        .await
        .expect("Request should reach the API");

    // The trace failed but the request did not
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Body should be JSON");
    assert_eq!(body["success"], false);
    assert_eq!(body["total_steps"], 1);
    let error = body["error"].as_str().expect("error should be present");
    assert!(error.contains("Redirect loop detected"));
    assert_eq!(body["steps"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let api = spawn_api_server().await;
    let response = reqwest::Client::new()
        .get(format!("{api}/status"))
        .header("Origin", "http://browser.example")
        .send()
        .await
        .expect("Request should reach the API");

    assert_eq!(response.status(), 200);
    let allow_origin = response
        .headers()
        .get("access-control-allow-origin")
        .expect("CORS header should be present");
    assert_eq!(allow_origin, "*");
}

#[tokio::test]
async fn test_status_counters_advance() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&upstream)
        .await;

    let api = spawn_api_server().await;
    let http = reqwest::Client::new();

    let before: Value = http
        .get(format!("{api}/status"))
        .send()
        .await
        .expect("Status request should succeed")
        .json()
        .await
        .expect("Status body should be JSON");
    assert_eq!(before["total_traces"], 0);

    // One successful trace, one rejected input
    http.post(format!("{api}/api/check-redirects"))
        .json(&json!({ "url": upstream.uri() }))
        .send()
        .await
        .expect("Trace request should succeed");
    http.post(format!("{api}/api/check-redirects"))
        .json(&json!({ "url": "definitely not a url" }))
        .send()
        .await
        .expect("Trace request should succeed");

    let after: Value = http
        .get(format!("{api}/status"))
        .send()
        .await
        .expect("Status request should succeed")
        .json()
        .await
        .expect("Status body should be JSON");

    assert_eq!(after["total_traces"], 2);
    assert_eq!(after["successful_traces"], 1);
    assert_eq!(after["failed_traces"], 1);
    assert_eq!(after["errors"]["invalid_url"], 1);
    assert!(after["uptime_seconds"].as_f64().expect("uptime") >= 0.0);
    assert!(after["rate_per_minute"].as_f64().is_some());
    assert!(after["warnings"]["total"].is_u64());
    assert!(after["info"]["total"].is_u64());
}
