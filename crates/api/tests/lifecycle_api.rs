//! HTTP-level tests for the bootstrap lifecycle: status, readiness gating
//! and retry.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_empty, FixedBaseline};

// ---------------------------------------------------------------------------
// Test: LOADING gates every manifest operation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn loading_manifest_reports_not_ready() {
    let state = common::test_state(FixedBaseline::Missing, common::default_people());
    let app = common::build_test_app(state);

    let response = get(app.clone(), "/api/v1/status").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["phase"], "LOADING");
    assert_eq!(json["data"]["draftDirty"], false);

    let response = get(app.clone(), "/api/v1/manifest").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "NOT_READY");

    let response = post_empty(app, "/api/v1/reset").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// ---------------------------------------------------------------------------
// Test: Successful bootstrap
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bootstrap_without_baseline_generates_two_empty_buses() {
    let (_, app) = common::ready_app().await;

    let json = body_json(get(app.clone(), "/api/v1/status").await).await;
    assert_eq!(json["data"]["phase"], "READY");
    assert!(json["data"]["message"].is_null());

    let json = body_json(get(app, "/api/v1/manifest").await).await;
    let data = &json["data"];
    assert_eq!(data["participants"].as_array().unwrap().len(), 4);
    assert_eq!(data["buses"].as_array().unwrap().len(), 2);
    assert_eq!(data["unassigned"].as_array().unwrap().len(), 4);
    assert_eq!(data["draftDirty"], false);
    assert!(data["requestLog"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: Failed bootstrap and retry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_fetch_reports_error_with_message() {
    let (_, app) = common::ready_app_with(FixedBaseline::HttpStatus(500), vec![]).await;

    let json = body_json(get(app.clone(), "/api/v1/status").await).await;
    assert_eq!(json["data"]["phase"], "ERROR");
    assert_eq!(
        json["data"]["message"],
        "Could not establish baseline data: Failed to fetch approved manifest: HTTP 500"
    );

    let response = get(app, "/api/v1/manifest").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn invalid_baseline_reports_error() {
    let baseline = FixedBaseline::Document(r#"{"participants": []}"#.to_string());
    let (_, app) = common::ready_app_with(baseline, vec![]).await;

    let json = body_json(get(app, "/api/v1/status").await).await;
    assert_eq!(json["data"]["phase"], "ERROR");
    assert_eq!(
        json["data"]["message"],
        "Could not establish baseline data: Approved manifest file is invalid."
    );
}

#[tokio::test]
async fn retry_after_failure_is_accepted() {
    let (_, app) = common::ready_app_with(FixedBaseline::HttpStatus(503), vec![]).await;

    let response = post_empty(app.clone(), "/api/v1/bootstrap/retry").await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(response).await["data"], "LOADING");

    // The retried bootstrap runs in the background and fails again.
    let json = body_json(get(app, "/api/v1/status").await).await;
    let phase = json["data"]["phase"].as_str().unwrap();
    assert!(phase == "LOADING" || phase == "ERROR", "unexpected phase {phase}");
}

#[tokio::test]
async fn retry_when_ready_is_conflict() {
    let (_, app) = common::ready_app().await;

    let response = post_empty(app, "/api/v1/bootstrap/retry").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}
