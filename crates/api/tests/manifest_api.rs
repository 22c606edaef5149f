//! HTTP-level integration tests for seating, diff and export endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::header::CONTENT_DISPOSITION;
use axum::http::StatusCode;
use axum::Router;
use common::{body_json, body_text, get, post_empty, post_json, post_text, put_json};
use serde_json::{json, Value};

fn seat(bus_id: u32, seat_number: &str) -> Value {
    json!({"kind": "seat", "busId": bus_id, "seatId": format!("B{bus_id}-{seat_number}")})
}

async fn move_to(app: &Router, person_id: &str, destination: Value) -> Value {
    let response = post_json(
        app.clone(),
        "/api/v1/moves",
        json!({"personId": person_id, "destination": destination}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

fn disposition(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(CONTENT_DISPOSITION)
        .expect("attachment header")
        .to_str()
        .unwrap()
        .to_string()
}

// ---------------------------------------------------------------------------
// Moves
// ---------------------------------------------------------------------------

#[tokio::test]
async fn move_into_vacant_seat_marks_draft_dirty() {
    let (_, app) = common::ready_app().await;

    let outcome = move_to(&app, "S1", seat(1, "1A")).await;
    assert_eq!(outcome["outcome"], "placed");
    assert_eq!(outcome["slot"]["seatId"], "B1-1A");

    let diff = body_json(get(app.clone(), "/api/v1/diff").await).await;
    assert_eq!(diff["data"]["changedCount"], 1);
    assert_eq!(diff["data"]["summary"], "Modified 1 seat assignment(s).");
    assert_eq!(diff["data"]["changes"][0]["status"], "added");
    assert_eq!(diff["data"]["changes"][0]["draft"], "S1");

    let status = body_json(get(app.clone(), "/api/v1/status").await).await;
    assert_eq!(status["data"]["draftDirty"], true);

    let manifest = body_json(get(app, "/api/v1/manifest").await).await;
    let unassigned = manifest["data"]["unassigned"].as_array().unwrap();
    assert_eq!(unassigned.len(), 3);
    assert!(!unassigned.contains(&json!("S1")));
}

#[tokio::test]
async fn move_onto_occupied_seat_swaps() {
    let (_, app) = common::ready_app().await;
    move_to(&app, "S1", seat(1, "1A")).await;
    move_to(&app, "S2", seat(1, "1B")).await;

    let outcome = move_to(&app, "S1", seat(1, "1B")).await;
    assert_eq!(outcome["outcome"], "swapped");
    assert_eq!(outcome["displaced"], "S2");
    assert_eq!(outcome["displacedTo"]["seatId"], "B1-1A");
}

#[tokio::test]
async fn move_from_pool_onto_occupied_seat_evicts() {
    let (_, app) = common::ready_app().await;
    move_to(&app, "S1", seat(1, "1A")).await;

    let outcome = move_to(&app, "S2", seat(1, "1A")).await;
    assert_eq!(outcome["outcome"], "evicted");
    assert_eq!(outcome["displaced"], "S1");
}

#[tokio::test]
async fn move_to_pool_and_special_role() {
    let (_, app) = common::ready_app().await;
    let driver = json!({"kind": "special", "busId": 2, "role": "DRIVER"});

    let outcome = move_to(&app, "S3", driver).await;
    assert_eq!(outcome["outcome"], "placed");

    let outcome = move_to(&app, "S3", Value::Null).await;
    assert_eq!(outcome["outcome"], "unassigned");
    assert_eq!(outcome["from"]["role"], "DRIVER");

    let outcome = move_to(&app, "S3", Value::Null).await;
    assert_eq!(outcome["outcome"], "unchanged");
    assert_eq!(outcome["reason"], "already_unassigned");
}

#[tokio::test]
async fn move_to_unknown_seat_is_unchanged() {
    let (_, app) = common::ready_app().await;

    let outcome = move_to(&app, "S1", seat(7, "1A")).await;
    assert_eq!(outcome["outcome"], "unchanged");
    assert_eq!(outcome["reason"], "unknown_destination");
}

#[tokio::test]
async fn move_of_unknown_person_returns_404() {
    let (_, app) = common::ready_app().await;
    let response = post_json(
        app,
        "/api/v1/moves",
        json!({"personId": "NOBODY", "destination": seat(1, "1A")}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Bus views
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bus_roster_lists_seated_people_in_seat_order() {
    let (_, app) = common::ready_app().await;
    move_to(&app, "S2", seat(1, "2A")).await;
    move_to(&app, "S1", seat(1, "1A")).await;
    move_to(&app, "S4", json!({"kind": "special", "busId": 1, "role": "TOUR_LEADER"})).await;

    let json = body_json(get(app, "/api/v1/buses/1/roster").await).await;
    let rows = json["data"].as_array().unwrap();
    let labels: Vec<&str> = rows.iter().map(|r| r["seatLabel"].as_str().unwrap()).collect();
    assert_eq!(labels, ["1A", "2A", "TL"]);
    assert_eq!(rows[0]["person"]["id"], "S1");
}

#[tokio::test]
async fn bus_dirty_flags_cover_every_slot() {
    let (_, app) = common::ready_app().await;
    move_to(&app, "S1", seat(1, "1A")).await;

    let json = body_json(get(app, "/api/v1/buses/1/dirty").await).await;
    let flags = json["data"].as_array().unwrap();
    assert_eq!(flags.len(), 61);

    let dirty: Vec<&Value> = flags.iter().filter(|f| f["dirty"] == true).collect();
    assert_eq!(dirty.len(), 1);
    assert_eq!(dirty[0]["occupant"], "S1");
}

#[tokio::test]
async fn unknown_bus_returns_404() {
    let (_, app) = common::ready_app().await;

    let response = get(app.clone(), "/api/v1/buses/9/roster").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json(app, "/api/v1/buses/9/random-fill", json!({})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Random fill
// ---------------------------------------------------------------------------

#[tokio::test]
async fn random_fill_seats_everyone_unassigned() {
    let (_, app) = common::ready_app().await;

    let response = post_json(app.clone(), "/api/v1/buses/2/random-fill", json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["busId"], 2);
    assert_eq!(data["unassignedBefore"], 4);
    assert_eq!(data["vacantBefore"], 59);
    assert_eq!(data["assignments"].as_array().unwrap().len(), 4);

    let manifest = body_json(get(app.clone(), "/api/v1/manifest").await).await;
    assert!(manifest["data"]["unassigned"].as_array().unwrap().is_empty());

    // Nobody left to seat.
    let data = body_json(post_json(app, "/api/v1/buses/1/random-fill", json!({})).await).await;
    assert!(data["data"]["assignments"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Reset
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reset_restores_approved_seating() {
    let (_, app) = common::ready_app().await;
    move_to(&app, "S1", seat(1, "1A")).await;

    let response = post_json(app.clone(), "/api/v1/reset", json!({})).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let diff = body_json(get(app, "/api/v1/diff").await).await;
    assert_eq!(diff["data"]["changedCount"], 0);
    assert_eq!(diff["data"]["summary"], "No changes made.");
}

// ---------------------------------------------------------------------------
// Approve / request
// ---------------------------------------------------------------------------

#[tokio::test]
async fn approve_without_author_returns_no_content() {
    let (_, app) = common::ready_app().await;

    let response = post_json(app.clone(), "/api/v1/approve", json!({})).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(app.clone(), "/api/v1/approve", json!({"author": "   "})).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let manifest = body_json(get(app, "/api/v1/manifest").await).await;
    assert!(manifest["data"]["requestLog"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn approve_and_request_without_body_return_no_content() {
    let (_, app) = common::ready_app().await;
    move_to(&app, "S1", seat(1, "1A")).await;

    let response = post_empty(app.clone(), "/api/v1/approve").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_empty(app.clone(), "/api/v1/request").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let manifest = body_json(get(app, "/api/v1/manifest").await).await;
    assert!(manifest["data"]["requestLog"].as_array().unwrap().is_empty());
    assert_eq!(manifest["data"]["draftDirty"], true);
}

#[tokio::test]
async fn approve_downloads_document_with_log_entry() {
    let (_, app) = common::ready_app().await;
    move_to(&app, "S1", seat(1, "1A")).await;

    let response = post_json(app.clone(), "/api/v1/approve", json!({"author": " Dewi "})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        disposition(&response),
        "attachment; filename=\"bus_manifest_approved.json\""
    );

    let document: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(document["participants"].as_array().unwrap().len(), 4);
    assert_eq!(document["buses"][0]["seats"][0]["participantId"], "S1");

    let log = document["requestLog"].as_array().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0]["type"], "APPROVAL");
    assert_eq!(log[0]["author"], "Dewi");
    assert_eq!(
        log[0]["summary"],
        "Approved changes. Modified 1 seat assignment(s)."
    );

    let manifest = body_json(get(app, "/api/v1/manifest").await).await;
    assert_eq!(manifest["data"]["requestLog"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn request_on_clean_draft_returns_no_content() {
    let (_, app) = common::ready_app().await;

    let response = post_json(app, "/api/v1/request", json!({"author": "Dewi"})).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn request_with_changes_downloads_dated_document() {
    let (_, app) = common::ready_app().await;
    move_to(&app, "S2", seat(2, "3C")).await;

    let response = post_json(app, "/api/v1/request", json!({"author": "Rina"})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let header = disposition(&response);
    assert!(header.starts_with("attachment; filename=\"bus-manifest-request-"));
    assert!(header.ends_with(".json\""));

    let document: Value = serde_json::from_str(&body_text(response).await).unwrap();
    let log = document["requestLog"].as_array().unwrap();
    assert_eq!(log[0]["type"], "REQUEST");
    assert_eq!(log[0]["summary"], "Modified 1 seat assignment(s).");
}

// ---------------------------------------------------------------------------
// Export / import
// ---------------------------------------------------------------------------

#[tokio::test]
async fn exported_draft_can_be_imported_back() {
    let (_, app) = common::ready_app().await;
    move_to(&app, "S1", seat(1, "1A")).await;

    let response = get(app.clone(), "/api/v1/export/draft").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        disposition(&response),
        "attachment; filename=\"bus-manifest-draft.json\""
    );
    let exported = body_text(response).await;

    post_json(app.clone(), "/api/v1/reset", json!({})).await;

    let response = post_text(app.clone(), "/api/v1/import", &exported).await;
    assert_eq!(response.status(), StatusCode::OK);
    let summary = body_json(response).await["data"].clone();
    assert_eq!(summary["participants"], 4);
    assert_eq!(summary["buses"], 2);
    assert!(summary["warnings"].as_array().unwrap().is_empty());

    let diff = body_json(get(app, "/api/v1/diff").await).await;
    assert_eq!(diff["data"]["changedCount"], 1);
}

#[tokio::test]
async fn import_without_buses_is_rejected() {
    let (_, app) = common::ready_app().await;

    let response = post_text(app.clone(), "/api/v1/import", r#"{"participants": []}"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Invalid file format.");

    // The rejected document left the roster alone.
    let manifest = body_json(get(app, "/api/v1/manifest").await).await;
    assert_eq!(manifest["data"]["participants"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn import_of_malformed_json_is_rejected() {
    let (_, app) = common::ready_app().await;

    let response = post_text(app, "/api/v1/import", "{not json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().starts_with("Invalid JSON"));
}

// ---------------------------------------------------------------------------
// Photo update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn photo_update_replaces_url() {
    let (_, app) = common::ready_app().await;

    let response = put_json(
        app.clone(),
        "/api/v1/participants/S1/photo",
        json!({"photoUrl": "https://example.org/s1.jpg"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], "S1");
    assert_eq!(json["data"]["photoUrl"], "https://example.org/s1.jpg");

    let manifest = body_json(get(app, "/api/v1/manifest").await).await;
    assert_eq!(
        manifest["data"]["participants"][0]["photoUrl"],
        "https://example.org/s1.jpg"
    );
}

#[tokio::test]
async fn photo_update_rejects_empty_url_and_unknown_person() {
    let (_, app) = common::ready_app().await;

    let response = put_json(
        app.clone(),
        "/api/v1/participants/S1/photo",
        json!({"photoUrl": "  "}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(
        app,
        "/api/v1/participants/NOBODY/photo",
        json!({"photoUrl": "https://example.org/x.jpg"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
