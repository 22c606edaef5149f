#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use busmanifest_api::bootstrap::run_bootstrap;
use busmanifest_api::config::{BaselineLocation, ServerConfig};
use busmanifest_api::router::build_app_router;
use busmanifest_api::state::AppState;
use busmanifest_core::error::SourceError;
use busmanifest_core::roster::{Person, PersonDetails};
use busmanifest_core::sources::{BaselineFetch, BaselineSource, MemoryDraftStore, RosterGenerator};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Baseline source that always answers the same way.
pub enum FixedBaseline {
    Missing,
    Document(String),
    HttpStatus(u16),
}

#[async_trait]
impl BaselineSource for FixedBaseline {
    async fn fetch(&self) -> Result<BaselineFetch, SourceError> {
        match self {
            Self::Missing => Ok(BaselineFetch::NotFound),
            Self::Document(text) => Ok(BaselineFetch::Found(text.clone())),
            Self::HttpStatus(status) => Err(SourceError::Status(*status)),
        }
    }
}

/// Roster generator returning a fixed list of people.
pub struct StaticGenerator(pub Vec<Person>);

#[async_trait]
impl RosterGenerator for StaticGenerator {
    async fn generate(&self) -> Result<Vec<Person>, SourceError> {
        Ok(self.0.clone())
    }
}

pub fn student(id: &str) -> Person {
    Person {
        id: id.to_string(),
        name: format!("Student {id}"),
        photo_url: String::new(),
        details: PersonDetails::Student {
            nim: id.to_string(),
            program: "S1 MANAJEMEN (IV)".to_string(),
        },
    }
}

/// Four students: `S1` through `S4`.
pub fn default_people() -> Vec<Person> {
    (1..=4).map(|n| student(&format!("S{n}"))).collect()
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults and a fixed random seed.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        baseline: BaselineLocation::Path("unused.json".into()),
        roster_source_path: "unused-participants.json".into(),
        draft_dir: "unused-draft".into(),
        random_seed: Some(7),
    }
}

/// Application state wired to in-memory fakes.
pub fn test_state(baseline: FixedBaseline, people: Vec<Person>) -> AppState {
    AppState::new(
        test_config(),
        Arc::new(baseline),
        Arc::new(StaticGenerator(people)),
        Arc::new(MemoryDraftStore::default()),
    )
}

/// Build the full application router around `state`, using the same
/// middleware stack as `main.rs`.
pub fn build_test_app(state: AppState) -> Router {
    build_app_router(state, &test_config())
}

/// A `READY` app bootstrapped from a missing baseline and the default people.
pub async fn ready_app() -> (AppState, Router) {
    ready_app_with(FixedBaseline::Missing, default_people()).await
}

pub async fn ready_app_with(baseline: FixedBaseline, people: Vec<Person>) -> (AppState, Router) {
    let state = test_state(baseline, people);
    run_bootstrap(state.clone()).await;
    let app = build_test_app(state.clone());
    (state, app)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, Body::empty(), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(
        app,
        Method::POST,
        uri,
        Body::from(body.to_string()),
        Some("application/json"),
    )
    .await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(
        app,
        Method::PUT,
        uri,
        Body::from(body.to_string()),
        Some("application/json"),
    )
    .await
}

pub async fn post_text(app: Router, uri: &str, body: &str) -> Response {
    send(
        app,
        Method::POST,
        uri,
        Body::from(body.to_string()),
        Some("text/plain"),
    )
    .await
}

pub async fn post_empty(app: Router, uri: &str) -> Response {
    send(app, Method::POST, uri, Body::empty(), None).await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Body,
    content_type: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
