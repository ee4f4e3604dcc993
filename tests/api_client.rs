//! ApiClient against a stub paper API served by axum on a random port.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::json;

use galaxy_core::{
    BackOutcome, Breadth, DrillOutcome, FetchError, HeadlessScene, LoadOutcome, NavigatorConfig,
    PaperSource,
};
use galaxy_nav::{ApiClient, GalaxySession};
use pretty_assertions::assert_eq;

#[derive(Clone, Default)]
struct StubState {
    hits: Arc<Mutex<Vec<String>>>,
}

impl StubState {
    fn record(&self, hit: String) {
        if let Ok(mut hits) = self.hits.lock() {
            hits.push(hit);
        }
    }

    fn hits(&self) -> Vec<String> {
        self.hits.lock().map(|h| h.clone()).unwrap_or_default()
    }
}

fn paper(id: &str, citations: u32) -> serde_json::Value {
    json!({
        "id": id,
        "title": format!("Paper {id}"),
        "authors": ["A. Author"],
        "year": 2020,
        "citationCount": citations,
        "doi": null
    })
}

async fn field_papers(
    State(state): State<StubState>,
    Path(field): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let fallback = query.get("fallback").map(String::as_str) == Some("true");
    state.record(format!("field:{field}:{fallback}"));

    match (field.as_str(), fallback) {
        ("ml", _) => Json(json!({
            "papers": [paper("W0", 0), paper("W10", 10), paper("W100", 100)]
        }))
        .into_response(),
        ("sparse", false) => Json(json!({
            "papers": [paper("S1", 3)],
            "reason": "too_few_results"
        }))
        .into_response(),
        ("sparse", true) => Json(json!({
            "papers": [paper("S1", 3), paper("S2", 4), paper("S3", 5)]
        }))
        .into_response(),
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn references(
    State(state): State<StubState>,
    Path(paper_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let broaden = query.get("broaden").map(String::as_str) == Some("true");
    state.record(format!("refs:{paper_id}:{broaden}"));

    match paper_id.as_str() {
        "W100" => Json(json!({ "papers": [paper("R1", 1), paper("R2", 2)] })).into_response(),
        "W0" => Json(json!({ "papers": [] })).into_response(),
        "garbled" => "not json".into_response(),
        other => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": format!("work {other} not found") })),
        )
            .into_response(),
    }
}

/// Start the stub and return its base URL.
async fn spawn_stub(state: StubState) -> String {
    let app = Router::new()
        .route("/api/fields/:field/papers", get(field_papers))
        .route("/api/papers/:id/references", get(references))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base: &str) -> ApiClient {
    ApiClient::new(base, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn fetches_field_papers() {
    let stub = StubState::default();
    let api = client(&spawn_stub(stub.clone()).await);

    let set = api.field_papers("ml", Breadth::Strict).await.unwrap();
    assert_eq!(set.len(), 3);
    assert_eq!(set.papers[2].id, "W100");
    assert_eq!(set.papers[2].citation_count, 100);
    assert_eq!(set.papers[0].year, Some(2020));
    assert!(!set.signals_too_few());
    assert_eq!(stub.hits(), vec!["field:ml:false".to_string()]);
}

#[tokio::test]
async fn broadened_requests_carry_query_flags() {
    let stub = StubState::default();
    let api = client(&spawn_stub(stub.clone()).await);

    let strict = api.field_papers("sparse", Breadth::Strict).await.unwrap();
    assert!(strict.signals_too_few());
    let broad = api.field_papers("sparse", Breadth::Broad).await.unwrap();
    assert_eq!(broad.len(), 3);
    api.references("W100", Breadth::Broad).await.unwrap();

    assert_eq!(
        stub.hits(),
        vec![
            "field:sparse:false".to_string(),
            "field:sparse:true".to_string(),
            "refs:W100:true".to_string(),
        ]
    );
}

#[tokio::test]
async fn error_body_message_is_used_verbatim() {
    let api = client(&spawn_stub(StubState::default()).await);

    let err = api.references("W404", Breadth::Strict).await.unwrap_err();
    assert_eq!(
        err,
        FetchError::Status {
            status: 404,
            message: "work W404 not found".into()
        }
    );
    assert_eq!(err.to_string(), "work W404 not found");
}

#[tokio::test]
async fn bare_error_status_gets_generic_message() {
    let api = client(&spawn_stub(StubState::default()).await);

    let err = api.field_papers("broken", Breadth::Strict).await.unwrap_err();
    assert_eq!(err.to_string(), "request failed with status 500");
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let api = client(&spawn_stub(StubState::default()).await);

    let err = api.references("garbled", Breadth::Strict).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(&format!("http://{addr}"));
    let err = api.field_papers("ml", Breadth::Strict).await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
}

#[tokio::test]
async fn session_navigates_over_http() {
    let stub = StubState::default();
    let api = client(&spawn_stub(stub.clone()).await);
    let config = NavigatorConfig {
        min_root_papers: 1,
        pre_zoom_ms: 10,
        transition_ms: 20,
        fade_ms: 20,
        back_wait_ms: 10,
        ..Default::default()
    };
    let mut session = GalaxySession::new(Arc::new(api), config, HeadlessScene::new)
        .with_render_loop(Duration::from_millis(5));

    assert!(matches!(
        session.select_field("ml").await,
        LoadOutcome::Loaded { papers: 3, .. }
    ));

    let outcome = session.request_drill_in("W0").await;
    assert!(matches!(outcome, DrillOutcome::NoReferences { cached: false, .. }));
    let outcome = session.request_drill_in("W0").await;
    assert!(matches!(outcome, DrillOutcome::NoReferences { cached: true, .. }));

    let outcome = session.request_drill_in("W100").await;
    assert!(matches!(outcome, DrillOutcome::Entered { references: 2, .. }));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(
        session.request_back().await,
        BackOutcome::Returned { depth: 0.0 }
    );

    let status = session.status().unwrap();
    assert_eq!(status.navigation_stack_size, 0);
    assert_eq!(status.layer_count, 1);

    let reference_hits = stub
        .hits()
        .into_iter()
        .filter(|h| h.starts_with("refs:W0:"))
        .count();
    assert_eq!(reference_hits, 1);
}
