// path: services/api/tests/helpers.rs
#![allow(dead_code)]

use api_lib::adapters::{
    InMemoryAnnotationStore, InMemoryDocumentStore, InMemorySearchIndex, InMemorySummaryStore,
    SimulatedLatency, TemplateSummarizer,
};
use api_lib::config::Config;
use api_lib::web::state::AppState;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use pdf_reader_core::library::DeletePolicy;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// No latency, no demo data, fixed seed. The background OCR run never fires during a test.
pub fn test_config(policy: DeletePolicy) -> Config {
    Config {
        latency_scale: 0.0,
        rng_seed: Some(7),
        ocr_delay: Duration::from_secs(3600),
        delete_policy: policy,
        seed_demo_data: false,
        ..Config::default()
    }
}

pub async fn make_state(policy: DeletePolicy) -> Arc<AppState> {
    Arc::new(
        AppState::in_memory(test_config(policy))
            .await
            .expect("in-memory state"),
    )
}

pub async fn make_router(policy: DeletePolicy) -> Router {
    api_lib::web::router(make_state(policy).await)
}

pub async fn make_router_with_config(config: Config) -> Router {
    let state = AppState::in_memory(config).await.expect("in-memory state");
    api_lib::web::router(Arc::new(state))
}

pub struct Stores {
    pub documents: Arc<InMemoryDocumentStore>,
    pub annotations: Arc<InMemoryAnnotationStore>,
    pub summaries: Arc<InMemorySummaryStore>,
    pub search: Arc<InMemorySearchIndex>,
}

pub fn make_stores() -> Stores {
    let latency = Arc::new(SimulatedLatency::none());
    let summarizer = Arc::new(TemplateSummarizer::new(Some(7), latency.clone()));
    Stores {
        documents: Arc::new(InMemoryDocumentStore::new(latency.clone())),
        annotations: Arc::new(InMemoryAnnotationStore::new(latency.clone())),
        summaries: Arc::new(InMemorySummaryStore::new(summarizer, latency.clone())),
        search: Arc::new(InMemorySearchIndex::new(8, latency)),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, Request::delete(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let req = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();
    send(app, req).await
}

pub async fn patch_json(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let req = Request::patch(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();
    send(app, req).await
}
