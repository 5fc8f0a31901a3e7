//! services/api/src/web/search.rs
//!
//! The stateless search endpoint. Per-session, latest-wins search lives in
//! `sessions.rs`.

use crate::web::{
    protocol::{SearchRequest, SemanticSearchRequest},
    rest::{reject, Rejection},
    state::AppState,
};
use axum::{extract::State, response::Json};
use pdf_reader_core::domain::{SearchQuery, SearchResult, SemanticSearchResult};
use std::sync::Arc;

/// Search the corpus. A blank query returns an empty list.
#[utoipa::path(
    post,
    path = "/search",
    request_body = SearchRequest,
    responses((status = 200, description = "Results ordered by relevance"))
)]
pub async fn search_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<Vec<SearchResult>>, Rejection> {
    let query = SearchQuery {
        text: payload.query,
        document_ids: payload.document_ids,
        limit: payload.limit,
    };
    let results = app_state.search.search(&query).await.map_err(reject)?;
    Ok(Json(results))
}

/// Same ranking as `/search`, each hit enriched with a context line and 1 to 3 concepts.
#[utoipa::path(
    post,
    path = "/search/semantic",
    request_body = SemanticSearchRequest,
    responses((status = 200, description = "Enriched results ordered by relevance"))
)]
pub async fn semantic_search_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<SemanticSearchRequest>,
) -> Result<Json<Vec<SemanticSearchResult>>, Rejection> {
    let query = SearchQuery {
        text: payload.query,
        document_ids: payload.document_ids,
        limit: payload.limit,
    };
    let results = app_state
        .search
        .search_semantic(&query, &payload.context)
        .await
        .map_err(reject)?;
    Ok(Json(results))
}
