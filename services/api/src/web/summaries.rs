//! services/api/src/web/summaries.rs
//!
//! CRUD handlers for individual summaries. Generation lives under
//! `/documents/{id}/summaries`.

use crate::web::{
    protocol::UpdateSummaryRequest,
    rest::{reject, Rejection},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    response::Json,
};
use pdf_reader_core::domain::Summary;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/summaries",
    responses((status = 200, description = "Every summary, newest first"))
)]
pub async fn list_summaries(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<Summary>>, Rejection> {
    let summaries = app_state.summaries.list().await.map_err(reject)?;
    Ok(Json(summaries))
}

#[utoipa::path(
    get,
    path = "/summaries/{id}",
    params(("id" = Uuid, Path, description = "Summary id")),
    responses(
        (status = 200, description = "The summary"),
        (status = 404, description = "Unknown summary")
    )
)]
pub async fn get_summary(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Summary>, Rejection> {
    let summary = app_state.summaries.get(id).await.map_err(reject)?;
    Ok(Json(summary))
}

#[utoipa::path(
    patch,
    path = "/summaries/{id}",
    params(("id" = Uuid, Path, description = "Summary id")),
    request_body = UpdateSummaryRequest,
    responses(
        (status = 200, description = "The updated summary"),
        (status = 404, description = "Unknown summary")
    )
)]
pub async fn update_summary(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSummaryRequest>,
) -> Result<Json<Summary>, Rejection> {
    let summary = app_state
        .summaries
        .update(id, payload.into())
        .await
        .map_err(reject)?;
    Ok(Json(summary))
}

#[utoipa::path(
    delete,
    path = "/summaries/{id}",
    params(("id" = Uuid, Path, description = "Summary id")),
    responses(
        (status = 200, description = "The deleted summary"),
        (status = 404, description = "Unknown summary")
    )
)]
pub async fn delete_summary(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Summary>, Rejection> {
    let summary = app_state.summaries.delete(id).await.map_err(reject)?;
    Ok(Json(summary))
}
