//! services/api/src/web/annotations.rs
//!
//! CRUD handlers for individual annotations.

use crate::web::{
    protocol::{CreateAnnotationRequest, UpdateAnnotationRequest},
    rest::{reject, Rejection},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use pdf_reader_core::domain::Annotation;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/annotations",
    responses((status = 200, description = "Every annotation, newest first"))
)]
pub async fn list_annotations(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<Annotation>>, Rejection> {
    let annotations = app_state.annotations.list().await.map_err(reject)?;
    Ok(Json(annotations))
}

#[utoipa::path(
    post,
    path = "/annotations",
    request_body = CreateAnnotationRequest,
    responses(
        (status = 201, description = "Annotation created"),
        (status = 400, description = "Bad colour or page number, or a highlight without a colour"),
        (status = 404, description = "Unknown document (unless the delete policy is orphan)")
    )
)]
pub async fn create_annotation(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateAnnotationRequest>,
) -> Result<impl IntoResponse, Rejection> {
    let new = payload.into_new().map_err(reject)?;
    let annotation = app_state.library.annotate(new).await.map_err(reject)?;
    Ok((StatusCode::CREATED, Json(annotation)))
}

#[utoipa::path(
    get,
    path = "/annotations/{id}",
    params(("id" = Uuid, Path, description = "Annotation id")),
    responses(
        (status = 200, description = "The annotation"),
        (status = 404, description = "Unknown annotation")
    )
)]
pub async fn get_annotation(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Annotation>, Rejection> {
    let annotation = app_state.annotations.get(id).await.map_err(reject)?;
    Ok(Json(annotation))
}

#[utoipa::path(
    patch,
    path = "/annotations/{id}",
    params(("id" = Uuid, Path, description = "Annotation id")),
    request_body = UpdateAnnotationRequest,
    responses(
        (status = 200, description = "The updated annotation"),
        (status = 404, description = "Unknown annotation")
    )
)]
pub async fn update_annotation(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAnnotationRequest>,
) -> Result<Json<Annotation>, Rejection> {
    let patch = payload.into_patch().map_err(reject)?;
    let annotation = app_state
        .annotations
        .update(id, patch)
        .await
        .map_err(reject)?;
    Ok(Json(annotation))
}

#[utoipa::path(
    delete,
    path = "/annotations/{id}",
    params(("id" = Uuid, Path, description = "Annotation id")),
    responses(
        (status = 200, description = "The deleted annotation"),
        (status = 404, description = "Unknown annotation")
    )
)]
pub async fn delete_annotation(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Annotation>, Rejection> {
    let annotation = app_state.annotations.delete(id).await.map_err(reject)?;
    Ok(Json(annotation))
}
