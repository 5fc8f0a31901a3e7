//! services/api/src/web/documents.rs
//!
//! Handlers for the document library and the per-document views of
//! annotations and summaries.

use crate::web::{
    ocr_task::spawn_ocr,
    protocol::{GenerateSummaryRequest, ImportDocumentRequest, UpdateDocumentRequest},
    rest::{reject, Rejection},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use pdf_reader_core::domain::{Annotation, AnnotationExport, Document, DocumentDraft, Summary};
use pdf_reader_core::library::DeletionReport;
use std::sync::Arc;
use uuid::Uuid;

/// List every document, newest first.
#[utoipa::path(
    get,
    path = "/documents",
    responses((status = 200, description = "Snapshot of the library"))
)]
pub async fn list_documents(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<Document>>, Rejection> {
    let documents = app_state.documents.list().await.map_err(reject)?;
    Ok(Json(documents))
}

/// Import an uploaded PDF. OCR starts in the background after the configured delay.
#[utoipa::path(
    post,
    path = "/documents",
    request_body = ImportDocumentRequest,
    responses(
        (status = 201, description = "Document created"),
        (status = 400, description = "Zero page count or malformed body")
    )
)]
pub async fn import_document(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<ImportDocumentRequest>,
) -> Result<impl IntoResponse, Rejection> {
    let draft = DocumentDraft::from_upload(&payload.file_name, payload.size_bytes, payload.page_count);
    let document = app_state.library.import(draft).await.map_err(reject)?;

    spawn_ocr(
        app_state.library.clone(),
        document.id,
        app_state.config.ocr_delay,
    );

    Ok((StatusCode::CREATED, Json(document)))
}

#[utoipa::path(
    get,
    path = "/documents/{id}",
    params(("id" = Uuid, Path, description = "Document id")),
    responses(
        (status = 200, description = "The document"),
        (status = 404, description = "Unknown document")
    )
)]
pub async fn get_document(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, Rejection> {
    let document = app_state.documents.get(id).await.map_err(reject)?;
    Ok(Json(document))
}

#[utoipa::path(
    patch,
    path = "/documents/{id}",
    params(("id" = Uuid, Path, description = "Document id")),
    request_body = UpdateDocumentRequest,
    responses(
        (status = 200, description = "The updated document"),
        (status = 404, description = "Unknown document")
    )
)]
pub async fn update_document(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDocumentRequest>,
) -> Result<Json<Document>, Rejection> {
    let document = app_state
        .documents
        .update(id, payload.into())
        .await
        .map_err(reject)?;
    Ok(Json(document))
}

/// Delete a document; what happens to its annotations and summaries depends on `DELETE_POLICY`.
#[utoipa::path(
    delete,
    path = "/documents/{id}",
    params(("id" = Uuid, Path, description = "Document id")),
    responses(
        (status = 200, description = "What was removed"),
        (status = 404, description = "Unknown document"),
        (status = 409, description = "The reject policy refused the delete")
    )
)]
pub async fn delete_document(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletionReport>, Rejection> {
    let report = app_state.library.delete_document(id).await.map_err(reject)?;
    Ok(Json(report))
}

/// Run OCR now instead of waiting for the background task.
#[utoipa::path(
    post,
    path = "/documents/{id}/ocr",
    params(("id" = Uuid, Path, description = "Document id")),
    responses(
        (status = 200, description = "The processed document"),
        (status = 404, description = "Unknown document"),
        (status = 500, description = "Extraction failed")
    )
)]
pub async fn process_ocr(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, Rejection> {
    let document = app_state.library.process_ocr(id).await.map_err(reject)?;
    Ok(Json(document))
}

#[utoipa::path(
    get,
    path = "/documents/{id}/annotations",
    params(("id" = Uuid, Path, description = "Document id")),
    responses((status = 200, description = "The document's annotations, newest first"))
)]
pub async fn list_document_annotations(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Annotation>>, Rejection> {
    let annotations = app_state
        .annotations
        .list_by_document(id)
        .await
        .map_err(reject)?;
    Ok(Json(annotations))
}

#[utoipa::path(
    get,
    path = "/documents/{id}/annotations/export",
    params(("id" = Uuid, Path, description = "Document id")),
    responses((status = 200, description = "Export digest without ids or coordinates"))
)]
pub async fn export_document_annotations(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnnotationExport>, Rejection> {
    let export = app_state
        .annotations
        .export_for_document(id)
        .await
        .map_err(reject)?;
    Ok(Json(export))
}

#[utoipa::path(
    get,
    path = "/documents/{id}/summaries",
    params(("id" = Uuid, Path, description = "Document id")),
    responses((status = 200, description = "The document's summaries, newest first"))
)]
pub async fn list_document_summaries(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Summary>>, Rejection> {
    let summaries = app_state
        .summaries
        .list_by_document(id)
        .await
        .map_err(reject)?;
    Ok(Json(summaries))
}

/// Generate a summary for one page.
#[utoipa::path(
    post,
    path = "/documents/{id}/summaries",
    params(("id" = Uuid, Path, description = "Document id")),
    request_body = GenerateSummaryRequest,
    responses(
        (status = 201, description = "Summary generated"),
        (status = 404, description = "Unknown document"),
        (status = 500, description = "Summarization failed")
    )
)]
pub async fn generate_summary(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GenerateSummaryRequest>,
) -> Result<impl IntoResponse, Rejection> {
    let summary = app_state
        .library
        .generate_summary(id, payload.page_number)
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(summary)))
}
