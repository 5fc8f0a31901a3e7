//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification, the mapping from port
//! errors to HTTP responses, and the liveness endpoint.

use crate::web::{annotations, documents, protocol, search, sessions, summaries};
use axum::{http::StatusCode, response::Json};
use pdf_reader_core::ports::PortError;
use serde_json::{json, Value};
use tracing::{error, warn};
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        healthz,
        documents::list_documents,
        documents::import_document,
        documents::get_document,
        documents::update_document,
        documents::delete_document,
        documents::process_ocr,
        documents::list_document_annotations,
        documents::export_document_annotations,
        documents::list_document_summaries,
        documents::generate_summary,
        annotations::list_annotations,
        annotations::create_annotation,
        annotations::get_annotation,
        annotations::update_annotation,
        annotations::delete_annotation,
        summaries::list_summaries,
        summaries::get_summary,
        summaries::update_summary,
        summaries::delete_summary,
        search::search_handler,
        search::semantic_search_handler,
        sessions::open_session,
        sessions::get_session,
        sessions::close_session,
        sessions::select_document,
        sessions::set_page,
        sessions::set_zoom,
        sessions::set_tool,
        sessions::commit_selection,
        sessions::commit_note,
        sessions::session_annotations,
        sessions::session_search,
    ),
    components(
        schemas(
            protocol::ErrorBody,
            protocol::RectPayload,
            protocol::ImportDocumentRequest,
            protocol::UpdateDocumentRequest,
            protocol::CreateAnnotationRequest,
            protocol::UpdateAnnotationRequest,
            protocol::GenerateSummaryRequest,
            protocol::UpdateSummaryRequest,
            protocol::SearchRequest,
            protocol::SemanticSearchRequest,
            protocol::SelectDocumentRequest,
            protocol::SetPageRequest,
            protocol::SetZoomRequest,
            protocol::SetToolRequest,
            protocol::SelectionRequest,
            protocol::NoteRequest,
            protocol::SessionSearchRequest,
        )
    ),
    tags(
        (name = "PDF Reader API", description = "Documents, annotations, summaries, search and reader sessions.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Error Mapping
//=========================================================================================

pub type Rejection = (StatusCode, Json<protocol::ErrorBody>);

/// Turns a port error into a status code and a JSON error body.
pub fn reject(e: PortError) -> Rejection {
    let status = match &e {
        PortError::NotFound(_) => StatusCode::NOT_FOUND,
        PortError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        PortError::Conflict(_) => StatusCode::CONFLICT,
        PortError::OperationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!("Request failed: {}", e);
    } else {
        warn!("Request rejected: {}", e);
    }
    (
        status,
        Json(protocol::ErrorBody {
            error: e.to_string(),
        }),
    )
}

//=========================================================================================
// Liveness
//=========================================================================================

#[utoipa::path(
    get,
    path = "/healthz",
    responses((status = 200, description = "The service is up"))
)]
pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
