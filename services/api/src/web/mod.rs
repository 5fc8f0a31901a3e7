pub mod annotations;
pub mod documents;
pub mod middleware;
pub mod ocr_task;
pub mod protocol;
pub mod rest;
pub mod search;
pub mod sessions;
pub mod state;
pub mod summaries;

use crate::web::{rest::ApiDoc, state::AppState};
use axum::{
    http::{header::CONTENT_TYPE, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the complete application: REST routes, request tracing, CORS and Swagger UI.
pub fn router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    let library_routes = Router::new()
        .route(
            "/documents",
            get(documents::list_documents).post(documents::import_document),
        )
        .route(
            "/documents/{id}",
            get(documents::get_document)
                .patch(documents::update_document)
                .delete(documents::delete_document),
        )
        .route("/documents/{id}/ocr", post(documents::process_ocr))
        .route(
            "/documents/{id}/annotations",
            get(documents::list_document_annotations),
        )
        .route(
            "/documents/{id}/annotations/export",
            get(documents::export_document_annotations),
        )
        .route(
            "/documents/{id}/summaries",
            get(documents::list_document_summaries).post(documents::generate_summary),
        )
        .route(
            "/annotations",
            get(annotations::list_annotations).post(annotations::create_annotation),
        )
        .route(
            "/annotations/{id}",
            get(annotations::get_annotation)
                .patch(annotations::update_annotation)
                .delete(annotations::delete_annotation),
        )
        .route("/summaries", get(summaries::list_summaries))
        .route(
            "/summaries/{id}",
            get(summaries::get_summary)
                .patch(summaries::update_summary)
                .delete(summaries::delete_summary),
        )
        .route("/search", post(search::search_handler))
        .route("/search/semantic", post(search::semantic_search_handler));

    let session_routes = Router::new()
        .route("/sessions", post(sessions::open_session))
        .route(
            "/sessions/{id}",
            get(sessions::get_session).delete(sessions::close_session),
        )
        .route("/sessions/{id}/document", post(sessions::select_document))
        .route("/sessions/{id}/page", post(sessions::set_page))
        .route("/sessions/{id}/zoom", post(sessions::set_zoom))
        .route("/sessions/{id}/tool", post(sessions::set_tool))
        .route("/sessions/{id}/selection", post(sessions::commit_selection))
        .route("/sessions/{id}/notes", post(sessions::commit_note))
        .route(
            "/sessions/{id}/annotations",
            get(sessions::session_annotations),
        )
        .route("/sessions/{id}/search", post(sessions::session_search));

    let api_router = Router::new()
        .route("/healthz", get(rest::healthz))
        .merge(library_routes)
        .merge(session_routes)
        .layer(axum_middleware::from_fn(middleware::trace_requests))
        .layer(cors)
        .with_state(app_state);

    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
