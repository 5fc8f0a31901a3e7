//! services/api/src/web/sessions.rs
//!
//! Handlers driving reader sessions. Each session is a `ReaderSession` behind
//! its own mutex in the `SessionRegistry`.

use crate::web::{
    protocol::{
        CommitResponse, NoteRequest, SelectDocumentRequest, SelectionRequest,
        SessionSearchRequest, SessionSearchResponse, SessionView, SetPageRequest,
        SetToolRequest, SetZoomRequest,
    },
    rest::{reject, Rejection},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use pdf_reader_core::domain::{Annotation, Rect, SearchQuery};
use pdf_reader_core::session::{ReaderSession, DEFAULT_SELECTION_RECT};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

fn view_of(session_id: Uuid, session: &ReaderSession) -> SessionView {
    SessionView {
        session_id,
        view: session.state().clone(),
        page_count: session.page_count(),
        search_results: session.search_results().to_vec(),
    }
}

/// Open a new reader session with the default view-state.
#[utoipa::path(
    post,
    path = "/sessions",
    responses((status = 201, description = "Session opened"))
)]
pub async fn open_session(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let (id, shared) = app_state
        .sessions
        .open(app_state.new_reader_session())
        .await;
    let session = shared.lock().await;
    (StatusCode::CREATED, Json(view_of(id, &session)))
}

#[utoipa::path(
    get,
    path = "/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Current view-state"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn get_session(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, Rejection> {
    let shared = app_state.sessions.get(id).await.map_err(reject)?;
    let session = shared.lock().await;
    Ok(Json(view_of(id, &session)))
}

#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 204, description = "Session closed"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn close_session(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Rejection> {
    app_state.sessions.close(id).await.map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Make a document the active selection; resets the page to 1.
#[utoipa::path(
    post,
    path = "/sessions/{id}/document",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = SelectDocumentRequest,
    responses(
        (status = 200, description = "Updated view-state"),
        (status = 404, description = "Unknown session or document")
    )
)]
pub async fn select_document(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectDocumentRequest>,
) -> Result<Json<SessionView>, Rejection> {
    let shared = app_state.sessions.get(id).await.map_err(reject)?;
    let mut session = shared.lock().await;
    session
        .select_document(payload.document_id)
        .await
        .map_err(reject)?;
    Ok(Json(view_of(id, &session)))
}

/// Move the page cursor. Out-of-range pages are clamped.
#[utoipa::path(
    post,
    path = "/sessions/{id}/page",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = SetPageRequest,
    responses((status = 200, description = "Updated view-state"))
)]
pub async fn set_page(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetPageRequest>,
) -> Result<Json<SessionView>, Rejection> {
    let shared = app_state.sessions.get(id).await.map_err(reject)?;
    let mut session = shared.lock().await;
    session.set_page(payload.page);
    Ok(Json(view_of(id, &session)))
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/zoom",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = SetZoomRequest,
    responses((status = 200, description = "Updated view-state"))
)]
pub async fn set_zoom(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetZoomRequest>,
) -> Result<Json<SessionView>, Rejection> {
    let shared = app_state.sessions.get(id).await.map_err(reject)?;
    let mut session = shared.lock().await;
    session.set_zoom(payload.zoom);
    Ok(Json(view_of(id, &session)))
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/tool",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = SetToolRequest,
    responses(
        (status = 200, description = "Updated view-state"),
        (status = 400, description = "Bad colour")
    )
)]
pub async fn set_tool(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetToolRequest>,
) -> Result<Json<SessionView>, Rejection> {
    let color = payload.color().map_err(reject)?;
    let shared = app_state.sessions.get(id).await.map_err(reject)?;
    let mut session = shared.lock().await;
    session.set_tool(payload.tool, color);
    Ok(Json(view_of(id, &session)))
}

/// Commit a text selection as a highlight or pen stroke, depending on the active tool.
#[utoipa::path(
    post,
    path = "/sessions/{id}/selection",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = SelectionRequest,
    responses(
        (status = 201, description = "Annotation created"),
        (status = 200, description = "Nothing to commit for this tool or selection")
    )
)]
pub async fn commit_selection(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectionRequest>,
) -> Result<impl IntoResponse, Rejection> {
    let shared = app_state.sessions.get(id).await.map_err(reject)?;
    let session = shared.lock().await;
    let bounds = payload.bounds.map(Rect::from).unwrap_or(DEFAULT_SELECTION_RECT);
    let annotation = session
        .commit_selection_at(&payload.text, payload.page_number, bounds)
        .await
        .map_err(reject)?;
    Ok(commit_response(annotation))
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/notes",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = NoteRequest,
    responses(
        (status = 201, description = "Note created"),
        (status = 200, description = "Note tool inactive or empty body")
    )
)]
pub async fn commit_note(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NoteRequest>,
) -> Result<impl IntoResponse, Rejection> {
    let shared = app_state.sessions.get(id).await.map_err(reject)?;
    let session = shared.lock().await;
    let note = session
        .commit_note(&payload.body, payload.page_number, payload.at.into())
        .await
        .map_err(reject)?;
    Ok(commit_response(note))
}

fn commit_response(annotation: Option<Annotation>) -> (StatusCode, Json<CommitResponse>) {
    let status = if annotation.is_some() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (status, Json(CommitResponse { annotation }))
}

#[derive(Deserialize, Debug)]
pub struct PageFilter {
    pub page: Option<u32>,
}

/// Annotations of the active document, optionally for one page.
#[utoipa::path(
    get,
    path = "/sessions/{id}/annotations",
    params(
        ("id" = Uuid, Path, description = "Session id"),
        ("page" = Option<u32>, Query, description = "Only this page")
    ),
    responses((status = 200, description = "Annotations, newest first"))
)]
pub async fn session_annotations(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(filter): Query<PageFilter>,
) -> Result<Json<Vec<Annotation>>, Rejection> {
    let shared = app_state.sessions.get(id).await.map_err(reject)?;
    let session = shared.lock().await;
    let annotations = match filter.page {
        Some(page) => session.annotations_on_page(page).await,
        None => session.annotations().await,
    }
    .map_err(reject)?;
    Ok(Json(annotations))
}

/// Search on behalf of a session. Only the newest search of a session updates its results.
#[utoipa::path(
    post,
    path = "/sessions/{id}/search",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = SessionSearchRequest,
    responses((status = 200, description = "Results and whether they were kept"))
)]
pub async fn session_search(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SessionSearchRequest>,
) -> Result<Json<SessionSearchResponse>, Rejection> {
    let shared = app_state.sessions.get(id).await.map_err(reject)?;

    // The session lock is released while the search runs, so a newer search can overtake it.
    let (ticket, search) = {
        let session = shared.lock().await;
        (session.begin_search(), session.search_service())
    };
    let results = search
        .search(&SearchQuery::new(payload.query))
        .await
        .map_err(reject)?;

    let accepted = shared.lock().await.finish_search(ticket, results.clone());
    debug!(session_id = %id, accepted, "Session search finished");
    Ok(Json(SessionSearchResponse { accepted, results }))
}
