//! services/api/src/web/protocol.rs
//!
//! Request and response payloads of the HTTP API. Domain records are sent
//! as-is; these types cover the shapes that only exist at the boundary.

use pdf_reader_core::domain::{
    Annotation, AnnotationKind, AnnotationPatch, Color, DocumentPatch, NewAnnotation,
    Rect, SearchResult, SummaryPatch, Tool, ViewState, ZoomRequest,
};
use pdf_reader_core::ports::{PortError, PortResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Shared Shapes
//=========================================================================================

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy)]
pub struct RectPayload {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<RectPayload> for Rect {
    fn from(r: RectPayload) -> Self {
        Rect::new(r.x, r.y, r.width, r.height)
    }
}

fn parse_color(raw: Option<String>) -> PortResult<Option<Color>> {
    raw.map(|c| c.parse::<Color>().map_err(PortError::from))
        .transpose()
}

//=========================================================================================
// Documents
//=========================================================================================

/// Metadata of an uploaded file, as supplied by the browser.
#[derive(Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ImportDocumentRequest {
    pub file_name: String,
    pub size_bytes: u64,
    pub page_count: u32,
}

#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateDocumentRequest {
    pub title: Option<String>,
    pub page_count: Option<u32>,
}

impl From<UpdateDocumentRequest> for DocumentPatch {
    fn from(req: UpdateDocumentRequest) -> Self {
        DocumentPatch {
            title: req.title,
            page_count: req.page_count,
            ..DocumentPatch::default()
        }
    }
}

//=========================================================================================
// Annotations
//=========================================================================================

#[derive(Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnotationRequest {
    pub document_id: Uuid,
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "highlight")]
    pub kind: AnnotationKind,
    pub page_number: u32,
    pub content: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub coordinates: Option<RectPayload>,
}

impl CreateAnnotationRequest {
    pub fn into_new(self) -> PortResult<NewAnnotation> {
        Ok(NewAnnotation {
            document_id: self.document_id,
            kind: self.kind,
            page_number: self.page_number,
            content: self.content,
            color: parse_color(self.color)?,
            coordinates: self.coordinates.map(Rect::from).unwrap_or_default(),
        })
    }
}

#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateAnnotationRequest {
    #[serde(rename = "type")]
    #[schema(value_type = Option<String>)]
    pub kind: Option<AnnotationKind>,
    pub page_number: Option<u32>,
    pub content: Option<String>,
    pub color: Option<String>,
    pub coordinates: Option<RectPayload>,
}

impl UpdateAnnotationRequest {
    pub fn into_patch(self) -> PortResult<AnnotationPatch> {
        Ok(AnnotationPatch {
            kind: self.kind,
            page_number: self.page_number,
            content: self.content,
            color: parse_color(self.color)?,
            coordinates: self.coordinates.map(Rect::from),
        })
    }
}

//=========================================================================================
// Summaries
//=========================================================================================

#[derive(Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSummaryRequest {
    pub page_number: u32,
}

#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateSummaryRequest {
    pub page_number: Option<u32>,
    pub summary_text: Option<String>,
    pub key_points: Option<Vec<String>>,
}

impl From<UpdateSummaryRequest> for SummaryPatch {
    fn from(req: UpdateSummaryRequest) -> Self {
        SummaryPatch {
            page_number: req.page_number,
            summary_text: req.summary_text,
            key_points: req.key_points,
        }
    }
}

//=========================================================================================
// Search
//=========================================================================================

#[derive(Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub document_ids: Vec<Uuid>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// A search whose hits come back with a context line and related concepts.
#[derive(Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SemanticSearchRequest {
    pub query: String,
    #[serde(default)]
    pub document_ids: Vec<Uuid>,
    #[serde(default)]
    pub limit: Option<usize>,
    /// Free text describing what the reader is looking at.
    #[serde(default)]
    pub context: String,
}

//=========================================================================================
// Reader Sessions
//=========================================================================================

#[derive(Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SelectDocumentRequest {
    pub document_id: Uuid,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct SetPageRequest {
    pub page: i64,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct SetZoomRequest {
    /// A factor such as `1.5`, or `"fit-width"` / `"fit-page"`.
    #[schema(value_type = Object)]
    pub zoom: ZoomRequest,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct SetToolRequest {
    #[schema(value_type = String, example = "highlight")]
    pub tool: Tool,
    #[serde(default)]
    pub color: Option<String>,
}

impl SetToolRequest {
    pub fn color(&self) -> PortResult<Option<Color>> {
        parse_color(self.color.clone())
    }
}

#[derive(Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
    pub text: String,
    pub page_number: u32,
    #[serde(default)]
    pub bounds: Option<RectPayload>,
}

#[derive(Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NoteRequest {
    pub body: String,
    pub page_number: u32,
    pub at: RectPayload,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct SessionSearchRequest {
    pub query: String,
}

/// The observable state of one reader session.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: Uuid,
    pub view: ViewState,
    pub page_count: u32,
    pub search_results: Vec<SearchResult>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SessionSearchResponse {
    /// False when a newer search on the same session superseded this one.
    pub accepted: bool,
    pub results: Vec<SearchResult>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CommitResponse {
    /// None when the current tool or input made the commit a no-op.
    pub annotation: Option<Annotation>,
}
