//! crates/pdf_reader_core/src/domain.rs
//!
//! Defines the pure, core data structures for the reader.
//! These structs are independent of any storage backend or transport.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

//=========================================================================================
// Documents
//=========================================================================================

/// Upper bound on `page_count`. OCR and indexing allocate per page.
pub const MAX_PAGE_COUNT: u32 = 10_000;

/// An imported PDF and its metadata record (not the rendered content).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub size_bytes: u64,
    pub page_count: u32,
    pub last_opened_at: Option<DateTime<Utc>>,
    pub ocr_processed: bool,
    /// One entry per page once OCR has completed.
    pub extracted_text: Vec<String>,
}

/// The caller-supplied part of a new document. The store assigns everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDraft {
    pub title: String,
    pub size_bytes: u64,
    pub page_count: u32,
}

impl DocumentDraft {
    /// Builds a draft from uploaded file metadata, dropping a trailing `.pdf`.
    pub fn from_upload(file_name: &str, size_bytes: u64, page_count: u32) -> Self {
        let trimmed = file_name.trim();
        let title = match trimmed.len().checked_sub(4) {
            Some(cut)
                if trimmed.is_char_boundary(cut)
                    && trimmed[cut..].eq_ignore_ascii_case(".pdf") =>
            {
                &trimmed[..cut]
            }
            _ => trimmed,
        };
        Self {
            title: title.to_string(),
            size_bytes,
            page_count,
        }
    }
}

/// A partial update for a document. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub page_count: Option<u32>,
    pub last_opened_at: Option<DateTime<Utc>>,
    pub ocr_processed: Option<bool>,
    pub extracted_text: Option<Vec<String>>,
}

impl DocumentPatch {
    pub fn opened_at(at: DateTime<Utc>) -> Self {
        Self {
            last_opened_at: Some(at),
            ..Self::default()
        }
    }

    pub fn ocr_completed(extracted_text: Vec<String>) -> Self {
        Self {
            ocr_processed: Some(true),
            extracted_text: Some(extracted_text),
            ..Self::default()
        }
    }

    pub fn apply_to(self, document: &mut Document) {
        if let Some(title) = self.title {
            document.title = title;
        }
        if let Some(page_count) = self.page_count {
            document.page_count = page_count;
        }
        if let Some(at) = self.last_opened_at {
            document.last_opened_at = Some(at);
        }
        if let Some(processed) = self.ocr_processed {
            document.ocr_processed = processed;
        }
        if let Some(text) = self.extracted_text {
            document.extracted_text = text;
        }
    }
}

//=========================================================================================
// Colours
//=========================================================================================

/// The toolbar palette, first entry is the default.
pub const PALETTE: [&str; 6] = [
    "#88C0D0", "#EBCB8B", "#A3BE8C", "#BF616A", "#B48EAD", "#D08770",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a #RRGGBB colour")]
pub struct InvalidColor(pub String);

/// A `#RRGGBB` colour value used by highlights and pen strokes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Color(PALETTE[0].to_string())
    }
}

impl FromStr for Color {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').ok_or_else(|| InvalidColor(s.to_string()))?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InvalidColor(s.to_string()));
        }
        Ok(Color(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//=========================================================================================
// Annotations
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnnotationKind {
    Highlight,
    PenStroke,
    Note,
}

impl AnnotationKind {
    /// Highlights and pen strokes are drawn in a colour; notes are not.
    pub fn requires_color(self) -> bool {
        !matches!(self, AnnotationKind::Note)
    }
}

/// A rectangle in page-local units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// A user-authored highlight, pen stroke, or note attached to a document page.
///
/// `id`, `document_id` and `created_at` are fixed at creation. `AnnotationPatch`
/// has no field for them. Highlights and pen strokes always carry a colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: Uuid,
    pub document_id: Uuid,
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    pub page_number: u32,
    pub content: String,
    pub color: Option<Color>,
    pub coordinates: Rect,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnnotation {
    pub document_id: Uuid,
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    pub page_number: u32,
    pub content: String,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub coordinates: Rect,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnnotationPatch {
    #[serde(rename = "type")]
    pub kind: Option<AnnotationKind>,
    pub page_number: Option<u32>,
    pub content: Option<String>,
    pub color: Option<Color>,
    pub coordinates: Option<Rect>,
}

impl AnnotationPatch {
    pub fn apply_to(self, annotation: &mut Annotation) {
        if let Some(kind) = self.kind {
            annotation.kind = kind;
        }
        if let Some(page) = self.page_number {
            annotation.page_number = page;
        }
        if let Some(content) = self.content {
            annotation.content = content;
        }
        if let Some(color) = self.color {
            annotation.color = Some(color);
        }
        if let Some(rect) = self.coordinates {
            annotation.coordinates = rect;
        }
    }
}

/// An annotation as it appears in an export digest: no id, no geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedAnnotation {
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    pub page_number: u32,
    pub content: String,
    pub color: Option<Color>,
    pub created_at: DateTime<Utc>,
}

impl From<&Annotation> for ExportedAnnotation {
    fn from(a: &Annotation) -> Self {
        Self {
            kind: a.kind,
            page_number: a.page_number,
            content: a.content.clone(),
            color: a.color.clone(),
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationExport {
    pub document_id: Uuid,
    pub exported_at: DateTime<Utc>,
    pub count: usize,
    pub annotations: Vec<ExportedAnnotation>,
}

impl AnnotationExport {
    pub fn new(document_id: Uuid, annotations: &[Annotation]) -> Self {
        let annotations: Vec<ExportedAnnotation> =
            annotations.iter().map(ExportedAnnotation::from).collect();
        Self {
            document_id,
            exported_at: Utc::now(),
            count: annotations.len(),
            annotations,
        }
    }
}

//=========================================================================================
// Summaries
//=========================================================================================

/// A generated digest of one document page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub id: Uuid,
    pub document_id: Uuid,
    pub page_number: u32,
    pub summary_text: String,
    pub key_points: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSummary {
    pub document_id: Uuid,
    pub page_number: u32,
    pub summary_text: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

/// Text produced by a summarisation collaborator before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryDraft {
    pub summary_text: String,
    pub key_points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryPatch {
    pub page_number: Option<u32>,
    pub summary_text: Option<String>,
    pub key_points: Option<Vec<String>>,
}

impl SummaryPatch {
    pub fn apply_to(self, summary: &mut Summary) {
        if let Some(page) = self.page_number {
            summary.page_number = page;
        }
        if let Some(text) = self.summary_text {
            summary.summary_text = text;
        }
        if let Some(points) = self.key_points {
            summary.key_points = points;
        }
    }
}

//=========================================================================================
// Search
//=========================================================================================

/// A ranked hit. Derived per query, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub document_id: Uuid,
    pub page_number: u32,
    pub snippet: String,
    pub relevance_score: f64,
}

/// A ranked hit enriched with how it relates to the query and the concepts it touches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticSearchResult {
    #[serde(flatten)]
    pub result: SearchResult,
    pub semantic_context: String,
    /// One to three entries.
    pub concepts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub text: String,
    /// Restricts the corpus when non-empty.
    #[serde(default)]
    pub document_ids: Vec<Uuid>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn within(mut self, document_ids: Vec<Uuid>) -> Self {
        self.document_ids = document_ids;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexReceipt {
    pub document_id: Uuid,
    pub indexed_pages: usize,
    pub word_count: usize,
    pub indexed_at: DateTime<Utc>,
}

//=========================================================================================
// Reader view-state
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Select,
    Highlight,
    Pen,
    Note,
}

impl Tool {
    /// The annotation kind a text selection produces under this tool, if any.
    pub fn selection_kind(self) -> Option<AnnotationKind> {
        match self {
            Tool::Highlight => Some(AnnotationKind::Highlight),
            Tool::Pen => Some(AnnotationKind::PenStroke),
            Tool::Select | Tool::Note => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is neither a zoom factor nor one of fit-width / fit-page")]
pub struct InvalidZoom(pub String);

/// A zoom change as issued by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawZoom", into = "RawZoom")]
pub enum ZoomRequest {
    Factor(f64),
    FitWidth,
    FitPage,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawZoom {
    Number(f64),
    Text(String),
}

impl FromStr for ZoomRequest {
    type Err = InvalidZoom;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "fit-width" => Ok(ZoomRequest::FitWidth),
            "fit-page" => Ok(ZoomRequest::FitPage),
            other => other
                .parse::<f64>()
                .map(ZoomRequest::Factor)
                .map_err(|_| InvalidZoom(s.to_string())),
        }
    }
}

impl TryFrom<RawZoom> for ZoomRequest {
    type Error = InvalidZoom;

    fn try_from(raw: RawZoom) -> Result<Self, Self::Error> {
        match raw {
            RawZoom::Number(n) => Ok(ZoomRequest::Factor(n)),
            RawZoom::Text(s) => s.parse(),
        }
    }
}

impl From<ZoomRequest> for RawZoom {
    fn from(zoom: ZoomRequest) -> Self {
        match zoom {
            ZoomRequest::Factor(n) => RawZoom::Number(n),
            ZoomRequest::FitWidth => RawZoom::Text("fit-width".to_string()),
            ZoomRequest::FitPage => RawZoom::Text("fit-page".to_string()),
        }
    }
}

/// The ephemeral view-state owned by one reader session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub active_document_id: Option<Uuid>,
    pub current_page: u32,
    pub zoom_factor: f64,
    pub active_tool: Tool,
    pub active_color: Color,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            active_document_id: None,
            current_page: 1,
            zoom_factor: 1.0,
            active_tool: Tool::Select,
            active_color: Color::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_title_drops_pdf_extension() {
        let draft = DocumentDraft::from_upload("Deep Learning.PDF", 2048, 12);
        assert_eq!(draft.title, "Deep Learning");
        assert_eq!(draft.size_bytes, 2048);

        let draft = DocumentDraft::from_upload("notes.txt", 10, 1);
        assert_eq!(draft.title, "notes.txt");

        let draft = DocumentDraft::from_upload(".pdf", 1, 1);
        assert_eq!(draft.title, "");
    }

    #[test]
    fn colours_must_be_six_digit_hex() {
        assert_eq!("#88C0D0".parse::<Color>().unwrap().as_str(), "#88C0D0");
        assert!("88C0D0".parse::<Color>().is_err());
        assert!("#88C0D".parse::<Color>().is_err());
        assert!("#GGGGGG".parse::<Color>().is_err());
        assert_eq!(Color::default().as_str(), PALETTE[0]);
    }

    #[test]
    fn colour_deserialisation_rejects_garbage() {
        let ok: Result<Color, _> = serde_json::from_str("\"#A3BE8C\"");
        assert!(ok.is_ok());
        let bad: Result<Color, _> = serde_json::from_str("\"red\"");
        assert!(bad.is_err());
    }

    #[test]
    fn zoom_requests_parse_symbols_and_numbers() {
        assert_eq!("fit-width".parse::<ZoomRequest>().unwrap(), ZoomRequest::FitWidth);
        assert_eq!("fit-page".parse::<ZoomRequest>().unwrap(), ZoomRequest::FitPage);
        assert_eq!("1.5".parse::<ZoomRequest>().unwrap(), ZoomRequest::Factor(1.5));
        assert!("fit-everything".parse::<ZoomRequest>().is_err());

        let from_json: ZoomRequest = serde_json::from_str("2").unwrap();
        assert_eq!(from_json, ZoomRequest::Factor(2.0));
        let from_json: ZoomRequest = serde_json::from_str("\"fit-width\"").unwrap();
        assert_eq!(from_json, ZoomRequest::FitWidth);
    }

    #[test]
    fn document_patch_only_touches_present_fields() {
        let mut doc = Document {
            id: Uuid::new_v4(),
            title: "Original".into(),
            size_bytes: 1,
            page_count: 3,
            last_opened_at: None,
            ocr_processed: false,
            extracted_text: vec![],
        };
        let id = doc.id;
        DocumentPatch::ocr_completed(vec!["a".into()]).apply_to(&mut doc);
        assert_eq!(doc.id, id);
        assert_eq!(doc.title, "Original");
        assert!(doc.ocr_processed);
        assert_eq!(doc.extracted_text, vec!["a".to_string()]);
        assert!(doc.last_opened_at.is_none());
    }

    #[test]
    fn annotation_json_uses_type_field() {
        let a = Annotation {
            id: Uuid::new_v4(),
            document_id: Uuid::new_v4(),
            kind: AnnotationKind::PenStroke,
            page_number: 2,
            content: "x".into(),
            color: Some(Color::default()),
            coordinates: Rect::new(1.0, 2.0, 3.0, 4.0),
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&a).unwrap();
        assert_eq!(value["type"], "pen-stroke");
        assert_eq!(value["pageNumber"], 2);
        assert_eq!(value["color"], "#88C0D0");
    }

    #[test]
    fn export_drops_id_and_coordinates() {
        let a = Annotation {
            id: Uuid::new_v4(),
            document_id: Uuid::new_v4(),
            kind: AnnotationKind::Highlight,
            page_number: 1,
            content: "hello".into(),
            color: None,
            coordinates: Rect::default(),
            created_at: Utc::now(),
        };
        let export = AnnotationExport::new(a.document_id, std::slice::from_ref(&a));
        assert_eq!(export.count, export.annotations.len());
        let value = serde_json::to_value(&export).unwrap();
        let item = &value["annotations"][0];
        assert!(item.get("id").is_none());
        assert!(item.get("coordinates").is_none());
        assert_eq!(item["content"], "hello");
    }

    #[test]
    fn semantic_results_flatten_the_hit() {
        let hit = SemanticSearchResult {
            result: SearchResult {
                document_id: Uuid::new_v4(),
                page_number: 4,
                snippet: "s".into(),
                relevance_score: 0.5,
            },
            semantic_context: "Theoretical framework alignment and connections".into(),
            concepts: vec!["algorithms".into()],
        };
        let value = serde_json::to_value(&hit).unwrap();
        assert_eq!(value["pageNumber"], 4);
        assert_eq!(value["semanticContext"], "Theoretical framework alignment and connections");
        assert_eq!(value["concepts"][0], "algorithms");
        assert!(value.get("result").is_none());
    }

    #[test]
    fn only_notes_go_without_colour() {
        assert!(AnnotationKind::Highlight.requires_color());
        assert!(AnnotationKind::PenStroke.requires_color());
        assert!(!AnnotationKind::Note.requires_color());
    }

    #[test]
    fn only_highlight_and_pen_commit_selections() {
        assert_eq!(Tool::Highlight.selection_kind(), Some(AnnotationKind::Highlight));
        assert_eq!(Tool::Pen.selection_kind(), Some(AnnotationKind::PenStroke));
        assert_eq!(Tool::Select.selection_kind(), None);
        assert_eq!(Tool::Note.selection_kind(), None);
    }
}
