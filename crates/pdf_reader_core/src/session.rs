//! crates/pdf_reader_core/src/session.rs
//!
//! The reader session controller: the view-state of one reading context
//! (selected document, page cursor, zoom, tool) and the transitions that read
//! from and write to the stores on its behalf. Writes go through the
//! `Library`, so a session obeys the same delete policy as everything else.

use chrono::Utc;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    Annotation, AnnotationKind, Color, Document, DocumentPatch, NewAnnotation, Rect,
    SearchQuery, SearchResult, Tool, ViewState, ZoomRequest,
};
use crate::library::Library;
use crate::ports::{PortResult, SearchService};
use crate::sequence::{RequestSequencer, Ticket};

/// Discrete steps used by zoom in / zoom out.
pub const ZOOM_LEVELS: [f64; 8] = [0.5, 0.75, 1.0, 1.25, 1.5, 2.0, 2.5, 3.0];

/// Bounds used when a selection arrives without pointer geometry.
pub const DEFAULT_SELECTION_RECT: Rect = Rect::new(100.0, 100.0, 200.0, 20.0);

//=========================================================================================
// Zoom Settings
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomSettings {
    pub min: f64,
    pub max: f64,
    pub fit_width: f64,
    pub fit_page: f64,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            min: 0.5,
            max: 3.0,
            fit_width: 1.2,
            fit_page: 1.0,
        }
    }
}

impl ZoomSettings {
    /// Resolves a request to a concrete factor. Non-finite factors resolve to nothing.
    pub fn resolve(&self, request: ZoomRequest) -> Option<f64> {
        match request {
            ZoomRequest::Factor(f) if f.is_finite() => Some(f.clamp(self.min, self.max)),
            ZoomRequest::Factor(_) => None,
            ZoomRequest::FitWidth => Some(self.fit_width),
            ZoomRequest::FitPage => Some(self.fit_page),
        }
    }
}

//=========================================================================================
// The Session Controller
//=========================================================================================

pub struct ReaderSession {
    library: Library,
    zoom: ZoomSettings,
    state: ViewState,
    /// Page count of the active document, 0 when nothing is selected.
    page_count: u32,
    searches: RequestSequencer,
    search_results: Vec<SearchResult>,
}

impl ReaderSession {
    pub fn new(library: Library, zoom: ZoomSettings) -> Self {
        Self {
            library,
            zoom,
            state: ViewState::default(),
            page_count: 0,
            searches: RequestSequencer::new(),
            search_results: Vec::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn search_results(&self) -> &[SearchResult] {
        &self.search_results
    }

    /// Makes `id` the active document and stamps its `last_opened_at`.
    ///
    /// An unknown id fails with `NotFound` and leaves the view-state untouched.
    pub async fn select_document(&mut self, id: Uuid) -> PortResult<Document> {
        let document = self
            .library
            .documents()
            .update(id, DocumentPatch::opened_at(Utc::now()))
            .await?;

        self.state.active_document_id = Some(document.id);
        self.state.current_page = 1;
        self.page_count = document.page_count;
        debug!(document_id = %id, pages = document.page_count, "Document selected");
        Ok(document)
    }

    /// Moves the page cursor, clamped into the active document's page range.
    pub fn set_page(&mut self, page: i64) -> u32 {
        if self.state.active_document_id.is_none() || self.page_count == 0 {
            return self.state.current_page;
        }
        let clamped = page.clamp(1, i64::from(self.page_count));
        self.state.current_page = clamped as u32;
        self.state.current_page
    }

    pub fn next_page(&mut self) -> u32 {
        self.set_page(i64::from(self.state.current_page) + 1)
    }

    pub fn previous_page(&mut self) -> u32 {
        self.set_page(i64::from(self.state.current_page) - 1)
    }

    pub fn set_zoom(&mut self, request: ZoomRequest) -> f64 {
        if let Some(factor) = self.zoom.resolve(request) {
            self.state.zoom_factor = factor;
        }
        self.state.zoom_factor
    }

    pub fn zoom_in(&mut self) -> f64 {
        let idx = self.level_index();
        let next = ZOOM_LEVELS[(idx + 1).min(ZOOM_LEVELS.len() - 1)];
        self.set_zoom(ZoomRequest::Factor(next))
    }

    pub fn zoom_out(&mut self) -> f64 {
        let idx = self.level_index();
        let prev = ZOOM_LEVELS[idx.saturating_sub(1)];
        self.set_zoom(ZoomRequest::Factor(prev))
    }

    /// Index of the first level at or above the current factor.
    fn level_index(&self) -> usize {
        ZOOM_LEVELS
            .iter()
            .position(|level| *level >= self.state.zoom_factor)
            .unwrap_or(ZOOM_LEVELS.len() - 1)
    }

    /// Switches tool. The colour only changes when one is given.
    pub fn set_tool(&mut self, tool: Tool, color: Option<Color>) {
        self.state.active_tool = tool;
        if let Some(color) = color {
            self.state.active_color = color;
        }
    }

    /// Turns a text selection into a highlight or pen stroke.
    ///
    /// Returns `Ok(None)` without touching any store when the active tool does
    /// not annotate selections, no document is active, or the text is blank.
    /// If the active document has since been deleted the commit fails with
    /// `NotFound`, except under the `Orphan` delete policy.
    pub async fn commit_annotation_from_selection(
        &self,
        selected_text: &str,
        page_at: u32,
    ) -> PortResult<Option<Annotation>> {
        self.commit_selection_at(selected_text, page_at, DEFAULT_SELECTION_RECT)
            .await
    }

    pub async fn commit_selection_at(
        &self,
        selected_text: &str,
        page_at: u32,
        bounds: Rect,
    ) -> PortResult<Option<Annotation>> {
        let Some(kind) = self.state.active_tool.selection_kind() else {
            return Ok(None);
        };
        let Some(document_id) = self.state.active_document_id else {
            return Ok(None);
        };
        if selected_text.trim().is_empty() {
            return Ok(None);
        }

        let annotation = self
            .library
            .annotate(NewAnnotation {
                document_id,
                kind,
                page_number: page_at,
                content: selected_text.to_string(),
                color: Some(self.state.active_color.clone()),
                coordinates: bounds,
            })
            .await?;
        Ok(Some(annotation))
    }

    /// Pins a note to a page while the note tool is active.
    pub async fn commit_note(
        &self,
        body: &str,
        page_at: u32,
        at: Rect,
    ) -> PortResult<Option<Annotation>> {
        if self.state.active_tool != Tool::Note || body.trim().is_empty() {
            return Ok(None);
        }
        let Some(document_id) = self.state.active_document_id else {
            return Ok(None);
        };

        let note = self
            .library
            .annotate(NewAnnotation {
                document_id,
                kind: AnnotationKind::Note,
                page_number: page_at,
                content: body.to_string(),
                color: None,
                coordinates: at,
            })
            .await?;
        Ok(Some(note))
    }

    /// Annotations of the active document, newest first.
    pub async fn annotations(&self) -> PortResult<Vec<Annotation>> {
        match self.state.active_document_id {
            Some(id) => self.library.annotations().list_by_document(id).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn annotations_on_page(&self, page: u32) -> PortResult<Vec<Annotation>> {
        let mut all = self.annotations().await?;
        all.retain(|a| a.page_number == page);
        Ok(all)
    }

    //=====================================================================================
    // Latest-wins search
    //=====================================================================================

    /// Handle to the search port, for callers that run the query outside the session lock.
    pub fn search_service(&self) -> Arc<dyn SearchService> {
        Arc::clone(self.library.search())
    }

    pub fn begin_search(&self) -> Ticket {
        self.searches.issue()
    }

    /// Stores `results` if `ticket` is still the newest search. Stale results are dropped.
    pub fn finish_search(&mut self, ticket: Ticket, results: Vec<SearchResult>) -> bool {
        if !self.searches.is_latest(ticket) {
            debug!(ticket = ticket.value(), "Discarding stale search results");
            return false;
        }
        self.search_results = results;
        true
    }

    pub async fn search(&mut self, text: &str) -> PortResult<Vec<SearchResult>> {
        let ticket = self.begin_search();
        let results = self.library.search().search(&SearchQuery::new(text)).await?;
        self.finish_search(ticket, results.clone());
        Ok(results)
    }

    /// Back to the initial view-state. In-flight searches become stale.
    pub fn reset(&mut self) {
        self.state = ViewState::default();
        self.page_count = 0;
        self.search_results.clear();
        self.searches.issue();
    }
}
