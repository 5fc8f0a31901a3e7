//! crates/pdf_reader_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the reader's core logic.
//! These traits form the boundary of the hexagonal architecture, so the core
//! stays independent of how documents are stored or how text is produced.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Annotation, AnnotationExport, AnnotationPatch, Document, DocumentDraft, DocumentPatch,
    IndexReceipt, InvalidColor, InvalidZoom, NewAnnotation, NewSummary, SearchQuery,
    SearchResult, SemanticSearchResult, Summary, SummaryDraft, SummaryPatch,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
///
/// Invalid-but-harmless input (blank queries, out-of-range pages) is not an
/// error at all: those calls degrade to an empty result or leave state alone.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl PortError {
    pub fn document_not_found(id: Uuid) -> Self {
        PortError::NotFound(format!("Document {} not found", id))
    }

    pub fn annotation_not_found(id: Uuid) -> Self {
        PortError::NotFound(format!("Annotation {} not found", id))
    }

    pub fn summary_not_found(id: Uuid) -> Self {
        PortError::NotFound(format!("Summary {} not found", id))
    }
}

impl From<InvalidColor> for PortError {
    fn from(e: InvalidColor) -> Self {
        PortError::InvalidInput(e.to_string())
    }
}

impl From<InvalidZoom> for PortError {
    fn from(e: InvalidZoom) -> Self {
        PortError::InvalidInput(e.to_string())
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Store Ports
//=========================================================================================

/// Every listing is a snapshot, newest first. Mutating the returned vectors
/// never affects the store.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn list(&self) -> PortResult<Vec<Document>>;

    async fn get(&self, id: Uuid) -> PortResult<Document>;

    /// Assigns a fresh id that has never been handed out before.
    async fn create(&self, draft: DocumentDraft) -> PortResult<Document>;

    async fn update(&self, id: Uuid, patch: DocumentPatch) -> PortResult<Document>;

    async fn delete(&self, id: Uuid) -> PortResult<Document>;
}

#[async_trait]
pub trait AnnotationRepository: Send + Sync {
    async fn list(&self) -> PortResult<Vec<Annotation>>;

    async fn get(&self, id: Uuid) -> PortResult<Annotation>;

    async fn create(&self, new: NewAnnotation) -> PortResult<Annotation>;

    async fn update(&self, id: Uuid, patch: AnnotationPatch) -> PortResult<Annotation>;

    async fn delete(&self, id: Uuid) -> PortResult<Annotation>;

    async fn list_by_document(&self, document_id: Uuid) -> PortResult<Vec<Annotation>>;

    async fn export_for_document(&self, document_id: Uuid) -> PortResult<AnnotationExport>;

    /// Removes every annotation of a document, returning how many went.
    async fn delete_by_document(&self, document_id: Uuid) -> PortResult<usize>;
}

#[async_trait]
pub trait SummaryRepository: Send + Sync {
    async fn list(&self) -> PortResult<Vec<Summary>>;

    async fn get(&self, id: Uuid) -> PortResult<Summary>;

    async fn create(&self, new: NewSummary) -> PortResult<Summary>;

    async fn update(&self, id: Uuid, patch: SummaryPatch) -> PortResult<Summary>;

    async fn delete(&self, id: Uuid) -> PortResult<Summary>;

    async fn list_by_document(&self, document_id: Uuid) -> PortResult<Vec<Summary>>;

    /// Summarises `source_text` and stores the result for (document, page).
    async fn generate(
        &self,
        document_id: Uuid,
        page_number: u32,
        source_text: &str,
    ) -> PortResult<Summary>;

    async fn delete_by_document(&self, document_id: Uuid) -> PortResult<usize>;
}

//=========================================================================================
// Service Ports
//=========================================================================================

#[async_trait]
pub trait SearchService: Send + Sync {
    /// Ranks the corpus against a query. A blank query yields no results.
    async fn search(&self, query: &SearchQuery) -> PortResult<Vec<SearchResult>>;

    /// Ranks like `search`, then attaches a semantic context and related concepts to each hit.
    async fn search_semantic(
        &self,
        query: &SearchQuery,
        context: &str,
    ) -> PortResult<Vec<SemanticSearchResult>>;

    /// Replaces the indexed pages of a document.
    async fn index_document(&self, document_id: Uuid, pages: &[String])
        -> PortResult<IndexReceipt>;

    async fn remove_document(&self, document_id: Uuid) -> PortResult<usize>;
}

#[async_trait]
pub trait SummarizationService: Send + Sync {
    /// Produces a summary text and two to four key points.
    async fn summarize(&self, source_text: &str) -> PortResult<SummaryDraft>;
}

#[async_trait]
pub trait TextExtractionService: Send + Sync {
    /// Extracts one text entry per page of the document.
    async fn extract_text(&self, document: &Document) -> PortResult<Vec<String>>;
}
