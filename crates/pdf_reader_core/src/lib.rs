pub mod domain;
pub mod library;
pub mod ports;
pub mod search;
pub mod sequence;
pub mod session;

pub use domain::{
    Annotation, AnnotationExport, AnnotationKind, AnnotationPatch, Color, Document, DocumentDraft,
    DocumentPatch, ExportedAnnotation, IndexReceipt, NewAnnotation, NewSummary, Rect,
    SearchQuery, SearchResult, SemanticSearchResult, Summary, SummaryDraft, SummaryPatch, Tool, ViewState, ZoomRequest,
};
pub use library::{DeletePolicy, DeletionReport, Library};
pub use ports::{
    AnnotationRepository, DocumentRepository, PortError, PortResult, SearchService,
    SummarizationService, SummaryRepository, TextExtractionService,
};
pub use session::{ReaderSession, ZoomSettings};
