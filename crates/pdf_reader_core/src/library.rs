//! crates/pdf_reader_core/src/library.rs
//!
//! The document library: the workflows that span more than one store.
//! Import, OCR processing, page summaries and deletion under a
//! referential-integrity policy.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::{Annotation, Document, DocumentDraft, DocumentPatch, NewAnnotation, Summary};
use crate::ports::{
    AnnotationRepository, DocumentRepository, PortError, PortResult, SearchService,
    SummaryRepository, TextExtractionService,
};

//=========================================================================================
// Delete Policy
//=========================================================================================

/// What happens to annotations, summaries and index entries when their document goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Delete the document only; dependents keep pointing at a missing id.
    Orphan,
    /// Delete the document and everything referencing it.
    #[default]
    Cascade,
    /// Refuse to delete a document that still has annotations or summaries.
    Reject,
}

impl FromStr for DeletePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "orphan" => Ok(DeletePolicy::Orphan),
            "cascade" => Ok(DeletePolicy::Cascade),
            "reject" => Ok(DeletePolicy::Reject),
            other => Err(format!("unknown delete policy '{}'", other)),
        }
    }
}

/// What a delete removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionReport {
    pub document: Document,
    pub annotations_removed: usize,
    pub summaries_removed: usize,
    pub index_entries_removed: usize,
}

//=========================================================================================
// The Library Service
//=========================================================================================

#[derive(Clone)]
pub struct Library {
    documents: Arc<dyn DocumentRepository>,
    annotations: Arc<dyn AnnotationRepository>,
    summaries: Arc<dyn SummaryRepository>,
    search: Arc<dyn SearchService>,
    ocr: Arc<dyn TextExtractionService>,
    policy: DeletePolicy,
    /// Documents whose OCR is currently running.
    ocr_in_flight: Arc<Mutex<HashSet<Uuid>>>,
    /// Creating dependents holds this shared; checked deletes hold it exclusively.
    integrity: Arc<RwLock<()>>,
}

/// Removes a document id from the in-flight set when the OCR run ends, however it ends.
struct InFlight {
    set: Arc<Mutex<HashSet<Uuid>>>,
    id: Uuid,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if let Ok(mut set) = self.set.lock() {
            set.remove(&self.id);
        }
    }
}

impl Library {
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        annotations: Arc<dyn AnnotationRepository>,
        summaries: Arc<dyn SummaryRepository>,
        search: Arc<dyn SearchService>,
        ocr: Arc<dyn TextExtractionService>,
    ) -> Self {
        Self {
            documents,
            annotations,
            summaries,
            search,
            ocr,
            policy: DeletePolicy::default(),
            ocr_in_flight: Arc::new(Mutex::new(HashSet::new())),
            integrity: Arc::new(RwLock::new(())),
        }
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.policy
    }

    pub fn documents(&self) -> &Arc<dyn DocumentRepository> {
        &self.documents
    }

    pub fn annotations(&self) -> &Arc<dyn AnnotationRepository> {
        &self.annotations
    }

    pub fn search(&self) -> &Arc<dyn SearchService> {
        &self.search
    }

    /// Fails with `NotFound` unless the policy tolerates dangling references.
    async fn ensure_document(&self, id: Uuid) -> PortResult<()> {
        if self.policy != DeletePolicy::Orphan {
            self.documents.get(id).await?;
        }
        Ok(())
    }

    /// Stores an annotation, refusing documents that do not exist unless the policy is `Orphan`.
    pub async fn annotate(&self, new: NewAnnotation) -> PortResult<Annotation> {
        let _shared = self.integrity.read().await;
        self.ensure_document(new.document_id).await?;
        let annotation = self.annotations.create(new).await?;
        debug!(
            annotation_id = %annotation.id,
            document_id = %annotation.document_id,
            "Annotation created"
        );
        Ok(annotation)
    }

    pub async fn import(&self, draft: DocumentDraft) -> PortResult<Document> {
        let document = self.documents.create(draft).await?;
        info!(
            document_id = %document.id,
            title = %document.title,
            pages = document.page_count,
            "Document imported"
        );
        Ok(document)
    }

    /// Runs OCR for a document once.
    ///
    /// An already processed document, or one whose OCR is running right now, is
    /// returned as it is. Extraction failures leave the document untouched.
    pub async fn process_ocr(&self, id: Uuid) -> PortResult<Document> {
        let document = self.documents.get(id).await?;
        if document.ocr_processed {
            debug!(document_id = %id, "OCR already done, skipping");
            return Ok(document);
        }

        let _guard = {
            let mut set = self
                .ocr_in_flight
                .lock()
                .map_err(|_| PortError::OperationFailed("OCR bookkeeping poisoned".to_string()))?;
            if !set.insert(id) {
                debug!(document_id = %id, "OCR already running, skipping");
                return Ok(document);
            }
            InFlight {
                set: Arc::clone(&self.ocr_in_flight),
                id,
            }
        };

        // A run that finished between the first read and taking the guard has already done the work.
        let document = self.documents.get(id).await?;
        if document.ocr_processed {
            debug!(document_id = %id, "OCR finished meanwhile, skipping");
            return Ok(document);
        }

        let pages = self.ocr.extract_text(&document).await.map_err(|e| {
            error!(document_id = %id, "OCR extraction failed: {}", e);
            e
        })?;

        let updated = self
            .documents
            .update(id, DocumentPatch::ocr_completed(pages.clone()))
            .await?;

        match self.search.index_document(id, &pages).await {
            Ok(receipt) => info!(
                document_id = %id,
                pages = receipt.indexed_pages,
                words = receipt.word_count,
                "OCR complete, document indexed"
            ),
            Err(e) => warn!(document_id = %id, "OCR complete but indexing failed: {}", e),
        }
        Ok(updated)
    }

    /// Summarises one page, using its OCR text when there is any.
    pub async fn generate_summary(&self, document_id: Uuid, page_number: u32) -> PortResult<Summary> {
        let _shared = self.integrity.read().await;
        let document = self.documents.get(document_id).await?;
        let source = page_number
            .checked_sub(1)
            .and_then(|idx| document.extracted_text.get(idx as usize))
            .map(String::as_str)
            .unwrap_or_default();

        let summary = self
            .summaries
            .generate(document_id, page_number, source)
            .await?;
        info!(document_id = %document_id, page = page_number, "Summary generated");
        Ok(summary)
    }

    pub async fn delete_document(&self, id: Uuid) -> PortResult<DeletionReport> {
        match self.policy {
            DeletePolicy::Orphan => {
                let document = self.documents.delete(id).await?;
                info!(document_id = %id, "Document deleted, dependents left in place");
                Ok(DeletionReport {
                    document,
                    annotations_removed: 0,
                    summaries_removed: 0,
                    index_entries_removed: 0,
                })
            }
            DeletePolicy::Reject => {
                let _exclusive = self.integrity.write().await;
                self.documents.get(id).await?;
                let (annotations, summaries) = futures::try_join!(
                    self.annotations.list_by_document(id),
                    self.summaries.list_by_document(id),
                )?;
                if !annotations.is_empty() || !summaries.is_empty() {
                    warn!(document_id = %id, "Refusing to delete document with dependents");
                    return Err(PortError::Conflict(format!(
                        "Document {} still has {} annotation(s) and {} summary(ies)",
                        id,
                        annotations.len(),
                        summaries.len()
                    )));
                }
                let document = self.documents.delete(id).await?;
                let index_entries_removed = self.search.remove_document(id).await?;
                info!(document_id = %id, "Document deleted");
                Ok(DeletionReport {
                    document,
                    annotations_removed: 0,
                    summaries_removed: 0,
                    index_entries_removed,
                })
            }
            DeletePolicy::Cascade => {
                let _exclusive = self.integrity.write().await;
                let document = self.documents.delete(id).await?;
                let (annotations_removed, summaries_removed, index_entries_removed) =
                    futures::try_join!(
                        self.annotations.delete_by_document(id),
                        self.summaries.delete_by_document(id),
                        self.search.remove_document(id),
                    )?;
                info!(
                    document_id = %id,
                    annotations = annotations_removed,
                    summaries = summaries_removed,
                    "Document and dependents deleted"
                );
                Ok(DeletionReport {
                    document,
                    annotations_removed,
                    summaries_removed,
                    index_entries_removed,
                })
            }
        }
    }
}
