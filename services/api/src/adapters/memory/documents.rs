//! services/api/src/adapters/memory/documents.rs
//!
//! The in-memory document store, the process-wide stand-in for a document
//! table. Implements the `DocumentRepository` port.

use async_trait::async_trait;
use pdf_reader_core::domain::{Document, DocumentDraft, DocumentPatch, MAX_PAGE_COUNT};
use pdf_reader_core::ports::{DocumentRepository, PortError, PortResult};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::ids::IdAllocator;
use crate::adapters::latency::{Operation, SimulatedLatency};

#[derive(Default)]
struct Inner {
    /// Newest first.
    documents: VecDeque<Document>,
    ids: IdAllocator,
}

pub struct InMemoryDocumentStore {
    inner: RwLock<Inner>,
    latency: Arc<SimulatedLatency>,
}

impl InMemoryDocumentStore {
    pub fn new(latency: Arc<SimulatedLatency>) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            latency,
        }
    }
}

fn check_page_count(page_count: u32) -> PortResult<()> {
    if page_count == 0 {
        return Err(PortError::InvalidInput(
            "A document needs at least one page".to_string(),
        ));
    }
    if page_count > MAX_PAGE_COUNT {
        return Err(PortError::InvalidInput(format!(
            "A document has at most {} pages, got {}",
            MAX_PAGE_COUNT, page_count
        )));
    }
    Ok(())
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentStore {
    async fn list(&self) -> PortResult<Vec<Document>> {
        self.latency.wait(Operation::List).await;
        let inner = self.inner.read().await;
        Ok(inner.documents.iter().cloned().collect())
    }

    async fn get(&self, id: Uuid) -> PortResult<Document> {
        self.latency.wait(Operation::Get).await;
        let inner = self.inner.read().await;
        inner
            .documents
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| PortError::document_not_found(id))
    }

    async fn create(&self, draft: DocumentDraft) -> PortResult<Document> {
        self.latency.wait(Operation::Create).await;
        check_page_count(draft.page_count)?;

        let mut inner = self.inner.write().await;
        let document = Document {
            id: inner.ids.next(),
            title: draft.title,
            size_bytes: draft.size_bytes,
            page_count: draft.page_count,
            last_opened_at: None,
            ocr_processed: false,
            extracted_text: Vec::new(),
        };
        inner.documents.push_front(document.clone());
        debug!(document_id = %document.id, "Document stored");
        Ok(document)
    }

    async fn update(&self, id: Uuid, patch: DocumentPatch) -> PortResult<Document> {
        self.latency.wait(Operation::Update).await;
        if let Some(page_count) = patch.page_count {
            check_page_count(page_count)?;
        }

        let mut inner = self.inner.write().await;
        let document = inner
            .documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| PortError::document_not_found(id))?;
        patch.apply_to(document);
        Ok(document.clone())
    }

    async fn delete(&self, id: Uuid) -> PortResult<Document> {
        self.latency.wait(Operation::Delete).await;
        let mut inner = self.inner.write().await;
        let index = inner
            .documents
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| PortError::document_not_found(id))?;
        inner
            .documents
            .remove(index)
            .ok_or_else(|| PortError::document_not_found(id))
    }
}
