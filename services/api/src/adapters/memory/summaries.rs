//! services/api/src/adapters/memory/summaries.rs
//!
//! The in-memory summary store. Implements the `SummaryRepository` port and
//! delegates the actual writing of summaries to a `SummarizationService`.

use async_trait::async_trait;
use chrono::Utc;
use pdf_reader_core::domain::{NewSummary, Summary, SummaryPatch};
use pdf_reader_core::ports::{PortError, PortResult, SummarizationService, SummaryRepository};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error};
use uuid::Uuid;

use super::ids::IdAllocator;
use crate::adapters::latency::{Operation, SimulatedLatency};

#[derive(Default)]
struct Inner {
    /// Newest first.
    summaries: VecDeque<Summary>,
    ids: IdAllocator,
}

impl Inner {
    fn insert(&mut self, new: NewSummary) -> Summary {
        let summary = Summary {
            id: self.ids.next(),
            document_id: new.document_id,
            page_number: new.page_number,
            summary_text: new.summary_text,
            key_points: new.key_points,
            generated_at: Utc::now(),
        };
        self.summaries.push_front(summary.clone());
        summary
    }
}

pub struct InMemorySummaryStore {
    inner: RwLock<Inner>,
    summarizer: Arc<dyn SummarizationService>,
    latency: Arc<SimulatedLatency>,
}

impl InMemorySummaryStore {
    pub fn new(summarizer: Arc<dyn SummarizationService>, latency: Arc<SimulatedLatency>) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            summarizer,
            latency,
        }
    }
}

fn check_page(page_number: u32) -> PortResult<()> {
    if page_number == 0 {
        return Err(PortError::InvalidInput("Page numbers start at 1".to_string()));
    }
    Ok(())
}

#[async_trait]
impl SummaryRepository for InMemorySummaryStore {
    async fn list(&self) -> PortResult<Vec<Summary>> {
        self.latency.wait(Operation::List).await;
        Ok(self.inner.read().await.summaries.iter().cloned().collect())
    }

    async fn get(&self, id: Uuid) -> PortResult<Summary> {
        self.latency.wait(Operation::Get).await;
        self.inner
            .read()
            .await
            .summaries
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| PortError::summary_not_found(id))
    }

    async fn create(&self, new: NewSummary) -> PortResult<Summary> {
        self.latency.wait(Operation::Create).await;
        check_page(new.page_number)?;
        Ok(self.inner.write().await.insert(new))
    }

    async fn update(&self, id: Uuid, patch: SummaryPatch) -> PortResult<Summary> {
        self.latency.wait(Operation::Update).await;
        if let Some(page) = patch.page_number {
            check_page(page)?;
        }

        let mut inner = self.inner.write().await;
        let summary = inner
            .summaries
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| PortError::summary_not_found(id))?;
        patch.apply_to(summary);
        Ok(summary.clone())
    }

    async fn delete(&self, id: Uuid) -> PortResult<Summary> {
        self.latency.wait(Operation::Delete).await;
        let mut inner = self.inner.write().await;
        let index = inner
            .summaries
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| PortError::summary_not_found(id))?;
        inner
            .summaries
            .remove(index)
            .ok_or_else(|| PortError::summary_not_found(id))
    }

    async fn list_by_document(&self, document_id: Uuid) -> PortResult<Vec<Summary>> {
        self.latency.wait(Operation::List).await;
        Ok(self
            .inner
            .read()
            .await
            .summaries
            .iter()
            .filter(|s| s.document_id == document_id)
            .cloned()
            .collect())
    }

    async fn generate(
        &self,
        document_id: Uuid,
        page_number: u32,
        source_text: &str,
    ) -> PortResult<Summary> {
        check_page(page_number)?;

        // The collaborator runs without the store lock held.
        let draft = self.summarizer.summarize(source_text).await.map_err(|e| {
            error!(document_id = %document_id, page = page_number, "Summarization failed: {}", e);
            match e {
                PortError::OperationFailed(_) => e,
                other => PortError::OperationFailed(other.to_string()),
            }
        })?;

        let summary = self.inner.write().await.insert(NewSummary {
            document_id,
            page_number,
            summary_text: draft.summary_text,
            key_points: draft.key_points,
        });
        debug!(summary_id = %summary.id, "Summary stored");
        Ok(summary)
    }

    async fn delete_by_document(&self, document_id: Uuid) -> PortResult<usize> {
        self.latency.wait(Operation::Delete).await;
        let mut inner = self.inner.write().await;
        let before = inner.summaries.len();
        inner.summaries.retain(|s| s.document_id != document_id);
        Ok(before - inner.summaries.len())
    }
}
