//! services/api/src/adapters/ocr.rs
//!
//! The mock OCR engine. Implements the `TextExtractionService` port by
//! producing canned text for every page of a document.

use async_trait::async_trait;
use pdf_reader_core::domain::Document;
use pdf_reader_core::ports::{PortResult, TextExtractionService};
use std::sync::Arc;
use tracing::debug;

use crate::adapters::latency::{Operation, SimulatedLatency};

const PAGE_LINES: [&str; 3] = [
    "Sample extracted text from OCR processing...",
    "This would contain the actual text content from scanned pages.",
    "OCR technology converts images of text into machine-readable text.",
];

pub struct MockOcrEngine {
    latency: Arc<SimulatedLatency>,
}

impl MockOcrEngine {
    pub fn new(latency: Arc<SimulatedLatency>) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl TextExtractionService for MockOcrEngine {
    async fn extract_text(&self, document: &Document) -> PortResult<Vec<String>> {
        self.latency.wait(Operation::Ocr).await;
        let pages = (1..=document.page_count)
            .map(|page| {
                let line = PAGE_LINES[(page as usize - 1) % PAGE_LINES.len()];
                format!("{} page {}: {}", document.title, page, line)
            })
            .collect::<Vec<_>>();
        debug!(document_id = %document.id, pages = pages.len(), "Text extracted");
        Ok(pages)
    }
}
