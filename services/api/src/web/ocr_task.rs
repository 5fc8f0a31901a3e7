//! services/api/src/web/ocr_task.rs
//!
//! The background worker that runs OCR for a freshly imported document.

use pdf_reader_core::library::Library;
use pdf_reader_core::ports::PortResult;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

/// Waits `delay`, then processes the document.
///
/// Nothing cancels this task: if the document is deleted in the meantime the
/// run ends with `NotFound`, which is logged and otherwise ignored.
pub async fn ocr_process(library: Library, document_id: Uuid, delay: Duration) -> PortResult<()> {
    tokio::time::sleep(delay).await;
    info!(document_id = %document_id, "OCR process started.");
    let document = library.process_ocr(document_id).await?;
    info!(
        document_id = %document_id,
        pages = document.extracted_text.len(),
        "OCR process finished."
    );
    Ok(())
}

pub fn spawn_ocr(library: Library, document_id: Uuid, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = ocr_process(library, document_id, delay).await {
            error!(document_id = %document_id, "OCR processing failed: {}", e);
        }
    })
}
