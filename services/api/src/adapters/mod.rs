pub mod latency;
pub mod memory;
pub mod ocr;
pub mod search_index;
pub mod seed;
pub mod summarizer;

pub use latency::{Operation, SimulatedLatency, MAX_LATENCY_SCALE};
pub use memory::{InMemoryAnnotationStore, InMemoryDocumentStore, InMemorySummaryStore};
pub use ocr::MockOcrEngine;
pub use search_index::InMemorySearchIndex;
pub use summarizer::TemplateSummarizer;
