//! services/api/src/adapters/summarizer.rs
//!
//! This module contains the template-based summarizer. It implements the
//! `SummarizationService` port from the core crate and stands in for a real
//! language-model call.

use async_trait::async_trait;
use pdf_reader_core::domain::SummaryDraft;
use pdf_reader_core::ports::{PortResult, SummarizationService};
use std::sync::{Arc, Mutex};

use crate::adapters::latency::{Operation, SimulatedLatency};

const SUMMARY_TEMPLATES: [&str; 4] = [
    "This section discusses key concepts related to the main topic, providing foundational understanding and practical applications.",
    "The content explores various methodologies and approaches, highlighting their strengths and limitations in different contexts.",
    "Important theoretical frameworks are presented along with empirical evidence and real-world case studies.",
    "The material covers advanced techniques and their implementation, offering insights into best practices and common pitfalls.",
];

const KEY_POINT_POOL: [&str; 5] = [
    "Core concepts and definitions are clearly established",
    "Multiple approaches are compared and contrasted",
    "Practical applications demonstrate real-world relevance",
    "Methodological considerations ensure validity and reliability",
    "Future research directions are identified and discussed",
];

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// Picks one summary template and the first two to four key points of a fixed pool.
///
/// The source text is ignored. With a seed the sequence of outputs is reproducible.
pub struct TemplateSummarizer {
    rng: Mutex<fastrand::Rng>,
    latency: Arc<SimulatedLatency>,
}

impl TemplateSummarizer {
    pub fn new(seed: Option<u64>, latency: Arc<SimulatedLatency>) -> Self {
        let rng = match seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self {
            rng: Mutex::new(rng),
            latency,
        }
    }

    fn draft(&self) -> SummaryDraft {
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        let template = SUMMARY_TEMPLATES[rng.usize(..SUMMARY_TEMPLATES.len())];
        let points = rng.usize(2..=4);
        SummaryDraft {
            summary_text: template.to_string(),
            key_points: KEY_POINT_POOL[..points].iter().map(|p| p.to_string()).collect(),
        }
    }
}

//=========================================================================================
// `SummarizationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SummarizationService for TemplateSummarizer {
    async fn summarize(&self, _source_text: &str) -> PortResult<SummaryDraft> {
        self.latency.wait(Operation::Summarize).await;
        Ok(self.draft())
    }
}
