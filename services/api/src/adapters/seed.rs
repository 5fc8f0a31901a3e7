//! services/api/src/adapters/seed.rs
//!
//! Demo content loaded at start-up when `SEED_DEMO_DATA` is on: a small
//! library, some annotations and summaries, and the fixed search corpus
//! that the mock index answers from.

use pdf_reader_core::domain::{AnnotationKind, Color, DocumentDraft, NewAnnotation, NewSummary, Rect};
use pdf_reader_core::ports::{AnnotationRepository, DocumentRepository, PortResult, SummaryRepository};
use pdf_reader_core::search::CorpusEntry;
use tracing::info;

use crate::adapters::search_index::InMemorySearchIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub documents: usize,
    pub annotations: usize,
    pub summaries: usize,
    pub corpus_entries: usize,
}

struct DemoDocument {
    title: &'static str,
    size_bytes: u64,
    page_count: u32,
    /// (page, snippet, base score)
    snippets: &'static [(u32, &'static str, f64)],
}

const DEMO_LIBRARY: [DemoDocument; 3] = [
    DemoDocument {
        title: "Deep Learning Fundamentals",
        size_bytes: 2_457_600,
        page_count: 45,
        snippets: &[
            (3, "Neural networks learn hierarchical representations from raw data through stacked layers.", 0.92),
            (12, "Backpropagation computes gradients efficiently by applying the chain rule layer by layer.", 0.85),
            (27, "Regularization techniques such as dropout reduce overfitting in deep neural networks.", 0.78),
        ],
    },
    DemoDocument {
        title: "Statistical Methods in Data Science",
        size_bytes: 1_843_200,
        page_count: 32,
        snippets: &[
            (5, "Hypothesis testing provides a framework for statistical inference from sample data.", 0.88),
            (14, "Bayesian methods update prior beliefs with observed evidence to form posterior distributions.", 0.81),
            (22, "Data analysis pipelines combine cleaning, exploration and statistical modelling.", 0.74),
        ],
    },
    DemoDocument {
        title: "Pattern Recognition Handbook",
        size_bytes: 3_145_728,
        page_count: 28,
        snippets: &[
            (8, "Feature extraction transforms raw signals into representations suited to classification.", 0.83),
            (19, "Clustering algorithms discover structure in unlabeled data without supervision.", 0.76),
        ],
    },
];

pub async fn seed_demo_library(
    documents: &dyn DocumentRepository,
    annotations: &dyn AnnotationRepository,
    summaries: &dyn SummaryRepository,
    index: &InMemorySearchIndex,
) -> PortResult<SeedReport> {
    let mut report = SeedReport {
        documents: 0,
        annotations: 0,
        summaries: 0,
        corpus_entries: 0,
    };
    let mut corpus = Vec::new();
    let mut created = Vec::new();

    for demo in &DEMO_LIBRARY {
        let document = documents
            .create(DocumentDraft {
                title: demo.title.to_string(),
                size_bytes: demo.size_bytes,
                page_count: demo.page_count,
            })
            .await?;
        corpus.extend(
            demo.snippets
                .iter()
                .map(|(page, snippet, score)| CorpusEntry::new(document.id, *page, *snippet, *score)),
        );
        report.documents += 1;
        created.push(document);
    }

    let first = &created[0];
    let palette = ["#88C0D0", "#EBCB8B"];
    for (i, (page, content)) in [
        (3, "hierarchical representations"),
        (12, "chain rule layer by layer"),
    ]
    .into_iter()
    .enumerate()
    {
        annotations
            .create(NewAnnotation {
                document_id: first.id,
                kind: AnnotationKind::Highlight,
                page_number: page,
                content: content.to_string(),
                color: Some(palette[i].parse::<Color>()?),
                coordinates: Rect::new(100.0, 120.0 + 30.0 * i as f64, 220.0, 18.0),
            })
            .await?;
        report.annotations += 1;
    }
    annotations
        .create(NewAnnotation {
            document_id: first.id,
            kind: AnnotationKind::Note,
            page_number: 27,
            content: "Compare dropout rates with the appendix results.".to_string(),
            color: None,
            coordinates: Rect::new(420.0, 80.0, 24.0, 24.0),
        })
        .await?;
    report.annotations += 1;

    for document in created.iter().take(2) {
        summaries
            .create(NewSummary {
                document_id: document.id,
                page_number: 1,
                summary_text: format!(
                    "An introduction to {} that frames the chapters that follow.",
                    document.title
                ),
                key_points: vec![
                    "Core concepts and definitions are clearly established".to_string(),
                    "Practical applications demonstrate real-world relevance".to_string(),
                ],
            })
            .await?;
        report.summaries += 1;
    }

    report.corpus_entries = corpus.len();
    index.extend(corpus).await;

    info!(
        documents = report.documents,
        annotations = report.annotations,
        summaries = report.summaries,
        corpus = report.corpus_entries,
        "Demo library seeded"
    );
    Ok(report)
}
