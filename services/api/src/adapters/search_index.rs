//! services/api/src/adapters/search_index.rs
//!
//! The mock "semantic" search index: a list of pre-scored snippets plus the
//! pages indexed from OCR output. Ranking is delegated to
//! `pdf_reader_core::search::rank`.

use async_trait::async_trait;
use chrono::Utc;
use pdf_reader_core::domain::{IndexReceipt, SearchQuery, SearchResult, SemanticSearchResult};
use pdf_reader_core::ports::{PortResult, SearchService};
use pdf_reader_core::search::{self, CorpusEntry, INDEXED_BASE_SCORE, SNIPPET_CHARS};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::adapters::latency::{Operation, SimulatedLatency};

const SEMANTIC_CONTEXTS: [&str; 4] = [
    "Conceptually related through shared domain knowledge",
    "Methodologically similar approaches and techniques",
    "Theoretical framework alignment and connections",
    "Practical application overlap and use cases",
];

const CONCEPT_POOL: [&str; 9] = [
    "machine learning",
    "neural networks",
    "data analysis",
    "statistical methods",
    "algorithms",
    "pattern recognition",
    "artificial intelligence",
    "deep learning",
    "data science",
];

pub struct InMemorySearchIndex {
    corpus: RwLock<Vec<CorpusEntry>>,
    default_limit: usize,
    latency: Arc<SimulatedLatency>,
    /// Picks semantic contexts and concept counts.
    rng: Mutex<fastrand::Rng>,
}

impl InMemorySearchIndex {
    pub fn new(default_limit: usize, latency: Arc<SimulatedLatency>) -> Self {
        Self::with_corpus(Vec::new(), default_limit, latency)
    }

    pub fn with_corpus(
        corpus: Vec<CorpusEntry>,
        default_limit: usize,
        latency: Arc<SimulatedLatency>,
    ) -> Self {
        Self {
            corpus: RwLock::new(corpus),
            default_limit,
            latency,
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    /// Makes the semantic enrichment reproducible.
    pub fn with_seed(self, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self {
                rng: Mutex::new(fastrand::Rng::with_seed(seed)),
                ..self
            },
            None => self,
        }
    }

    fn enrich(&self, result: SearchResult) -> SemanticSearchResult {
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        let semantic_context = SEMANTIC_CONTEXTS[rng.usize(..SEMANTIC_CONTEXTS.len())];
        let concepts = rng.usize(1..=3);
        SemanticSearchResult {
            result,
            semantic_context: semantic_context.to_string(),
            concepts: CONCEPT_POOL[..concepts].iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Appends fixed entries, e.g. a demo corpus.
    pub async fn extend(&self, entries: impl IntoIterator<Item = CorpusEntry>) {
        self.corpus.write().await.extend(entries);
    }

    pub async fn entry_count(&self) -> usize {
        self.corpus.read().await.len()
    }
}

#[async_trait]
impl SearchService for InMemorySearchIndex {
    async fn search(&self, query: &SearchQuery) -> PortResult<Vec<SearchResult>> {
        self.latency.wait(Operation::Search).await;
        let corpus = self.corpus.read().await;
        let results = search::rank(corpus.iter(), query, self.default_limit);
        debug!(query = %query.text, hits = results.len(), "Search ranked");
        Ok(results)
    }

    async fn search_semantic(
        &self,
        query: &SearchQuery,
        context: &str,
    ) -> PortResult<Vec<SemanticSearchResult>> {
        self.latency.wait(Operation::SemanticSearch).await;
        let results = self.search(query).await?;
        debug!(query = %query.text, context, hits = results.len(), "Semantic search enriched");
        Ok(results.into_iter().map(|r| self.enrich(r)).collect())
    }

    async fn index_document(
        &self,
        document_id: Uuid,
        pages: &[String],
    ) -> PortResult<IndexReceipt> {
        self.latency.wait(Operation::Index).await;

        let entries: Vec<CorpusEntry> = pages
            .iter()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(idx, text)| {
                CorpusEntry::new(
                    document_id,
                    idx as u32 + 1,
                    search::excerpt(text, SNIPPET_CHARS),
                    INDEXED_BASE_SCORE,
                )
            })
            .collect();
        let word_count: usize = pages.iter().map(|p| p.split_whitespace().count()).sum();
        let indexed_pages = entries.len();

        let mut corpus = self.corpus.write().await;
        corpus.retain(|e| e.document_id != document_id);
        corpus.extend(entries);

        Ok(IndexReceipt {
            document_id,
            indexed_pages,
            word_count,
            indexed_at: Utc::now(),
        })
    }

    async fn remove_document(&self, document_id: Uuid) -> PortResult<usize> {
        self.latency.wait(Operation::Delete).await;
        let mut corpus = self.corpus.write().await;
        let before = corpus.len();
        corpus.retain(|e| e.document_id != document_id);
        Ok(before - corpus.len())
    }
}
