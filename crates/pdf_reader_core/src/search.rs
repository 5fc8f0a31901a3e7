//! crates/pdf_reader_core/src/search.rs
//!
//! Relevance ranking for the snippet corpus. Adapters own the corpus; the
//! scoring rule lives here so every index ranks the same way.

use crate::domain::{SearchQuery, SearchResult};
use uuid::Uuid;

/// Score added for every query term found in a snippet.
pub const TERM_BOOST: f64 = 0.1;
pub const MAX_SCORE: f64 = 1.0;
/// Base score given to pages indexed from OCR output.
pub const INDEXED_BASE_SCORE: f64 = 0.5;
pub const SNIPPET_CHARS: usize = 240;

/// One searchable snippet.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusEntry {
    pub document_id: Uuid,
    pub page_number: u32,
    pub snippet: String,
    pub base_score: f64,
}

impl CorpusEntry {
    pub fn new(document_id: Uuid, page_number: u32, snippet: impl Into<String>, base_score: f64) -> Self {
        Self {
            document_id,
            page_number,
            snippet: snippet.into(),
            base_score,
        }
    }
}

/// Lower-cased, whitespace-split terms. Duplicates are kept and each one counts.
pub fn query_terms(text: &str) -> Vec<String> {
    text.to_lowercase().split_whitespace().map(str::to_string).collect()
}

/// Scores are rounded to six decimals so `0.7 + 0.1` ties with `0.8`.
pub fn score(entry: &CorpusEntry, terms: &[String]) -> f64 {
    let snippet = entry.snippet.to_lowercase();
    let hits = terms.iter().filter(|t| snippet.contains(t.as_str())).count();
    let raw = (entry.base_score + TERM_BOOST * hits as f64).clamp(0.0, MAX_SCORE);
    (raw * 1e6).round() / 1e6
}

/// Ranks `corpus` against `query`.
///
/// Blank queries return nothing. Results are sorted by descending score with
/// a stable sort, so equal scores keep corpus order, then truncated to the
/// query's limit (or `default_limit`).
pub fn rank<'a, I>(corpus: I, query: &SearchQuery, default_limit: usize) -> Vec<SearchResult>
where
    I: IntoIterator<Item = &'a CorpusEntry>,
{
    let terms = query_terms(&query.text);
    if terms.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<SearchResult> = corpus
        .into_iter()
        .filter(|e| query.document_ids.is_empty() || query.document_ids.contains(&e.document_id))
        .map(|e| SearchResult {
            document_id: e.document_id,
            page_number: e.page_number,
            snippet: e.snippet.clone(),
            relevance_score: score(e, &terms),
        })
        .collect();

    results.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
    results.truncate(query.limit.unwrap_or(default_limit));
    results
}

/// Cuts `text` to at most `max_chars` characters, marking the cut with `...`.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(doc_a: Uuid, doc_b: Uuid) -> Vec<CorpusEntry> {
        vec![
            CorpusEntry::new(doc_a, 1, "Neural networks learn representations", 0.7),
            CorpusEntry::new(doc_b, 4, "Statistical methods for data analysis", 0.8),
            CorpusEntry::new(doc_a, 9, "Gradient descent and neural optimisation", 0.95),
            CorpusEntry::new(doc_b, 2, "Unrelated appendix", 0.8),
        ]
    }

    #[test]
    fn blank_query_returns_nothing() {
        let c = corpus(Uuid::new_v4(), Uuid::new_v4());
        assert!(rank(&c, &SearchQuery::new(""), 10).is_empty());
        assert!(rank(&c, &SearchQuery::new("   \t "), 10).is_empty());
    }

    #[test]
    fn term_hits_boost_and_cap_at_one() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let c = corpus(a, b);
        let results = rank(&c, &SearchQuery::new("NEURAL networks"), 10);

        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.relevance_score <= MAX_SCORE));
        // 0.95 + 0.1 caps at 1.0; 0.7 + 0.2 = 0.9.
        assert_eq!(results[0].page_number, 9);
        assert_eq!(results[0].relevance_score, 1.0);
        assert_eq!(results[1].page_number, 1);
        assert_eq!(results[1].relevance_score, 0.9);
    }

    #[test]
    fn ties_keep_corpus_order() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let c = corpus(a, b);
        // Neither 0.8 entry matches, so they tie and keep corpus order.
        let results = rank(&c, &SearchQuery::new("zzz"), 10);
        let pages: Vec<u32> = results.iter().map(|r| r.page_number).collect();
        assert_eq!(pages, vec![9, 4, 2, 1]);
    }

    #[test]
    fn boosted_score_ties_with_equal_base() {
        let a = Uuid::new_v4();
        let c = vec![
            CorpusEntry::new(a, 1, "plain", 0.8),
            CorpusEntry::new(a, 2, "match here", 0.7),
        ];
        let results = rank(&c, &SearchQuery::new("match"), 10);
        assert_eq!(results[0].relevance_score, results[1].relevance_score);
        assert_eq!(results[0].page_number, 1);
    }

    #[test]
    fn document_filter_and_limit_apply() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let c = corpus(a, b);
        let results = rank(&c, &SearchQuery::new("data").within(vec![b]), 10);
        assert!(results.iter().all(|r| r.document_id == b));
        assert_eq!(results.len(), 2);

        let results = rank(&c, &SearchQuery::new("data").limit(1), 10);
        assert_eq!(results.len(), 1);

        let results = rank(&c, &SearchQuery::new("data"), 3);
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn duplicate_terms_count_twice() {
        let a = Uuid::new_v4();
        let c = vec![CorpusEntry::new(a, 1, "data", 0.5)];
        let results = rank(&c, &SearchQuery::new("data data"), 10);
        assert_eq!(results[0].relevance_score, 0.7);
    }

    #[test]
    fn excerpt_cuts_on_char_boundaries() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("héllo wörld", 5), "héllo...");
    }
}
