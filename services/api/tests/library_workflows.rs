mod helpers;

use async_trait::async_trait;
use helpers::{make_stores, Stores};
use pdf_reader_core::domain::{
    AnnotationKind, Color, Document, DocumentDraft, NewAnnotation, NewSummary, Rect, SearchQuery,
};
use pdf_reader_core::library::{DeletePolicy, Library};
use pdf_reader_core::ports::{
    AnnotationRepository, DocumentRepository, PortError, PortResult, SearchService,
    SummaryRepository, TextExtractionService,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts extractions and yields once so concurrent runs interleave.
#[derive(Default)]
struct CountingOcr {
    runs: AtomicUsize,
}

#[async_trait]
impl TextExtractionService for CountingOcr {
    async fn extract_text(&self, document: &Document) -> PortResult<Vec<String>> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok((1..=document.page_count)
            .map(|p| format!("quantum entanglement on page {}", p))
            .collect())
    }
}

struct BrokenOcr;

#[async_trait]
impl TextExtractionService for BrokenOcr {
    async fn extract_text(&self, _document: &Document) -> PortResult<Vec<String>> {
        Err(PortError::OperationFailed("scanner offline".to_string()))
    }
}

fn library(stores: &Stores, ocr: Arc<dyn TextExtractionService>, policy: DeletePolicy) -> Library {
    Library::new(
        stores.documents.clone(),
        stores.annotations.clone(),
        stores.summaries.clone(),
        stores.search.clone(),
        ocr,
    )
    .with_delete_policy(policy)
}

fn upload(page_count: u32) -> DocumentDraft {
    DocumentDraft::from_upload("Lecture Notes.pdf", 2048, page_count)
}

fn highlight(document_id: uuid::Uuid) -> NewAnnotation {
    NewAnnotation {
        document_id,
        kind: AnnotationKind::Highlight,
        page_number: 1,
        content: "important".to_string(),
        color: Some(Color::default()),
        coordinates: Rect::default(),
    }
}

async fn annotate(stores: &Stores, document_id: uuid::Uuid) {
    stores.annotations.create(highlight(document_id)).await.unwrap();
}

async fn summarise(stores: &Stores, document_id: uuid::Uuid) {
    stores
        .summaries
        .create(NewSummary {
            document_id,
            page_number: 1,
            summary_text: "A page about things.".to_string(),
            key_points: vec!["things".to_string()],
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn import_strips_the_pdf_extension() {
    let stores = make_stores();
    let lib = library(&stores, Arc::new(CountingOcr::default()), DeletePolicy::Cascade);
    let doc = lib.import(upload(3)).await.unwrap();
    assert_eq!(doc.title, "Lecture Notes");
    assert!(!doc.ocr_processed);
    assert!(doc.extracted_text.is_empty());
}

#[tokio::test]
async fn ocr_runs_exactly_once() {
    let stores = make_stores();
    let ocr = Arc::new(CountingOcr::default());
    let lib = library(&stores, ocr.clone(), DeletePolicy::Cascade);
    let doc = lib.import(upload(3)).await.unwrap();

    let (a, b) = tokio::join!(lib.process_ocr(doc.id), lib.process_ocr(doc.id));
    a.unwrap();
    b.unwrap();
    let again = lib.process_ocr(doc.id).await.unwrap();

    assert_eq!(ocr.runs.load(Ordering::SeqCst), 1);
    assert!(again.ocr_processed);
    assert_eq!(again.extracted_text.len(), 3);

    let hits = stores
        .search
        .search(&SearchQuery::new("entanglement"))
        .await
        .unwrap();
    assert_eq!(hits.len(), 3);
    assert!(hits.iter().all(|h| h.document_id == doc.id));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn ocr_runs_once_across_worker_threads() {
    let stores = make_stores();
    let ocr = Arc::new(CountingOcr::default());
    let lib = library(&stores, ocr.clone(), DeletePolicy::Cascade);
    let doc = lib.import(upload(2)).await.unwrap();
    let id = doc.id;

    let runs: Vec<_> = (0..16)
        .map(|_| {
            let lib = lib.clone();
            tokio::spawn(async move { lib.process_ocr(id).await })
        })
        .collect();
    for run in runs {
        run.await.unwrap().unwrap();
    }

    assert_eq!(ocr.runs.load(Ordering::SeqCst), 1);
    assert_eq!(stores.search.entry_count().await, 2);
    assert!(stores.documents.get(doc.id).await.unwrap().ocr_processed);
}

#[tokio::test]
async fn failed_ocr_leaves_the_document_unprocessed() {
    let stores = make_stores();
    let lib = library(&stores, Arc::new(BrokenOcr), DeletePolicy::Cascade);
    let doc = lib.import(upload(2)).await.unwrap();

    let err = lib.process_ocr(doc.id).await.unwrap_err();
    assert!(matches!(err, PortError::OperationFailed(_)));

    let stored = stores.documents.get(doc.id).await.unwrap();
    assert!(!stored.ocr_processed);
    assert!(stored.extracted_text.is_empty());
}

#[tokio::test]
async fn summaries_use_the_page_text_after_ocr() {
    let stores = make_stores();
    let lib = library(&stores, Arc::new(CountingOcr::default()), DeletePolicy::Cascade);
    let doc = lib.import(upload(2)).await.unwrap();
    lib.process_ocr(doc.id).await.unwrap();

    let summary = lib.generate_summary(doc.id, 2).await.unwrap();
    assert_eq!(summary.document_id, doc.id);
    assert_eq!(summary.page_number, 2);
    assert!(!summary.summary_text.is_empty());
    assert!((2..=4).contains(&summary.key_points.len()));

    let err = lib.generate_summary(uuid::Uuid::new_v4(), 1).await.unwrap_err();
    assert!(matches!(err, PortError::NotFound(_)));
}

#[tokio::test]
async fn cascade_removes_every_dependent() {
    let stores = make_stores();
    let lib = library(&stores, Arc::new(CountingOcr::default()), DeletePolicy::Cascade);
    let doc = lib.import(upload(2)).await.unwrap();
    lib.process_ocr(doc.id).await.unwrap();
    annotate(&stores, doc.id).await;
    summarise(&stores, doc.id).await;

    let report = lib.delete_document(doc.id).await.unwrap();
    assert_eq!(report.document.id, doc.id);
    assert_eq!(report.annotations_removed, 1);
    assert_eq!(report.summaries_removed, 1);
    assert_eq!(report.index_entries_removed, 2);

    assert!(stores.annotations.list_by_document(doc.id).await.unwrap().is_empty());
    assert!(stores.summaries.list_by_document(doc.id).await.unwrap().is_empty());
    assert_eq!(stores.search.entry_count().await, 0);
    assert!(matches!(
        stores.documents.get(doc.id).await,
        Err(PortError::NotFound(_))
    ));
}

#[tokio::test]
async fn reject_refuses_while_dependents_exist() {
    let stores = make_stores();
    let lib = library(&stores, Arc::new(CountingOcr::default()), DeletePolicy::Reject);
    let doc = lib.import(upload(2)).await.unwrap();
    annotate(&stores, doc.id).await;

    let err = lib.delete_document(doc.id).await.unwrap_err();
    assert!(matches!(err, PortError::Conflict(_)));
    assert!(stores.documents.get(doc.id).await.is_ok());

    let annotation_id = stores.annotations.list_by_document(doc.id).await.unwrap()[0].id;
    stores.annotations.delete(annotation_id).await.unwrap();
    let report = lib.delete_document(doc.id).await.unwrap();
    assert_eq!(report.annotations_removed, 0);
    assert!(stores.documents.get(doc.id).await.is_err());
}

#[tokio::test]
async fn orphan_leaves_dependents_in_place() {
    let stores = make_stores();
    let lib = library(&stores, Arc::new(CountingOcr::default()), DeletePolicy::Orphan);
    let doc = lib.import(upload(2)).await.unwrap();
    annotate(&stores, doc.id).await;
    summarise(&stores, doc.id).await;

    lib.delete_document(doc.id).await.unwrap();
    assert_eq!(stores.annotations.list_by_document(doc.id).await.unwrap().len(), 1);
    assert_eq!(stores.summaries.list_by_document(doc.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_an_unknown_document_is_not_found_under_every_policy() {
    for policy in [DeletePolicy::Orphan, DeletePolicy::Cascade, DeletePolicy::Reject] {
        let stores = make_stores();
        let lib = library(&stores, Arc::new(CountingOcr::default()), policy);
        let err = lib.delete_document(uuid::Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)), "{:?}", policy);
    }
}

#[tokio::test]
async fn annotating_a_missing_document_is_not_found_unless_orphan() {
    for policy in [DeletePolicy::Cascade, DeletePolicy::Reject] {
        let stores = make_stores();
        let lib = library(&stores, Arc::new(CountingOcr::default()), policy);
        let err = lib.annotate(highlight(uuid::Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)), "{:?}", policy);
        assert!(stores.annotations.list().await.unwrap().is_empty());
    }

    let stores = make_stores();
    let lib = library(&stores, Arc::new(CountingOcr::default()), DeletePolicy::Orphan);
    let ghost = uuid::Uuid::new_v4();
    assert_eq!(lib.annotate(highlight(ghost)).await.unwrap().document_id, ghost);
}

#[tokio::test]
async fn annotating_after_a_cascade_delete_leaves_nothing_behind() {
    let stores = make_stores();
    let lib = library(&stores, Arc::new(CountingOcr::default()), DeletePolicy::Cascade);
    let doc = lib.import(upload(2)).await.unwrap();
    lib.annotate(highlight(doc.id)).await.unwrap();

    lib.delete_document(doc.id).await.unwrap();
    let err = lib.annotate(highlight(doc.id)).await.unwrap_err();
    assert!(matches!(err, PortError::NotFound(_)));
    assert!(stores.annotations.list().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_annotate_and_delete_never_leave_a_dangling_annotation() {
    for policy in [DeletePolicy::Reject, DeletePolicy::Cascade] {
        let stores = make_stores();
        let lib = library(&stores, Arc::new(CountingOcr::default()), policy);

        for _ in 0..32 {
            let id = lib.import(upload(1)).await.unwrap().id;
            let annotating = {
                let lib = lib.clone();
                tokio::spawn(async move { lib.annotate(highlight(id)).await })
            };
            let deleting = {
                let lib = lib.clone();
                tokio::spawn(async move { lib.delete_document(id).await })
            };
            let _ = annotating.await.unwrap();
            let _ = deleting.await.unwrap();
        }

        for annotation in stores.annotations.list().await.unwrap() {
            assert!(
                stores.documents.get(annotation.document_id).await.is_ok(),
                "{:?}: annotation {} outlived its document",
                policy,
                annotation.id
            );
        }
    }
}
