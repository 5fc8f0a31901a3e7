//! services/api/src/adapters/memory/annotations.rs
//!
//! The in-memory annotation store. Implements the `AnnotationRepository` port.

use async_trait::async_trait;
use chrono::Utc;
use pdf_reader_core::domain::{
    Annotation, AnnotationExport, AnnotationKind, AnnotationPatch, Color, NewAnnotation,
};
use pdf_reader_core::ports::{AnnotationRepository, PortError, PortResult};
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
    annotations: VecDeque<Annotation>,
    ids: IdAllocator,
}

pub struct InMemoryAnnotationStore {
    inner: RwLock<Inner>,
    latency: Arc<SimulatedLatency>,
}

impl InMemoryAnnotationStore {
    pub fn new(latency: Arc<SimulatedLatency>) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            latency,
        }
    }
}

fn by_document(annotations: &VecDeque<Annotation>, document_id: Uuid) -> Vec<Annotation> {
    annotations
        .iter()
        .filter(|a| a.document_id == document_id)
        .cloned()
        .collect()
}

fn check_color(kind: AnnotationKind, color: Option<&Color>) -> PortResult<()> {
    if kind.requires_color() && color.is_none() {
        return Err(PortError::InvalidInput(format!(
            "A {:?} annotation needs a colour",
            kind
        )));
    }
    Ok(())
}

#[async_trait]
impl AnnotationRepository for InMemoryAnnotationStore {
    async fn list(&self) -> PortResult<Vec<Annotation>> {
        self.latency.wait(Operation::List).await;
        Ok(self.inner.read().await.annotations.iter().cloned().collect())
    }

    async fn get(&self, id: Uuid) -> PortResult<Annotation> {
        self.latency.wait(Operation::Get).await;
        self.inner
            .read()
            .await
            .annotations
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| PortError::annotation_not_found(id))
    }

    async fn create(&self, new: NewAnnotation) -> PortResult<Annotation> {
        self.latency.wait(Operation::Create).await;
        if new.page_number == 0 {
            return Err(PortError::InvalidInput("Page numbers start at 1".to_string()));
        }
        check_color(new.kind, new.color.as_ref())?;

        let mut inner = self.inner.write().await;
        let annotation = Annotation {
            id: inner.ids.next(),
            document_id: new.document_id,
            kind: new.kind,
            page_number: new.page_number,
            content: new.content,
            color: new.color,
            coordinates: new.coordinates,
            created_at: Utc::now(),
        };
        inner.annotations.push_front(annotation.clone());
        debug!(
            annotation_id = %annotation.id,
            document_id = %annotation.document_id,
            kind = ?annotation.kind,
            "Annotation stored"
        );
        Ok(annotation)
    }

    async fn update(&self, id: Uuid, patch: AnnotationPatch) -> PortResult<Annotation> {
        self.latency.wait(Operation::Update).await;
        if patch.page_number == Some(0) {
            return Err(PortError::InvalidInput("Page numbers start at 1".to_string()));
        }

        let mut inner = self.inner.write().await;
        let annotation = inner
            .annotations
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| PortError::annotation_not_found(id))?;

        // Validate the merged record before it replaces the stored one.
        let mut updated = annotation.clone();
        patch.apply_to(&mut updated);
        check_color(updated.kind, updated.color.as_ref())?;
        *annotation = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> PortResult<Annotation> {
        self.latency.wait(Operation::Delete).await;
        let mut inner = self.inner.write().await;
        let index = inner
            .annotations
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| PortError::annotation_not_found(id))?;
        inner
            .annotations
            .remove(index)
            .ok_or_else(|| PortError::annotation_not_found(id))
    }

    async fn list_by_document(&self, document_id: Uuid) -> PortResult<Vec<Annotation>> {
        self.latency.wait(Operation::List).await;
        Ok(by_document(&self.inner.read().await.annotations, document_id))
    }

    async fn export_for_document(&self, document_id: Uuid) -> PortResult<AnnotationExport> {
        self.latency.wait(Operation::Export).await;
        let annotations = by_document(&self.inner.read().await.annotations, document_id);
        Ok(AnnotationExport::new(document_id, &annotations))
    }

    async fn delete_by_document(&self, document_id: Uuid) -> PortResult<usize> {
        self.latency.wait(Operation::Delete).await;
        let mut inner = self.inner.write().await;
        let before = inner.annotations.len();
        inner.annotations.retain(|a| a.document_id != document_id);
        Ok(before - inner.annotations.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_reader_core::domain::{AnnotationKind, Color, Rect};

    fn store() -> InMemoryAnnotationStore {
        InMemoryAnnotationStore::new(Arc::new(SimulatedLatency::none()))
    }

    fn highlight(document_id: Uuid, page: u32, content: &str) -> NewAnnotation {
        NewAnnotation {
            document_id,
            kind: AnnotationKind::Highlight,
            page_number: page,
            content: content.to_string(),
            color: Some(Color::default()),
            coordinates: Rect::new(10.0, 20.0, 100.0, 12.0),
        }
    }

    #[tokio::test]
    async fn list_by_document_filters_and_keeps_newest_first() {
        let store = store();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let first = store.create(highlight(a, 1, "first")).await.unwrap();
        store.create(highlight(b, 1, "other doc")).await.unwrap();
        let second = store.create(highlight(a, 2, "second")).await.unwrap();
        let third = store.create(highlight(a, 3, "third")).await.unwrap();
        store.delete(second.id).await.unwrap();

        let ids: Vec<Uuid> = store
            .list_by_document(a)
            .await
            .unwrap()
            .into_iter()
            .map(|x| x.id)
            .collect();
        assert_eq!(ids, vec![third.id, first.id]);
        assert_eq!(store.list_by_document(b).await.unwrap().len(), 1);
        assert!(store.list_by_document(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_keeps_identity_fields() {
        let store = store();
        let doc = Uuid::new_v4();
        let created = store.create(highlight(doc, 1, "draft")).await.unwrap();

        let updated = store
            .update(
                created.id,
                AnnotationPatch {
                    content: Some("edited".into()),
                    page_number: Some(5),
                    ..AnnotationPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.document_id, doc);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.content, "edited");
        assert_eq!(updated.page_number, 5);
    }

    #[tokio::test]
    async fn export_counts_match_and_omit_geometry() {
        let store = store();
        let doc = Uuid::new_v4();
        store.create(highlight(doc, 1, "one")).await.unwrap();
        store.create(highlight(doc, 2, "two")).await.unwrap();
        store.create(highlight(Uuid::new_v4(), 1, "elsewhere")).await.unwrap();

        let export = store.export_for_document(doc).await.unwrap();
        assert_eq!(export.document_id, doc);
        assert_eq!(export.count, 2);
        assert_eq!(export.count, export.annotations.len());
        assert_eq!(export.annotations[0].content, "two");

        let json = serde_json::to_value(&export).unwrap();
        for item in json["annotations"].as_array().unwrap() {
            assert!(item.get("id").is_none());
            assert!(item.get("coordinates").is_none());
        }
    }

    #[tokio::test]
    async fn highlights_and_pen_strokes_need_a_colour() {
        let store = store();
        let doc = Uuid::new_v4();
        for kind in [AnnotationKind::Highlight, AnnotationKind::PenStroke] {
            let new = NewAnnotation {
                kind,
                color: None,
                ..highlight(doc, 1, "bare")
            };
            let err = store.create(new).await.unwrap_err();
            assert!(matches!(err, PortError::InvalidInput(_)), "{:?}", kind);
        }
        assert!(store.list().await.unwrap().is_empty());

        let note = NewAnnotation {
            kind: AnnotationKind::Note,
            color: None,
            ..highlight(doc, 1, "a note")
        };
        assert!(store.create(note).await.unwrap().color.is_none());
    }

    #[tokio::test]
    async fn turning_a_bare_note_into_a_highlight_is_rejected() {
        let store = store();
        let note = store
            .create(NewAnnotation {
                kind: AnnotationKind::Note,
                color: None,
                ..highlight(Uuid::new_v4(), 1, "remember")
            })
            .await
            .unwrap();

        let err = store
            .update(
                note.id,
                AnnotationPatch {
                    kind: Some(AnnotationKind::Highlight),
                    content: Some("changed".into()),
                    ..AnnotationPatch::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::InvalidInput(_)));
        assert_eq!(store.get(note.id).await.unwrap(), note);

        let coloured = store
            .update(
                note.id,
                AnnotationPatch {
                    kind: Some(AnnotationKind::Highlight),
                    color: Some(Color::default()),
                    ..AnnotationPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(coloured.kind, AnnotationKind::Highlight);
        assert!(coloured.color.is_some());
    }

    #[tokio::test]
    async fn missing_annotations_are_not_found() {
        let store = store();
        let ghost = Uuid::new_v4();
        assert!(matches!(store.get(ghost).await, Err(PortError::NotFound(_))));
        assert!(matches!(
            store.update(ghost, AnnotationPatch::default()).await,
            Err(PortError::NotFound(_))
        ));
        assert!(matches!(store.delete(ghost).await, Err(PortError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_by_document_only_removes_that_document() {
        let store = store();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        store.create(highlight(a, 1, "x")).await.unwrap();
        store.create(highlight(a, 2, "y")).await.unwrap();
        store.create(highlight(b, 1, "z")).await.unwrap();

        assert_eq!(store.delete_by_document(a).await.unwrap(), 2);
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert_eq!(store.delete_by_document(a).await.unwrap(), 0);
    }
}
