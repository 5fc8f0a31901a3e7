//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the registry of open reader
//! sessions.

use crate::adapters::{
    seed::seed_demo_library, InMemoryAnnotationStore, InMemoryDocumentStore,
    InMemorySearchIndex, InMemorySummaryStore, MockOcrEngine, SimulatedLatency,
    TemplateSummarizer,
};
use crate::config::Config;
use pdf_reader_core::library::Library;
use pdf_reader_core::ports::{
    AnnotationRepository, DocumentRepository, PortError, PortResult, SearchService,
    SummaryRepository,
};
use pdf_reader_core::session::ReaderSession;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub documents: Arc<dyn DocumentRepository>,
    pub annotations: Arc<dyn AnnotationRepository>,
    pub summaries: Arc<dyn SummaryRepository>,
    pub search: Arc<dyn SearchService>,
    pub library: Library,
    pub sessions: SessionRegistry,
}

impl AppState {
    /// Wires every port to its in-memory adapter and seeds demo data if configured.
    pub async fn in_memory(config: Config) -> PortResult<Self> {
        let latency = Arc::new(SimulatedLatency::new(config.latency_scale, config.rng_seed));

        let documents = Arc::new(InMemoryDocumentStore::new(latency.clone()));
        let annotations = Arc::new(InMemoryAnnotationStore::new(latency.clone()));
        let summarizer = Arc::new(TemplateSummarizer::new(config.rng_seed, latency.clone()));
        let summaries = Arc::new(InMemorySummaryStore::new(summarizer, latency.clone()));
        let search = Arc::new(
            InMemorySearchIndex::new(config.search_limit, latency.clone())
                .with_seed(config.rng_seed),
        );
        let ocr = Arc::new(MockOcrEngine::new(latency));

        if config.seed_demo_data {
            seed_demo_library(
                documents.as_ref(),
                annotations.as_ref(),
                summaries.as_ref(),
                search.as_ref(),
            )
            .await?;
        }

        let library = Library::new(
            documents.clone(),
            annotations.clone(),
            summaries.clone(),
            search.clone(),
            ocr,
        )
        .with_delete_policy(config.delete_policy);
        info!(policy = ?config.delete_policy, "Stores ready");

        let sessions = SessionRegistry::new(config.session_idle_ttl, config.max_sessions);

        Ok(Self {
            config: Arc::new(config),
            documents,
            annotations,
            summaries,
            search,
            library,
            sessions,
        })
    }

    pub fn new_reader_session(&self) -> ReaderSession {
        ReaderSession::new(self.library.clone(), self.config.zoom)
    }
}

//=========================================================================================
// SessionRegistry (One Entry Per Open Reader)
//=========================================================================================

pub type SharedSession = Arc<Mutex<ReaderSession>>;

struct Entry {
    session: SharedSession,
    last_used: Instant,
    /// Registry clock value at the last touch; orders entries for LRU eviction.
    tick: u64,
}

#[derive(Default)]
struct Registry {
    entries: HashMap<Uuid, Entry>,
    clock: u64,
}

impl Registry {
    fn touch(&mut self, id: Uuid) -> Option<SharedSession> {
        self.clock += 1;
        let tick = self.clock;
        let entry = self.entries.get_mut(&id)?;
        entry.last_used = Instant::now();
        entry.tick = tick;
        Some(entry.session.clone())
    }
}

/// Open reader sessions. Idle ones expire and the count is capped; both are
/// enforced when a new session opens.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<RwLock<Registry>>,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl SessionRegistry {
    pub fn new(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Registry::default())),
            idle_ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    pub async fn open(&self, session: ReaderSession) -> (Uuid, SharedSession) {
        let mut inner = self.inner.write().await;

        let idle_ttl = self.idle_ttl;
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| entry.last_used.elapsed() < idle_ttl);
        let expired = before - inner.entries.len();
        if expired > 0 {
            debug!(expired, "Idle reader sessions dropped");
        }

        while inner.entries.len() >= self.max_sessions {
            let oldest = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.tick)
                .map(|(id, _)| *id);
            match oldest {
                Some(id) => {
                    inner.entries.remove(&id);
                    debug!(session_id = %id, "Least recently used reader session evicted");
                }
                None => break,
            }
        }

        let id = Uuid::new_v4();
        let shared = Arc::new(Mutex::new(session));
        inner.clock += 1;
        let entry = Entry {
            session: shared.clone(),
            last_used: Instant::now(),
            tick: inner.clock,
        };
        inner.entries.insert(id, entry);
        info!(session_id = %id, open = inner.entries.len(), "Reader session opened");
        (id, shared)
    }

    pub async fn get(&self, id: Uuid) -> PortResult<SharedSession> {
        self.inner
            .write()
            .await
            .touch(id)
            .ok_or_else(|| PortError::NotFound(format!("Session {} not found", id)))
    }

    /// Removes a session and resets its view-state.
    pub async fn close(&self, id: Uuid) -> PortResult<()> {
        let entry = self
            .inner
            .write()
            .await
            .entries
            .remove(&id)
            .ok_or_else(|| PortError::NotFound(format!("Session {} not found", id)))?;
        entry.session.lock().await.reset();
        info!(session_id = %id, "Reader session closed");
        Ok(())
    }

    pub async fn open_count(&self) -> usize {
        self.inner.read().await.entries.len()
    }
}
