//! services/api/src/adapters/memory/mod.rs
//!
//! Process-memory implementations of the store ports. They are constructed
//! once at start-up and shared through `AppState`; nothing survives a restart.

mod ids;

pub mod annotations;
pub mod documents;
pub mod summaries;

pub use annotations::InMemoryAnnotationStore;
pub use documents::InMemoryDocumentStore;
pub use summaries::InMemorySummaryStore;
