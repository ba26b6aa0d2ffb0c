//! Index lifecycle and the caller-facing handle.
//!
//! `SearchIndex` wraps an [`Engine`] with the name of the target index and
//! exposes the operations the CLI consumes: lifecycle, count, ingestion
//! (see `ingest`) and search. It holds no local state beyond the name —
//! the engine owns all persisted documents, and every search re-queries it.

pub mod ingest;

use tracing::info;

use crate::engine::{Engine, EngineError};
use crate::model::SearchHit;

pub struct SearchIndex<E: Engine> {
    engine: E,
    index: String,
}

impl<E: Engine> SearchIndex<E> {
    pub fn new(engine: E, index: impl Into<String>) -> Self {
        Self {
            engine,
            index: index.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.index
    }

    pub async fn exists(&self) -> Result<bool, EngineError> {
        self.engine.index_exists(&self.index).await
    }

    /// Create the index if absent. Returns `true` when a create request was
    /// issued; creating an existing index is a no-op.
    pub async fn create(&self) -> Result<bool, EngineError> {
        if self.exists().await? {
            info!(index = %self.index, "index already exists");
            return Ok(false);
        }
        self.engine.create_index(&self.index).await?;
        info!(index = %self.index, "index created");
        Ok(true)
    }

    /// Delete the index if present. Returns `true` when a delete request
    /// was issued. Irreversible.
    pub async fn delete(&self) -> Result<bool, EngineError> {
        if !self.exists().await? {
            info!(index = %self.index, "index does not exist");
            return Ok(false);
        }
        self.engine.delete_index(&self.index).await?;
        info!(index = %self.index, "index deleted");
        Ok(true)
    }

    /// Authoritative document count from the engine. Strict: failures
    /// propagate; the display layer decides whether to show a sentinel.
    pub async fn count(&self) -> Result<u64, EngineError> {
        self.engine.count(&self.index).await
    }

    /// Run a free-text query and project the hit page. Ordering is the
    /// engine's descending-score order; no re-ranking happens here.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, EngineError> {
        let body = crate::search::build_query(query);
        let hits = self.engine.search(&self.index, &body).await?;
        Ok(crate::search::project_hits(hits))
    }
}
