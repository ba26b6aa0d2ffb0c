//! Engine protocol seam.
//!
//! `Engine` abstracts the handful of document-store operations the rest of
//! the crate needs, so the pipeline and search layers can be exercised
//! against a mock without a live cluster. `HttpEngine` is the real
//! implementation speaking the Elasticsearch REST protocol.

pub mod http;

#[cfg(test)]
pub mod mock;

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

pub use http::HttpEngine;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("engine unreachable: {0}")]
    Unavailable(#[from] reqwest::Error),

    #[error("index '{index}' does not exist")]
    IndexNotFound { index: String },

    #[error("malformed document: {reason}")]
    MalformedDocument { reason: String },

    #[error("translation failed: {0}")]
    Translation(String),

    #[error("reading document source {path}: {message}")]
    SourceRead { path: PathBuf, message: String },

    #[error("unexpected engine response: {0}")]
    BadResponse(String),
}

/// One index/upsert instruction inside a batched write request.
#[derive(Debug, Clone)]
pub struct BulkAction {
    /// Engine document id (the product sku).
    pub id: String,
    /// Document body as stored.
    pub source: Value,
}

/// A raw hit as returned by the engine, before projection.
#[derive(Debug, Clone)]
pub struct RawHit {
    pub score: f64,
    pub source: Value,
}

/// The document-store operations this crate consumes.
///
/// All calls are sequential and blocking from the caller's point of view;
/// retries and timeouts are the transport's concern, not the trait's.
pub trait Engine {
    /// True when the named index exists. A clean "does not exist" response
    /// is `Ok(false)`, never an error.
    async fn index_exists(&self, index: &str) -> Result<bool, EngineError>;

    /// Create the index with engine-default settings (no explicit mapping;
    /// field types are inferred from first-seen documents).
    async fn create_index(&self, index: &str) -> Result<(), EngineError>;

    /// Drop the index. Irreversible.
    async fn delete_index(&self, index: &str) -> Result<(), EngineError>;

    /// Submit one batch of write actions; returns how many items the
    /// engine acknowledged (item-level failures reduce the count).
    async fn bulk(&self, index: &str, actions: &[BulkAction]) -> Result<usize, EngineError>;

    /// Authoritative document count for the index.
    async fn count(&self, index: &str) -> Result<u64, EngineError>;

    /// Execute a structured query body and return the raw hit page.
    async fn search(&self, index: &str, body: &Value) -> Result<Vec<RawHit>, EngineError>;
}
