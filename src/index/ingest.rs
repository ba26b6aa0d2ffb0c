//! Bulk ingestion pipeline.
//!
//! Documents are buffered in input order and flushed in batches of
//! [`BULK_BATCH_SIZE`]. The batch bound keeps request payloads and memory
//! flat when loading thousands of products, and keeps progress reports
//! close to what the engine has actually acknowledged.
//!
//! Flush failures are lenient: a batch that dies in transport is logged
//! and skipped, and ingestion moves on to the next batch. The returned
//! [`IngestReport`] carries enough detail for a caller to be strict about
//! it anyway.

use std::path::Path;

use indicatif::ProgressBar;
use tracing::{info, warn};

use super::SearchIndex;
use crate::engine::{BulkAction, Engine, EngineError};
use crate::model::{IngestReport, Product};

/// Documents per bulk-write request.
pub const BULK_BATCH_SIZE: usize = 100;

impl<E: Engine> SearchIndex<E> {
    /// Insert documents in input order, flushing every [`BULK_BATCH_SIZE`]
    /// and once more for the final partial batch. Documents without a sku
    /// never reach the engine; they are counted as malformed.
    pub async fn insert_documents(
        &self,
        documents: &[Product],
        progress: Option<&ProgressBar>,
    ) -> IngestReport {
        let mut report = IngestReport {
            total: documents.len(),
            ..Default::default()
        };
        let mut batch: Vec<BulkAction> = Vec::with_capacity(BULK_BATCH_SIZE);

        if let Some(pb) = progress {
            pb.set_length(report.total as u64);
        }

        for (i, document) in documents.iter().enumerate() {
            match to_action(document) {
                Ok(action) => batch.push(action),
                Err(e) => {
                    warn!(position = i, "rejecting document: {e}");
                    report.malformed += 1;
                }
            }

            let is_last = i + 1 == documents.len();
            if batch.len() == BULK_BATCH_SIZE || (is_last && !batch.is_empty()) {
                match self.engine.bulk(self.name(), &batch).await {
                    Ok(acknowledged) => report.successful += acknowledged,
                    Err(e) => {
                        warn!(batch_size = batch.len(), "bulk flush failed, continuing: {e}");
                        report.failed_batches += 1;
                    }
                }
                batch.clear();
                if let Some(pb) = progress {
                    pb.set_position(report.successful as u64);
                }
                info!(
                    successful = report.successful,
                    total = report.total,
                    "{}/{} documents inserted",
                    report.successful,
                    report.total
                );
            }
        }

        info!(
            successful = report.successful,
            total = report.total,
            malformed = report.malformed,
            failed_batches = report.failed_batches,
            "ingestion finished"
        );
        report
    }

    /// Load a JSON array of products from `path` and insert them.
    ///
    /// Guard: the index must already exist — ingestion never creates it.
    pub async fn add_documents_from(
        &self,
        path: &Path,
        progress: Option<&ProgressBar>,
    ) -> Result<IngestReport, EngineError> {
        if !self.exists().await? {
            return Err(EngineError::IndexNotFound {
                index: self.name().to_string(),
            });
        }

        let documents = load_products(path)?;
        Ok(self.insert_documents(&documents, progress).await)
    }
}

fn to_action(document: &Product) -> Result<BulkAction, EngineError> {
    if !document.has_valid_sku() {
        return Err(EngineError::MalformedDocument {
            reason: "missing sku".into(),
        });
    }
    let source = serde_json::to_value(document).map_err(|e| EngineError::MalformedDocument {
        reason: e.to_string(),
    })?;
    Ok(BulkAction {
        id: document.sku.clone(),
        source,
    })
}

/// Whole-file read; bulk sources are expected to fit in memory.
fn load_products(path: &Path) -> Result<Vec<Product>, EngineError> {
    let raw = std::fs::read_to_string(path).map_err(|e| EngineError::SourceRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|e| EngineError::SourceRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
