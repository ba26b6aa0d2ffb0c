//! Product record and search result structs.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One indexed product record. `sku` doubles as the engine document id,
/// so re-indexing the same sku overwrites instead of duplicating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub sku: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub special_price: Option<f64>,
    #[serde(default)]
    pub country_of_manufacture: String,
    #[serde(default)]
    pub categories: Categories,
}

impl Product {
    /// A document without a sku is rejected before it reaches the engine.
    pub fn has_valid_sku(&self) -> bool {
        !self.sku.trim().is_empty()
    }
}

/// Category taxonomy field. Source data stores this either as one free-text
/// string or as a list of category names; both shapes are accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Categories {
    One(String),
    Many(Vec<String>),
}

impl Default for Categories {
    fn default() -> Self {
        Categories::One(String::new())
    }
}

impl std::fmt::Display for Categories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Categories::One(s) => f.write_str(s),
            Categories::Many(v) => f.write_str(&v.join(", ")),
        }
    }
}

/// A search hit: the projected product fields plus the engine-assigned
/// relevance score for this query. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub short_description: String,
    pub price: f64,
    pub special_price: Option<f64>,
    pub country_of_manufacture: String,
    pub categories: Categories,
    pub score: f64,
}

/// Outcome of one bulk-ingestion run. Callers that need strict guarantees
/// compare `successful` against `total` and inspect `failed_batches`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Documents offered to the pipeline, including rejected ones.
    pub total: usize,
    /// Items the engine acknowledged across all flushed batches.
    pub successful: usize,
    /// Documents rejected up front (missing sku), never sent.
    pub malformed: usize,
    /// Batches whose flush failed in transport and were skipped.
    pub failed_batches: usize,
}

impl IngestReport {
    pub fn is_complete(&self) -> bool {
        self.successful == self.total
    }
}

/// Accepts a JSON number or a numeric string. Product exports are sloppy
/// about which one a price column ends up as.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    coerce_f64(Value::deserialize(deserializer)?)
        .ok_or_else(|| de::Error::custom("expected a number"))
}

fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        other => Ok(coerce_f64(other)),
    }
}

/// Numeric coercion shared by deserialization and hit projection.
pub(crate) fn coerce_f64(value: Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
