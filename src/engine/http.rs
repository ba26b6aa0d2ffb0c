//! Elasticsearch REST transport.
//!
//! Thin request/response marshaling over reqwest: connection, basic auth,
//! and the six protocol calls the crate uses. No retries here; the
//! configured client timeout is the only failure policy at this layer.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{BulkAction, Engine, EngineError, RawHit};
use crate::config::EngineConfig;

pub struct HttpEngine {
    client: Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
}

impl HttpEngine {
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("psearch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.username {
            Some(user) => req.basic_auth(user, self.password.as_deref()),
            None => req,
        }
    }
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    errors: bool,
    items: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    hits: Vec<RawHitBody>,
}

#[derive(Debug, Deserialize)]
struct RawHitBody {
    #[serde(rename = "_score")]
    score: Option<f64>,
    #[serde(rename = "_source")]
    source: Value,
}

impl Engine for HttpEngine {
    async fn index_exists(&self, index: &str) -> Result<bool, EngineError> {
        let resp = self.authed(self.client.head(self.url(index))).send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(false),
            s if s.is_success() => Ok(true),
            _ => {
                resp.error_for_status()?;
                Ok(false)
            }
        }
    }

    async fn create_index(&self, index: &str) -> Result<(), EngineError> {
        self.authed(self.client.put(self.url(index)))
            .send()
            .await?
            .error_for_status()?;
        debug!(index, "create index request accepted");
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), EngineError> {
        self.authed(self.client.delete(self.url(index)))
            .send()
            .await?
            .error_for_status()?;
        debug!(index, "delete index request accepted");
        Ok(())
    }

    async fn bulk(&self, index: &str, actions: &[BulkAction]) -> Result<usize, EngineError> {
        let mut body = String::new();
        for action in actions {
            body.push_str(&serde_json::json!({"index": {"_id": action.id}}).to_string());
            body.push('\n');
            body.push_str(&action.source.to_string());
            body.push('\n');
        }

        let resp = self
            .authed(self.client.post(self.url(&format!("{index}/_bulk"))))
            .header("Content-Type", "application/x-ndjson")
            .body(body)
            .send()
            .await?
            .error_for_status()?;

        let parsed: BulkResponse = resp.json().await?;
        if !parsed.errors {
            return Ok(parsed.items.len());
        }
        // Mixed outcome: count only the items the engine acknowledged.
        let ok = parsed
            .items
            .iter()
            .filter_map(|item| item.as_object()?.values().next())
            .filter(|action| {
                action
                    .get("status")
                    .and_then(Value::as_u64)
                    .is_some_and(|s| s < 300)
            })
            .count();
        debug!(index, sent = actions.len(), ok, "bulk flush had item errors");
        Ok(ok)
    }

    async fn count(&self, index: &str) -> Result<u64, EngineError> {
        let resp = self
            .authed(self.client.get(self.url(&format!("{index}/_count"))))
            .send()
            .await?
            .error_for_status()?;
        let parsed: CountResponse = resp.json().await?;
        Ok(parsed.count)
    }

    async fn search(&self, index: &str, body: &Value) -> Result<Vec<RawHit>, EngineError> {
        let resp = self
            .authed(self.client.post(self.url(&format!("{index}/_search"))))
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        let parsed: SearchResponse = resp.json().await?;
        Ok(parsed
            .hits
            .hits
            .into_iter()
            .map(|h| RawHit {
                score: h.score.unwrap_or_default(),
                source: h.source,
            })
            .collect())
    }
}
