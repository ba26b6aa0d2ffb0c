//! Engine connection settings.
//!
//! Credentials and endpoint come from the process environment (a `.env`
//! file is honored through dotenvy), but they land in an explicit struct
//! handed to the client constructor. A missing URL produces a client that
//! fails on its first call, not at startup.

use std::time::Duration;

/// Default endpoint when `ELASTICSEARCH_URL` is unset.
const DEFAULT_URL: &str = "http://localhost:9200";

/// Default index name, overridable via `PSEARCH_INDEX` or `--index`.
pub const DEFAULT_INDEX: &str = "psp_index";

/// Request timeout when `PSEARCH_TIMEOUT_SECS` is unset.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the search engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the engine, e.g. `https://es.example.com:9200`.
    pub base_url: String,
    /// Basic-auth username, if the engine requires one.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: Option<String>,
    /// Target index name.
    pub index: String,
    /// Per-request timeout applied to the HTTP client.
    pub timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            username: None,
            password: None,
            index: DEFAULT_INDEX.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl EngineConfig {
    /// Load settings from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(url) = dotenvy::var("ELASTICSEARCH_URL") {
            cfg.base_url = url;
        }
        if let Ok(user) = dotenvy::var("ELASTICSEARCH_USERNAME") {
            cfg.username = Some(user);
        }
        if let Ok(pass) = dotenvy::var("ELASTICSEARCH_PASSWORD") {
            cfg.password = Some(pass);
        }
        if let Ok(index) = dotenvy::var("PSEARCH_INDEX") {
            cfg.index = index;
        }
        if let Ok(val) = dotenvy::var("PSEARCH_TIMEOUT_SECS")
            && let Ok(secs) = val.parse::<u64>()
        {
            cfg.timeout = Duration::from_secs(secs);
        }

        cfg
    }
}
