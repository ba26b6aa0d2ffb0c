//! Best-effort query localization.
//!
//! Product data is indexed in English while users type Georgian (or the
//! other way around), so each incoming query gets exactly one translation
//! call before the search query is built. Translation is a collaborator,
//! not a feature: when it fails the search proceeds with the original
//! text rather than aborting. That fallback is policy, not an accident.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::engine::EngineError;

/// Short timeout: a slow translator should not stall the search.
const HTTP_TIMEOUT_SECS: u64 = 10;

/// Public endpoint behind the common translator libraries.
const TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// Opaque translation function: text + source language + target language
/// in, translated text out.
pub trait Translator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, EngineError>;
}

/// Translator backed by the public Google endpoint. No API key; quota and
/// network failures surface as `EngineError::Translation`.
pub struct GoogleTranslator {
    client: reqwest::Client,
}

impl GoogleTranslator {
    pub fn new() -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(concat!("psearch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, EngineError> {
        let url = format!(
            "{TRANSLATE_URL}?client=gtx&sl={source}&tl={target}&dt=t&q={}",
            urlencoding::encode(text)
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EngineError::Translation(e.to_string()))?
            .error_for_status()
            .map_err(|e| EngineError::Translation(e.to_string()))?;

        let body: Value = resp
            .json()
            .await
            .map_err(|e| EngineError::Translation(e.to_string()))?;

        parse_translation(&body)
            .ok_or_else(|| EngineError::Translation("unexpected response shape".into()))
    }
}

/// The endpoint answers with nested arrays; the first element holds one
/// `[translated, original, ...]` segment per sentence.
fn parse_translation(body: &Value) -> Option<String> {
    let segments = body.get(0)?.as_array()?;
    let translated: String = segments
        .iter()
        .filter_map(|seg| seg.get(0)?.as_str())
        .collect();
    if translated.is_empty() {
        None
    } else {
        Some(translated)
    }
}

/// Translate `query` from `source` to `target`, falling back to the
/// original text when translation fails.
pub async fn localize_query<T: Translator>(
    translator: &T,
    query: &str,
    source: &str,
    target: &str,
) -> String {
    match translator.translate(query, source, target).await {
        Ok(translated) => {
            debug!(source, target, "query translated: {query} -> {translated}");
            translated
        }
        Err(e) => {
            warn!("translation failed, searching with the original query: {e}");
            query.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FixedTranslator(Option<String>);

    impl Translator for FixedTranslator {
        async fn translate(
            &self,
            _text: &str,
            _source: &str,
            _target: &str,
        ) -> Result<String, EngineError> {
            self.0
                .clone()
                .ok_or_else(|| EngineError::Translation("quota exceeded".into()))
        }
    }

    #[tokio::test]
    async fn localize_uses_the_translation() {
        let t = FixedTranslator(Some("body wash gel".into()));
        let q = localize_query(&t, "ტანის გელი", "ka", "en").await;
        assert_eq!(q, "body wash gel");
    }

    #[tokio::test]
    async fn localize_falls_back_to_original_on_failure() {
        let t = FixedTranslator(None);
        let q = localize_query(&t, "ტანის გელი", "ka", "en").await;
        assert_eq!(q, "ტანის გელი");
    }

    #[test]
    fn parses_multi_segment_response() {
        let body = json!([
            [["body and ", "ტანის და ", null], ["face wash gel", "სახის გელი", null]],
            null,
            "ka"
        ]);
        assert_eq!(
            parse_translation(&body).as_deref(),
            Some("body and face wash gel")
        );
    }

    #[test]
    fn rejects_unexpected_shape() {
        assert_eq!(parse_translation(&json!({"error": 403})), None);
        assert_eq!(parse_translation(&json!([[]])), None);
    }
}
