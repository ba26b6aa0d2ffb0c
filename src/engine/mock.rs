//! Scriptable in-memory engine for tests.

use std::collections::HashSet;
use std::sync::Mutex;

use serde_json::Value;

use super::{BulkAction, Engine, EngineError, RawHit};

#[derive(Default)]
struct State {
    exists: bool,
    create_calls: usize,
    delete_calls: usize,
    /// Sizes of every attempted flush, in order.
    flushes: Vec<usize>,
    /// Flush ordinals (0-based) that fail in transport.
    fail_flushes: HashSet<usize>,
    /// Items the engine silently drops from each acknowledged flush.
    per_item_shortfall: usize,
    /// `None` simulates a count-query failure.
    count: Option<u64>,
    hits: Vec<RawHit>,
    fail_search: bool,
    last_search_body: Option<Value>,
    stored_ids: Vec<String>,
}

#[derive(Default)]
pub struct MockEngine {
    state: Mutex<State>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(self) -> Self {
        self.state.lock().unwrap().exists = true;
        self
    }

    pub fn with_count(self, count: u64) -> Self {
        self.state.lock().unwrap().count = Some(count);
        self
    }

    pub fn with_hits(self, hits: Vec<RawHit>) -> Self {
        self.state.lock().unwrap().hits = hits;
        self
    }

    pub fn failing_search(self) -> Self {
        self.state.lock().unwrap().fail_search = true;
        self
    }

    /// Make the nth flush (0-based) fail in transport.
    pub fn failing_flush(self, ordinal: usize) -> Self {
        self.state.lock().unwrap().fail_flushes.insert(ordinal);
        self
    }

    /// Drop this many items from every acknowledged flush.
    pub fn with_item_shortfall(self, n: usize) -> Self {
        self.state.lock().unwrap().per_item_shortfall = n;
        self
    }

    pub fn create_calls(&self) -> usize {
        self.state.lock().unwrap().create_calls
    }

    pub fn delete_calls(&self) -> usize {
        self.state.lock().unwrap().delete_calls
    }

    pub fn flushes(&self) -> Vec<usize> {
        self.state.lock().unwrap().flushes.clone()
    }

    pub fn stored_ids(&self) -> Vec<String> {
        self.state.lock().unwrap().stored_ids.clone()
    }

    pub fn last_search_body(&self) -> Option<Value> {
        self.state.lock().unwrap().last_search_body.clone()
    }

    fn outage() -> EngineError {
        EngineError::BadResponse("simulated engine outage".into())
    }
}

impl Engine for MockEngine {
    async fn index_exists(&self, _index: &str) -> Result<bool, EngineError> {
        Ok(self.state.lock().unwrap().exists)
    }

    async fn create_index(&self, _index: &str) -> Result<(), EngineError> {
        let mut st = self.state.lock().unwrap();
        st.create_calls += 1;
        st.exists = true;
        Ok(())
    }

    async fn delete_index(&self, _index: &str) -> Result<(), EngineError> {
        let mut st = self.state.lock().unwrap();
        st.delete_calls += 1;
        st.exists = false;
        Ok(())
    }

    async fn bulk(&self, _index: &str, actions: &[BulkAction]) -> Result<usize, EngineError> {
        let mut st = self.state.lock().unwrap();
        let ordinal = st.flushes.len();
        st.flushes.push(actions.len());
        if st.fail_flushes.contains(&ordinal) {
            return Err(Self::outage());
        }
        st.stored_ids.extend(actions.iter().map(|a| a.id.clone()));
        Ok(actions.len().saturating_sub(st.per_item_shortfall))
    }

    async fn count(&self, _index: &str) -> Result<u64, EngineError> {
        self.state.lock().unwrap().count.ok_or_else(Self::outage)
    }

    async fn search(&self, _index: &str, body: &Value) -> Result<Vec<RawHit>, EngineError> {
        let mut st = self.state.lock().unwrap();
        st.last_search_body = Some(body.clone());
        if st.fail_search {
            return Err(Self::outage());
        }
        Ok(st.hits.clone())
    }
}
