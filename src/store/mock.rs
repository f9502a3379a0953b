use std::collections::HashMap;

use chrono::{TimeDelta, Utc};

use super::data::{Entry, Metadata};
use crate::ArcStr;

/// In-memory state behind [`Store::Mock`](super::Store::Mock).
///
/// Fields are public so tests can seed entries directly, including expired
/// ones and payloads that do not deserialize.
#[derive(Debug, Clone)]
pub struct MockData {
    pub entries: HashMap<ArcStr, Entry>,
    pub ttl: TimeDelta,
    /// When false every write fails, simulating a broken backend
    pub writable: bool,
}

impl Default for MockData {
    fn default() -> Self {
        Self::new(TimeDelta::hours(1))
    }
}

impl MockData {
    pub fn new(ttl: TimeDelta) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            writable: true,
        }
    }

    /// Seeds an entry that expires after `ttl`; a negative `ttl` seeds one
    /// that is already stale.
    pub fn with_entry(mut self, key: &str, payload: &str, ttl: TimeDelta) -> Self {
        let entry = Entry::new(key.into(), payload.into(), ttl);
        self.entries.insert(key.into(), entry);
        self
    }

    fn live_entry(&mut self, key: &str) -> Option<&Entry> {
        if self.entries.get(key)?.is_expired(Utc::now()) {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key)
    }

    pub fn get(&mut self, key: &str) -> Option<ArcStr> {
        self.live_entry(key).map(|entry| entry.payload.clone())
    }

    pub fn set(&mut self, key: ArcStr, blob: ArcStr) -> bool {
        if !self.writable {
            return false;
        }
        let entry = Entry::new(key.clone(), blob, self.ttl);
        self.entries.insert(key, entry);
        true
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key);
        true
    }

    pub fn metadata(&mut self, key: &str) -> Option<Metadata> {
        self.live_entry(key).map(Entry::metadata)
    }

    pub fn clear_expired(&mut self) -> usize {
        let now = Utc::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before - self.entries.len()
    }
}
