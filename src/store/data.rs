use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::ArcStr;

/// Creation and expiry time of a stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    pub created: DateTime<Utc>,
    pub expire: DateTime<Utc>,
}

/// One stored blob. Overwritten wholesale on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub key: ArcStr,
    pub created: DateTime<Utc>,
    pub expire: DateTime<Utc>,
    pub payload: ArcStr,
}

impl Entry {
    /// Stamps `payload` as created now and expiring after `ttl`.
    pub fn new(key: ArcStr, payload: ArcStr, ttl: TimeDelta) -> Self {
        let created = Utc::now();
        Self {
            key,
            created,
            expire: created.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
            payload,
        }
    }

    /// An entry is stale from its expiry instant on, so a zero TTL is never
    /// served.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expire
    }

    pub fn metadata(&self) -> Metadata {
        Metadata {
            created: self.created,
            expire: self.expire,
        }
    }
}
