use std::{sync::Arc, time::Duration};

use anyhow::Context;
use tokio::sync::{Mutex, mpsc::Sender};

use crate::{ArcPath, ArcStr, fs::Fs, log::Log};

mod core;
mod data;
mod message;
mod mock;
#[cfg(test)]
mod tests;

pub use data::{Entry, Metadata};
use message::Message;
pub use mock::MockData;

/// Key/value blob store with a time-to-live, used as the feed cache backend.
///
/// Every written entry expires `ttl` after it was written. Expired entries
/// read as absent; write and remove failures are reported as `false`.
///
/// # Examples
/// ```ignore
/// let store = Store::spawn(fs, log, cache_dir, Duration::from_secs(3600)).await?;
/// store.set("feed:blog".into(), blob).await;
/// let blob = store.get("feed:blog".into()).await;
/// ```
#[derive(Debug, Clone)]
pub enum Store {
    /// One TOML file per key in a cache directory
    Actual(Sender<Message>),
    /// In-memory entries for testing
    Mock(Arc<Mutex<MockData>>),
}

impl Store {
    /// Spawns a file-backed store rooted at `dir`, creating the directory.
    pub async fn spawn(fs: Fs, log: Log, dir: ArcPath, ttl: Duration) -> anyhow::Result<Self> {
        let (store, _) = core::Core::build(fs, log, dir, ttl).await?.spawn();
        Ok(store)
    }

    pub fn mock(data: MockData) -> Self {
        Self::Mock(Arc::new(Mutex::new(data)))
    }

    /// The blob stored under `key`, or `None` when absent or expired.
    pub async fn get(&self, key: ArcStr) -> Option<ArcStr> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::Get { key, tx })
                    .await
                    .context("Sending message to Store actor")
                    .expect("Store actor died");
                rx.await
                    .context("Awaiting response from Store actor")
                    .expect("Store actor died")
            }
            Self::Mock(data) => data.lock().await.get(&key),
        }
    }

    /// Stores `blob` under `key`, replacing any previous entry and restarting
    /// its TTL.
    pub async fn set(&self, key: ArcStr, blob: ArcStr) -> bool {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::Set { key, blob, tx })
                    .await
                    .context("Sending message to Store actor")
                    .expect("Store actor died");
                rx.await
                    .context("Awaiting response from Store actor")
                    .expect("Store actor died")
            }
            Self::Mock(data) => data.lock().await.set(key, blob),
        }
    }

    /// Deletes the entry under `key`. Removing an absent key succeeds.
    pub async fn remove(&self, key: ArcStr) -> bool {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::Remove { key, tx })
                    .await
                    .context("Sending message to Store actor")
                    .expect("Store actor died");
                rx.await
                    .context("Awaiting response from Store actor")
                    .expect("Store actor died")
            }
            Self::Mock(data) => data.lock().await.remove(&key),
        }
    }

    /// Creation and expiry time of a live entry.
    pub async fn metadata(&self, key: ArcStr) -> Option<Metadata> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::Metadata { key, tx })
                    .await
                    .context("Sending message to Store actor")
                    .expect("Store actor died");
                rx.await
                    .context("Awaiting response from Store actor")
                    .expect("Store actor died")
            }
            Self::Mock(data) => data.lock().await.metadata(&key),
        }
    }

    /// Deletes every expired entry and returns how many were deleted.
    pub async fn clear_expired(&self) -> usize {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::ClearExpired { tx })
                    .await
                    .context("Sending message to Store actor")
                    .expect("Store actor died");
                rx.await
                    .context("Awaiting response from Store actor")
                    .expect("Store actor died")
            }
            Self::Mock(data) => data.lock().await.clear_expired(),
        }
    }
}
