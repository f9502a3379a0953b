//! Normalized feeds cached per provider.

use chrono::{DateTime, Utc};

use crate::{
    log::Log,
    provider::{Post, ProviderId},
    store::Store,
};

const SCOPE: &str = "cache";

/// Serializes a provider's normalized posts into a [`Store`].
///
/// One entry per provider, always holding that provider's complete post
/// sequence. Anything that cannot be read back is a miss, never an error.
#[derive(Debug, Clone)]
pub struct FeedCache {
    store: Store,
    log: Log,
}

impl FeedCache {
    pub fn new(store: Store, log: Log) -> Self {
        Self { store, log }
    }

    /// Cached posts of `id`, `None` on a miss. A cached empty feed is a hit.
    pub async fn get(&self, id: &ProviderId) -> Option<Vec<Post>> {
        let blob = self.store.get(id.as_arc_str()).await?;

        let posts: Vec<Post> = match serde_json::from_str(&blob) {
            Ok(posts) => posts,
            Err(err) => {
                self.log
                    .warn(SCOPE, format!("Discarding unreadable cache entry for {id}: {err}"));
                return None;
            }
        };

        if !single_kind(&posts) {
            self.log.warn(
                SCOPE,
                format!("Discarding cache entry for {id}: it mixes providers"),
            );
            return None;
        }
        Some(posts)
    }

    /// Replaces the cached posts of `id`. Returns whether they were stored.
    pub async fn set(&self, id: &ProviderId, posts: &[Post]) -> bool {
        if !single_kind(posts) {
            self.log.error(
                SCOPE,
                format!("Refusing to cache posts of several providers under {id}"),
            );
            return false;
        }

        let blob = match serde_json::to_string(posts) {
            Ok(blob) => blob,
            Err(err) => {
                self.log
                    .error(SCOPE, format!("Failed to serialize feed {id}: {err}"));
                return false;
            }
        };

        let stored = self.store.set(id.as_arc_str(), blob.into()).await;
        if !stored {
            self.log.warn(SCOPE, format!("Feed {id} was not cached"));
        }
        stored
    }

    /// Drops the cached posts of `id`. Succeeds when nothing was cached.
    pub async fn remove(&self, id: &ProviderId) -> bool {
        self.store.remove(id.as_arc_str()).await
    }

    /// When the cached posts of `id` expire, `None` if nothing live is cached.
    pub async fn expiry_of(&self, id: &ProviderId) -> Option<DateTime<Utc>> {
        self.store
            .metadata(id.as_arc_str())
            .await
            .map(|metadata| metadata.expire)
    }

    /// Drops every expired entry in the backing store.
    pub async fn sweep(&self) -> usize {
        self.store.clear_expired().await
    }
}

fn single_kind(posts: &[Post]) -> bool {
    posts.windows(2).all(|pair| pair[0].kind == pair[1].kind)
}
