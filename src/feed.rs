//! Cache-first feed retrieval.
//!
//! A [`Feed`] ties one provider's fetcher and extractor to the [`FeedCache`].
//! On a cache hit the provider is not contacted; on a miss the raw feed is
//! fetched, optionally post-processed, normalized, cached and returned.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::{
    cache::FeedCache,
    log::Log,
    provider::{FeedFetcher, FetchError, Post, PostExtractor, ProviderId, normalize},
};


const SCOPE: &str = "feed";

/// How long before expiry a refresh should be scheduled by default
pub const REFRESH_LEAD: Duration = Duration::from_secs(5 * 60);

/// Runs on the freshly fetched raw posts before they are normalized. May
/// reorder, drop or edit them.
pub type PostProcess<R> = Box<dyn Fn(&ProviderId, &mut Vec<R>) + Send + Sync>;

/// Receives a [`RefreshNotice`] every time a feed is written to the cache.
pub type RefreshHook = Box<dyn Fn(RefreshNotice) + Send + Sync>;

/// Tells a scheduler that `provider` was just cached and when that entry
/// stops being served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshNotice {
    pub provider: ProviderId,
    pub expires_at: DateTime<Utc>,
}

impl RefreshNotice {
    /// When to refetch so the cache never runs cold: `lead` before expiry.
    pub fn refresh_at(&self, lead: Duration) -> DateTime<Utc> {
        let lead = TimeDelta::from_std(lead).unwrap_or(TimeDelta::MAX);
        self.expires_at
            .checked_sub_signed(lead)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// One provider's feed, served from the cache when possible.
pub struct Feed<F, E>
where
    F: FeedFetcher,
    E: PostExtractor<F::Raw>,
{
    id: ProviderId,
    fetcher: F,
    extractor: E,
    cache: FeedCache,
    log: Log,
    post_process: Option<PostProcess<F::Raw>>,
    on_refresh: Option<RefreshHook>,
}

impl<F, E> Feed<F, E>
where
    F: FeedFetcher,
    E: PostExtractor<F::Raw>,
{
    pub fn new(id: ProviderId, fetcher: F, extractor: E, cache: FeedCache, log: Log) -> Self {
        Self {
            id,
            fetcher,
            extractor,
            cache,
            log,
            post_process: None,
            on_refresh: None,
        }
    }

    pub fn with_post_process(
        mut self,
        hook: impl Fn(&ProviderId, &mut Vec<F::Raw>) + Send + Sync + 'static,
    ) -> Self {
        self.post_process = Some(Box::new(hook));
        self
    }

    pub fn with_refresh_hook(mut self, hook: impl Fn(RefreshNotice) + Send + Sync + 'static) -> Self {
        self.on_refresh = Some(Box::new(hook));
        self
    }

    pub fn id(&self) -> &ProviderId {
        &self.id
    }

    /// The provider's posts, newest first.
    ///
    /// Served from the cache when a live entry exists, even an empty one.
    /// Otherwise the feed is fetched and cached; see [`Feed::refresh`].
    ///
    /// # Errors
    /// Fetch failures are returned as is; nothing is retried.
    pub async fn get_feed(&self) -> Result<Vec<Post>, FetchError> {
        if let Some(mut posts) = self.cache.get(&self.id).await {
            self.log
                .info(SCOPE, format!("Serving {} from cache", self.id));
            sort_newest_first(&mut posts);
            return Ok(posts);
        }

        self.log
            .info(SCOPE, format!("Cache miss for {}, fetching", self.id));
        self.refresh().await
    }

    /// Fetches and normalizes the provider's posts without reading or writing
    /// the cache.
    pub async fn get_feed_uncached(&self) -> Result<Vec<Post>, FetchError> {
        let mut raw = self
            .log
            .warn_on_error(SCOPE, self.fetcher.fetch_raw().await)?;

        if let Some(hook) = &self.post_process {
            hook(&self.id, &mut raw);
        }

        let kind = self.fetcher.kind();
        let mut posts: Vec<Post> = raw
            .iter()
            .map(|raw| {
                let (post, time_error) = normalize(kind, &self.extractor, raw);
                if let Some(err) = time_error {
                    self.log.warn(
                        SCOPE,
                        format!("{}: {err}, using the Unix epoch", self.id),
                    );
                }
                post
            })
            .collect();

        sort_newest_first(&mut posts);
        Ok(posts)
    }

    /// Fetches the provider's posts and replaces the cached entry with them,
    /// then notifies the refresh hook.
    ///
    /// A failed cache write is logged and the fetched posts are still
    /// returned.
    pub async fn refresh(&self) -> Result<Vec<Post>, FetchError> {
        let posts = self.get_feed_uncached().await?;

        if self.cache.set(&self.id, &posts).await {
            self.notify_refresh().await;
        }
        Ok(posts)
    }

    async fn notify_refresh(&self) {
        let Some(hook) = &self.on_refresh else {
            return;
        };
        // A zero TTL leaves nothing live to refresh ahead of
        if let Some(expires_at) = self.cache.expiry_of(&self.id).await {
            hook(RefreshNotice {
                provider: self.id.clone(),
                expires_at,
            });
        }
    }

    /// Drops the cached posts so the next [`Feed::get_feed`] fetches.
    pub async fn clear_cache(&self) -> bool {
        self.cache.remove(&self.id).await
    }

    /// When the cached posts stop being served.
    pub async fn cache_expiry(&self) -> Option<DateTime<Utc>> {
        self.cache.expiry_of(&self.id).await
    }
}

/// Sorts by creation time, newest first. Posts created at the same instant
/// keep their order.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created.cmp(&a.created));
}
