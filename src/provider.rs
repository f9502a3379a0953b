//! Provider side of the feed: fetching raw posts from an upstream source and
//! turning them into [`Post`]s.
//!
//! Fetching and extraction are separate capabilities. A [`FeedFetcher`] knows
//! how to retrieve a provider's raw records; a [`PostExtractor`] knows how to
//! read the five normalized fields out of one record. Each provider module
//! ships one of each and the [`Feed`](crate::feed::Feed) is built from both.

use std::future::Future;

use serde::Serialize;

mod data;
mod error;
mod html;
mod time;

pub mod atom;
pub mod hacker_news;
pub mod mastodon;

pub use data::{Post, ProviderId, ProviderKind, RawTimestamp};
pub use error::{FetchError, TimeParseError};
pub use html::html_to_text;
pub use time::{normalize_created, parse_created};

use crate::ArcStr;

/// Reads normalized fields out of a provider's raw post record.
///
/// Every method is pure: same record, same answer.
pub trait PostExtractor<R> {
    /// Plain-text body
    fn content(&self, post: &R) -> ArcStr;
    /// Creation time, numeric or textual
    fn created(&self, post: &R) -> RawTimestamp;
    /// Canonical link
    fn url(&self, post: &R) -> ArcStr;
    /// Author handle
    fn user_name(&self, post: &R) -> ArcStr;
    /// First image, if the post has one
    fn image(&self, post: &R) -> Option<ArcStr>;
}

/// Retrieves raw posts from one upstream source.
pub trait FeedFetcher {
    /// The provider's native post record
    type Raw: Serialize + Send + Sync;

    /// The tag stamped on every post this fetcher produces
    fn kind(&self) -> ProviderKind;

    /// Fetches the provider's current posts, newest first or in any order.
    ///
    /// The default fails with [`FetchError::MissingImplementation`] naming the
    /// implementing type.
    fn fetch_raw(&self) -> impl Future<Output = Result<Vec<Self::Raw>, FetchError>> + Send {
        let provider = std::any::type_name::<Self>();
        async move { Err(FetchError::MissingImplementation { provider }) }
    }
}

/// Builds a [`Post`] from one raw record.
///
/// An unparseable creation time does not fail the post: it is set to the
/// Unix epoch and the parse error is returned next to it for the caller to
/// report.
pub fn normalize<R, E>(kind: ProviderKind, extractor: &E, raw: &R) -> (Post, Option<TimeParseError>)
where
    R: Serialize,
    E: PostExtractor<R> + ?Sized,
{
    let (created, time_error) = normalize_created(&extractor.created(raw));
    let post = Post {
        kind,
        content: extractor.content(raw),
        created,
        url: extractor.url(raw),
        user_name: extractor.user_name(raw),
        image: extractor.image(raw),
        data: serde_json::to_value(raw).unwrap_or_default(),
    };
    (post, time_error)
}
