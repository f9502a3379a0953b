use thiserror::Error;

use super::ProviderKind;
use crate::ArcStr;

/// Failure to retrieve a provider's raw feed. Always propagated to the caller;
/// nothing in this crate retries.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The fetcher does not override [`FeedFetcher::fetch_raw`](super::FeedFetcher::fetch_raw)
    #[error("{provider} missing implementation for fetch_raw")]
    MissingImplementation { provider: &'static str },
    /// The provider is misconfigured, e.g. a required account is missing
    #[error("{provider} provider is misconfigured: {reason}")]
    Config { provider: ProviderKind, reason: ArcStr },
    /// The upstream request failed
    #[error("{provider} upstream request failed")]
    Upstream {
        provider: ProviderKind,
        #[source]
        source: anyhow::Error,
    },
    /// The upstream answered with something that is not a feed
    #[error("{provider} returned a payload that could not be decoded")]
    Decode {
        provider: ProviderKind,
        #[source]
        source: anyhow::Error,
    },
}

/// A creation time that is neither numeric nor a recognized date format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized timestamp {0:?}")]
pub struct TimeParseError(pub ArcStr);
