use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ArcStr;

/// Identifies one configured provider instance. Used as the cache key, so two
/// providers of the same kind (say, two Mastodon accounts) never share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(ArcStr);

impl ProviderId {
    pub fn new(id: impl Into<ArcStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_arc_str(&self) -> ArcStr {
        self.0.clone()
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The upstream source a provider talks to. Stored on every [`Post`] as its
/// `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// A Mastodon account timeline
    Mastodon,
    /// Any Atom syndication feed
    Atom,
    /// Submissions and comments of a Hacker News user
    HackerNews,
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Mastodon => write!(f, "mastodon"),
            ProviderKind::Atom => write!(f, "atom"),
            ProviderKind::HackerNews => write!(f, "hacker_news"),
        }
    }
}

/// Creation time as a provider reports it, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTimestamp {
    /// Seconds since the Unix epoch
    Epoch(i64),
    /// A calendar date/time string, or a number rendered as text
    Text(ArcStr),
}

impl From<i64> for RawTimestamp {
    fn from(value: i64) -> Self {
        Self::Epoch(value)
    }
}

impl From<&str> for RawTimestamp {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for RawTimestamp {
    fn from(value: String) -> Self {
        Self::Text(value.into())
    }
}

/// A provider-agnostic post.
///
/// Built once from a raw provider record and never modified afterwards. The
/// raw record is kept in `data` so callers can reach provider-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// The provider this post came from
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    /// Plain-text body of the post
    pub content: ArcStr,
    /// When the post was created
    pub created: DateTime<Utc>,
    /// Canonical link to the post
    pub url: ArcStr,
    /// Author handle as the provider displays it
    pub user_name: ArcStr,
    /// URL or path of the first attached image, if any
    pub image: Option<ArcStr>,
    /// The raw provider record
    pub data: serde_json::Value,
}
