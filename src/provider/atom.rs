//! Atom syndication feeds, such as blogs and release notes.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::{FeedFetcher, FetchError, PostExtractor, ProviderKind, RawTimestamp, html_to_text};
use crate::{ArcStr, config::ProviderConfig, net::Net};

const KIND: ProviderKind = ProviderKind::Atom;

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "@href")]
    pub href: Option<String>,
    #[serde(rename = "@rel")]
    pub rel: Option<String>,
    #[serde(rename = "@type")]
    pub media_type: Option<String>,
}

/// One `<entry>` of an Atom feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(rename = "link", default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl Entry {
    fn link(&self, rel: &str) -> Option<&Link> {
        // A link without `rel` is an alternate link
        self.links
            .iter()
            .find(|link| link.rel.as_deref().unwrap_or("alternate") == rel)
    }
}

/// Parses an Atom document into its entries.
pub fn parse_feed(xml: &str) -> anyhow::Result<Vec<Entry>> {
    let feed: Feed = serde_xml_rs::from_str(xml).context("Failed to parse Atom feed XML")?;
    Ok(feed.entries)
}

/// Fetches every entry of one Atom feed, keeping at most `limit`.
#[derive(Debug, Clone)]
pub struct AtomFetcher {
    net: Net,
    url: ArcStr,
    limit: usize,
}

impl AtomFetcher {
    pub fn new(net: Net, url: impl Into<ArcStr>, limit: usize) -> Self {
        Self {
            net,
            url: url.into(),
            limit,
        }
    }

    /// Builds a fetcher from a provider entry whose `source` is the feed URL.
    pub fn from_config(net: Net, config: &ProviderConfig, limit: usize) -> Result<Self, FetchError> {
        let url = config.source.clone().ok_or_else(|| FetchError::Config {
            provider: KIND,
            reason: format!("`source` is required for provider {}", config.id).into(),
        })?;
        Ok(Self::new(net, url, limit))
    }
}

impl FeedFetcher for AtomFetcher {
    type Raw = Entry;

    fn kind(&self) -> ProviderKind {
        KIND
    }

    async fn fetch_raw(&self) -> Result<Vec<Entry>, FetchError> {
        let body = self
            .net
            .get(self.url.clone(), None)
            .await
            .map_err(|source| FetchError::Upstream {
                provider: KIND,
                source,
            })?;
        let mut entries = parse_feed(&body).map_err(|source| FetchError::Decode {
            provider: KIND,
            source,
        })?;
        entries.truncate(self.limit);
        Ok(entries)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AtomExtractor;

impl PostExtractor<Entry> for AtomExtractor {
    fn content(&self, post: &Entry) -> ArcStr {
        let body = post
            .content
            .as_deref()
            .or(post.summary.as_deref())
            .or(post.title.as_deref())
            .unwrap_or_default();
        html_to_text(body).into()
    }

    fn created(&self, post: &Entry) -> RawTimestamp {
        post.published
            .as_deref()
            .or(post.updated.as_deref())
            .unwrap_or_default()
            .into()
    }

    fn url(&self, post: &Entry) -> ArcStr {
        post.link("alternate")
            .and_then(|link| link.href.as_deref())
            .unwrap_or(post.id.as_str())
            .into()
    }

    fn user_name(&self, post: &Entry) -> ArcStr {
        post.author
            .as_ref()
            .map(|author| author.name.as_str())
            .unwrap_or_default()
            .into()
    }

    fn image(&self, post: &Entry) -> Option<ArcStr> {
        post.links
            .iter()
            .filter(|link| link.rel.as_deref() == Some("enclosure"))
            .find(|link| {
                link.media_type
                    .as_deref()
                    .is_some_and(|media_type| media_type.starts_with("image/"))
            })
            .and_then(|link| link.href.as_deref())
            .map(ArcStr::from)
    }
}
