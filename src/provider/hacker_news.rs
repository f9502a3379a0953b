//! Stories and comments of one Hacker News user, through the Algolia search API.

use serde::{Deserialize, Serialize};

use super::{FeedFetcher, FetchError, PostExtractor, ProviderKind, RawTimestamp, html_to_text};
use crate::{ArcStr, config::ProviderConfig, net::Net};

const KIND: ProviderKind = ProviderKind::HackerNews;
const API: &str = "https://hn.algolia.com/api/v1";
const ITEM_URL: &str = "https://news.ycombinator.com/item?id=";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Vec<Hit>,
}

/// A story or comment as returned by `search_by_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "objectID")]
    pub object_id: ArcStr,
    pub created_at_i: i64,
    pub author: ArcStr,
    #[serde(default)]
    pub title: Option<ArcStr>,
    #[serde(default)]
    pub url: Option<ArcStr>,
    #[serde(default)]
    pub story_text: Option<ArcStr>,
    #[serde(default)]
    pub comment_text: Option<ArcStr>,
    #[serde(default)]
    pub story_title: Option<ArcStr>,
}

#[derive(Debug, Clone)]
pub struct HackerNewsFetcher {
    net: Net,
    user: ArcStr,
    limit: usize,
}

impl HackerNewsFetcher {
    pub fn new(net: Net, user: impl Into<ArcStr>, limit: usize) -> Self {
        Self {
            net,
            user: user.into(),
            limit,
        }
    }

    /// Builds a fetcher from a provider entry whose `account` is the user name.
    pub fn from_config(net: Net, config: &ProviderConfig, limit: usize) -> Result<Self, FetchError> {
        let user = config.account.clone().ok_or_else(|| FetchError::Config {
            provider: KIND,
            reason: format!("`account` is required for provider {}", config.id).into(),
        })?;
        Ok(Self::new(net, user, limit))
    }

    pub fn endpoint(&self) -> ArcStr {
        format!(
            "{API}/search_by_date?tags=author_{}&hitsPerPage={}",
            self.user, self.limit
        )
        .into()
    }
}

impl FeedFetcher for HackerNewsFetcher {
    type Raw = Hit;

    fn kind(&self) -> ProviderKind {
        KIND
    }

    async fn fetch_raw(&self) -> Result<Vec<Hit>, FetchError> {
        let body = self
            .net
            .get(self.endpoint(), None)
            .await
            .map_err(|source| FetchError::Upstream {
                provider: KIND,
                source,
            })?;
        let response: SearchResponse =
            serde_json::from_str(&body).map_err(|err| FetchError::Decode {
                provider: KIND,
                source: err.into(),
            })?;
        Ok(response.hits)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HackerNewsExtractor;

impl PostExtractor<Hit> for HackerNewsExtractor {
    fn content(&self, post: &Hit) -> ArcStr {
        if let Some(text) = post.comment_text.as_deref().or(post.story_text.as_deref()) {
            return html_to_text(text).into();
        }
        post.title
            .clone()
            .or_else(|| post.story_title.clone())
            .unwrap_or_default()
    }

    fn created(&self, post: &Hit) -> RawTimestamp {
        RawTimestamp::Epoch(post.created_at_i)
    }

    fn url(&self, post: &Hit) -> ArcStr {
        match &post.url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => format!("{ITEM_URL}{}", post.object_id).into(),
        }
    }

    fn user_name(&self, post: &Hit) -> ArcStr {
        post.author.clone()
    }

    fn image(&self, _post: &Hit) -> Option<ArcStr> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::MockResponse;
    use crate::provider::normalize;

    const ENDPOINT: &str =
        "https://hn.algolia.com/api/v1/search_by_date?tags=author_pg&hitsPerPage=3";

    const SAMPLE: &str = r#"{
        "hits": [
            {
                "objectID": "38270000",
                "created_at": "2023-11-14T22:13:20Z",
                "created_at_i": 1700000000,
                "author": "pg",
                "title": "Show HN: A thing",
                "url": "https://thing.example",
                "story_text": null,
                "comment_text": null,
                "_tags": ["story", "author_pg"]
            },
            {
                "objectID": "38269999",
                "created_at_i": 1699990000,
                "author": "pg",
                "story_title": "Ask HN: Something",
                "comment_text": "<p>I agree &amp; disagree.</p>",
                "url": null
            }
        ],
        "nbHits": 2
    }"#;

    #[tokio::test]
    async fn test_fetch_and_extract_hits() {
        let net = Net::mock([(ENDPOINT, MockResponse::body(SAMPLE))]);
        let hits = HackerNewsFetcher::new(net, "pg", 3)
            .fetch_raw()
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);

        let (story, err) = normalize(KIND, &HackerNewsExtractor, &hits[0]);
        assert!(err.is_none());
        assert_eq!(&*story.content, "Show HN: A thing");
        assert_eq!(story.created.timestamp(), 1_700_000_000);
        assert_eq!(&*story.url, "https://thing.example");
        assert_eq!(&*story.user_name, "pg");
        assert_eq!(story.image, None);

        let (comment, _) = normalize(KIND, &HackerNewsExtractor, &hits[1]);
        assert_eq!(&*comment.content, "I agree & disagree.");
        assert_eq!(
            &*comment.url,
            "https://news.ycombinator.com/item?id=38269999"
        );
    }

    #[tokio::test]
    async fn test_decode_error() {
        let net = Net::mock([(ENDPOINT, MockResponse::body("{\"message\": \"rate limited\"}"))]);
        let err = HackerNewsFetcher::new(net, "pg", 3)
            .fetch_raw()
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode { provider: KIND, .. }));
    }
}
