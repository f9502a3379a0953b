//! Mastodon account timelines through the public REST API.

use serde::{Deserialize, Serialize};

use super::{FeedFetcher, FetchError, PostExtractor, ProviderKind, RawTimestamp, html_to_text};
use crate::{ArcStr, config::ProviderConfig, net::Net};

const KIND: ProviderKind = ProviderKind::Mastodon;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub username: ArcStr,
    /// `user` for local accounts, `user@domain` for remote ones
    pub acct: ArcStr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAttachment {
    #[serde(rename = "type")]
    pub kind: ArcStr,
    pub url: ArcStr,
    #[serde(default)]
    pub preview_url: Option<ArcStr>,
}

/// A status as returned by `/api/v1/accounts/:id/statuses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub id: ArcStr,
    pub created_at: ArcStr,
    #[serde(default)]
    pub url: Option<ArcStr>,
    pub uri: ArcStr,
    /// HTML body
    pub content: ArcStr,
    pub account: Account,
    #[serde(default)]
    pub media_attachments: Vec<MediaAttachment>,
    #[serde(default)]
    pub reblog: Option<Box<Status>>,
}

impl Status {
    /// Boosts carry an empty body; the boosted status holds the content.
    fn shown(&self) -> &Status {
        self.reblog.as_deref().unwrap_or(self)
    }
}

/// Fetches the latest statuses of one account, replies excluded.
#[derive(Debug, Clone)]
pub struct MastodonFetcher {
    net: Net,
    instance: ArcStr,
    account: ArcStr,
    limit: usize,
}

impl MastodonFetcher {
    pub fn new(net: Net, instance: impl Into<ArcStr>, account: impl Into<ArcStr>, limit: usize) -> Self {
        Self {
            net,
            instance: instance.into(),
            account: account.into(),
            limit,
        }
    }

    /// Builds a fetcher from a provider entry: `source` is the instance URL
    /// and `account` the numeric account id.
    pub fn from_config(net: Net, config: &ProviderConfig, limit: usize) -> Result<Self, FetchError> {
        let missing = |field: &str| FetchError::Config {
            provider: KIND,
            reason: format!("`{field}` is required for provider {}", config.id).into(),
        };
        let instance = config.source.clone().ok_or_else(|| missing("source"))?;
        let account = config.account.clone().ok_or_else(|| missing("account"))?;
        Ok(Self::new(net, instance, account, limit))
    }

    pub fn endpoint(&self) -> ArcStr {
        format!(
            "{}/api/v1/accounts/{}/statuses?limit={}&exclude_replies=true",
            self.instance.trim_end_matches('/'),
            self.account,
            self.limit
        )
        .into()
    }
}

impl FeedFetcher for MastodonFetcher {
    type Raw = Status;

    fn kind(&self) -> ProviderKind {
        KIND
    }

    async fn fetch_raw(&self) -> Result<Vec<Status>, FetchError> {
        let body = self
            .net
            .get(self.endpoint(), None)
            .await
            .map_err(|source| FetchError::Upstream {
                provider: KIND,
                source,
            })?;
        serde_json::from_str(&body).map_err(|err| FetchError::Decode {
            provider: KIND,
            source: err.into(),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MastodonExtractor;

impl PostExtractor<Status> for MastodonExtractor {
    fn content(&self, post: &Status) -> ArcStr {
        html_to_text(&post.shown().content).into()
    }

    fn created(&self, post: &Status) -> RawTimestamp {
        RawTimestamp::Text(post.created_at.clone())
    }

    fn url(&self, post: &Status) -> ArcStr {
        post.url.clone().unwrap_or_else(|| post.uri.clone())
    }

    fn user_name(&self, post: &Status) -> ArcStr {
        post.account.acct.clone()
    }

    fn image(&self, post: &Status) -> Option<ArcStr> {
        post.shown()
            .media_attachments
            .iter()
            .find(|media| &*media.kind == "image")
            .map(|media| media.url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::MockResponse;
    use crate::provider::normalize;

    const INSTANCE: &str = "https://mastodon.example";
    const ENDPOINT: &str =
        "https://mastodon.example/api/v1/accounts/42/statuses?limit=2&exclude_replies=true";

    const SAMPLE: &str = r#"[
        {
            "id": "111",
            "created_at": "2023-11-14T22:13:20.000Z",
            "url": "https://mastodon.example/@ana/111",
            "uri": "https://mastodon.example/users/ana/statuses/111",
            "content": "<p>Hello <a href=\"https://rust-lang.org\">Rust</a></p><p>bye</p>",
            "account": { "id": "42", "username": "ana", "acct": "ana" },
            "media_attachments": [
                { "id": "1", "type": "video", "url": "https://files.example/v.mp4" },
                { "id": "2", "type": "image", "url": "https://files.example/i.png", "preview_url": "https://files.example/i_small.png" }
            ],
            "reblog": null
        },
        {
            "id": "110",
            "created_at": "2023-11-13T10:00:00.000Z",
            "url": null,
            "uri": "https://mastodon.example/users/ana/statuses/110",
            "content": "",
            "account": { "id": "42", "username": "ana", "acct": "ana" },
            "media_attachments": [],
            "reblog": {
                "id": "9",
                "created_at": "2023-11-12T10:00:00.000Z",
                "url": "https://other.example/@bob/9",
                "uri": "https://other.example/users/bob/statuses/9",
                "content": "<p>boosted</p>",
                "account": { "id": "7", "username": "bob", "acct": "bob@other.example" },
                "media_attachments": []
            }
        }
    ]"#;

    fn fetcher(net: Net) -> MastodonFetcher {
        MastodonFetcher::new(net, format!("{INSTANCE}/"), "42", 2)
    }

    #[tokio::test]
    async fn test_fetch_and_extract_statuses() {
        let net = Net::mock([(ENDPOINT, MockResponse::body(SAMPLE))]);
        let statuses = fetcher(net.clone()).fetch_raw().await.unwrap();
        assert_eq!(statuses.len(), 2);
        assert_eq!(net.request_count(ENDPOINT).await, 1);

        let (post, err) = normalize(KIND, &MastodonExtractor, &statuses[0]);
        assert!(err.is_none());
        assert_eq!(&*post.content, "Hello Rust\n\nbye");
        assert_eq!(post.created.timestamp(), 1_700_000_000);
        assert_eq!(&*post.url, "https://mastodon.example/@ana/111");
        assert_eq!(&*post.user_name, "ana");
        assert_eq!(post.image.as_deref(), Some("https://files.example/i.png"));
        assert_eq!(post.data["id"], "111");
    }

    #[test]
    fn test_boost_uses_reblogged_content() {
        let statuses: Vec<Status> = serde_json::from_str(SAMPLE).unwrap();
        let boost = &statuses[1];
        assert_eq!(&*MastodonExtractor.content(boost), "boosted");
        assert_eq!(
            &*MastodonExtractor.url(boost),
            "https://mastodon.example/users/ana/statuses/110"
        );
        assert_eq!(MastodonExtractor.image(boost), None);
    }

    #[tokio::test]
    async fn test_upstream_and_decode_errors() {
        let net = Net::mock([(ENDPOINT, MockResponse::error("503"))]);
        let err = fetcher(net).fetch_raw().await.unwrap_err();
        assert!(matches!(err, FetchError::Upstream { provider: KIND, .. }));

        let net = Net::mock([(ENDPOINT, MockResponse::body("<html>oops</html>"))]);
        let err = fetcher(net).fetch_raw().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { provider: KIND, .. }));
    }

    #[test]
    fn test_from_config_requires_account() {
        let mut config = ProviderConfig {
            id: "masto".into(),
            label: "Masto".into(),
            enabled: true,
            kind: KIND,
            source: Some(INSTANCE.into()),
            account: None,
        };
        let err = MastodonFetcher::from_config(Net::mock_empty(), &config, 5).unwrap_err();
        assert!(err.to_string().contains("`account`"));

        config.account = Some("42".into());
        let fetcher = MastodonFetcher::from_config(Net::mock_empty(), &config, 5).unwrap();
        assert!(fetcher.endpoint().ends_with("/accounts/42/statuses?limit=5&exclude_replies=true"));
    }
}
