use anyhow::Context;
use reqwest::Client;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::{Headers, Net, message::Message};
use crate::{
    ArcStr,
    config::{Config, USizeOpt},
    log::Log,
};

const SCOPE: &str = "net";
const USER_AGENT: &str = concat!("social-feed/", env!("CARGO_PKG_VERSION"));

/// The core of the networking system that handles HTTP requests.
///
/// Wraps a reqwest [`Client`], which pools connections between requests.
/// Requests are handled one at a time in the order they arrive.
#[derive(Debug)]
pub struct Core {
    /// Logging interface for request tracing
    log: Log,
    /// HTTP client for making requests
    client: Client,
}

impl Core {
    /// Creates a new networking core, configuring the client timeout from
    /// [`USizeOpt::Timeout`] (seconds, 0 disables it).
    pub async fn new(config: Config, log: Log) -> Self {
        let timeout = config.usize(USizeOpt::Timeout).await;
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if timeout > 0 {
            builder = builder.timeout(Duration::from_secs(timeout as u64));
        }
        let client = match builder.build() {
            Ok(client) => client,
            Err(err) => {
                log.warn(SCOPE, format!("Falling back to default HTTP client: {err}"));
                Client::new()
            }
        };

        Self { log, client }
    }

    /// Transforms the networking core into an actor.
    pub fn spawn(self) -> (Net, JoinHandle<()>) {
        let (tx, mut rx) = tokio::sync::mpsc::channel(crate::BUFFER_SIZE);

        let handle = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                match message {
                    Message::Get { url, headers, tx } => {
                        let response = self
                            .handle_get_request(url.clone(), headers)
                            .await
                            .with_context(|| format!("GET request failed for URL: {}", url));
                        let _ = tx.send(response);
                    }
                }
            }
        });

        (Net::Actual(tx), handle)
    }

    async fn handle_get_request(
        &self,
        url: ArcStr,
        headers: Option<Headers>,
    ) -> anyhow::Result<ArcStr> {
        self.log.info(SCOPE, format!("GET {url}"));
        let mut request = self.client.get(&*url);

        for (key, value) in headers.unwrap_or_default() {
            request = request.header(&*key, &*value);
        }

        let response = request
            .send()
            .await
            .context("Sending GET request")?
            .error_for_status()
            .context("Upstream returned an error status")?;
        let text = response.text().await.context("Reading response body")?;
        Ok(ArcStr::from(text))
    }
}
