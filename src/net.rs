use anyhow::Context;
use std::collections::HashMap;
use tokio::sync::mpsc::Sender;

use crate::{ArcStr, config::Config, log::Log};

mod core;
pub mod message;
mod mock;

use message::Message;
pub use mock::MockResponse;

/// Request headers, name to value.
pub type Headers = HashMap<ArcStr, ArcStr>;

/// The networking actor that performs HTTP requests for the providers.
///
/// Cloning is cheap as it only copies the channel sender or mock reference.
///
/// # Examples
/// ```ignore
/// let net = Net::spawn(config, log).await;
/// let body = net.get(url, None).await?;
/// ```
#[derive(Debug, Clone)]
pub enum Net {
    /// A real networking actor backed by reqwest
    Actual(Sender<Message>),
    /// Canned responses keyed by URL
    Mock(mock::Mock),
}

impl Net {
    /// Creates a new networking instance and spawns its actor. The request
    /// timeout is read from the configuration.
    pub async fn spawn(config: Config, log: Log) -> Self {
        let (net, _) = core::Core::new(config, log).await.spawn();
        net
    }

    /// Creates a mock that answers `GET url` with the mapped response.
    pub fn mock<I, K>(responses: I) -> Self
    where
        I: IntoIterator<Item = (K, MockResponse)>,
        K: Into<ArcStr>,
    {
        Self::Mock(mock::Mock::new(
            responses.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Creates a mock that has no responses; every request fails.
    pub fn mock_empty() -> Self {
        Self::Mock(mock::Mock::new(HashMap::new()))
    }

    /// Performs an HTTP GET request and returns the response body.
    ///
    /// # Errors
    /// Fails on transport errors and on non-success status codes.
    pub async fn get(&self, url: ArcStr, headers: Option<Headers>) -> anyhow::Result<ArcStr> {
        match self {
            Net::Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::Get { url, headers, tx })
                    .await
                    .context("Sending message to Net actor")?;
                rx.await.context("Receiving response from Net actor")?
            }
            Net::Mock(mock) => mock.get(url).await,
        }
    }

    /// Number of requests a mock received for `url`. Always 0 for the real actor.
    pub async fn request_count(&self, url: &str) -> usize {
        match self {
            Net::Actual(_) => 0,
            Net::Mock(mock) => mock.request_count(url).await,
        }
    }
}
