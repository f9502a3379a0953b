use std::env::VarError;

use anyhow::Context;
use tokio::sync::{mpsc::Sender, oneshot};

use crate::ArcStr;
use message::Message;

mod core;
mod message;
mod mock;
#[cfg(test)]
mod tests;

/// The env actor gives read access to environment variables.
///
/// Configuration uses it to locate the config file and to apply
/// `SOCIAL_FEED_*` overrides. The mock variant holds an in-memory map so
/// tests never depend on the process environment.
///
/// # Examples
/// ```ignore
/// let env = Env::spawn();
/// let home = env.env("HOME").await?;
/// ```
#[derive(Debug, Clone)]
pub enum Env {
    /// Reads the real process environment
    Actual(Sender<Message>),
    /// In-memory variables for testing
    Mock(mock::Mock),
}

impl From<core::Core> for Env {
    fn from(core: core::Core) -> Self {
        let (env, _) = core.spawn();
        env
    }
}

impl Env {
    pub fn spawn() -> Self {
        core::Core::new().into()
    }

    /// Creates a mock seeded with the given `(key, value)` pairs
    pub fn mock<I, K, V>(variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ArcStr>,
        V: Into<ArcStr>,
    {
        Self::Mock(mock::Mock::with_variables(
            variables
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// Gets an environment variable
    pub async fn env(&self, key: impl Into<ArcStr>) -> Result<ArcStr, VarError> {
        let key = key.into();
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::Get { tx, key })
                    .await
                    .context("Getting environment variable with Env")
                    .expect("env actor died");
                rx.await
                    .context("Awaiting response for environment variable get with Env")
                    .expect("env actor died")
            }
            Self::Mock(mock) => mock.env(&key).await,
        }
    }

    /// Gets an environment variable, treating absent and empty values alike.
    pub async fn env_opt(&self, key: impl Into<ArcStr>) -> Option<ArcStr> {
        self.env(key).await.ok().filter(|value| !value.is_empty())
    }
}
