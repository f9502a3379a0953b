use std::io;

use anyhow::Context;

pub use core::{CACHE_DIR_VAR, LOG_LEVEL_VAR};
pub use data::{Data, PathOpt, ProviderConfig, USizeOpt};
use message::Message;

use crate::{ArcPath, env::Env, fs::Fs, log::LogLevel, provider::ProviderId};

mod core;
mod data;
mod message;
mod mock;
#[cfg(test)]
mod tests;

/// The configuration actor that provides a thread-safe interface for configuration operations.
///
/// This enum represents either a real configuration actor or a mock implementation
/// for testing purposes. It provides a unified interface for configuration operations
/// regardless of the underlying implementation.
///
/// # Examples
/// ```ignore
/// let config = Config::spawn(env, fs, config_path);
/// config.load().await?;
/// let cache_dir = config.path(PathOpt::CacheDir).await;
/// ```
///
/// # Thread Safety
/// Cloning is cheap as it only copies the channel sender or mock reference.
#[derive(Debug, Clone)]
pub enum Config {
    /// A real configuration actor that reads from and writes to a TOML file
    Actual(tokio::sync::mpsc::Sender<Message>),
    /// A mock implementation for testing that stores data in memory
    Mock(mock::Mock),
}

impl Config {
    /// Creates a new configuration instance backed by the file at `path` and
    /// spawns its actor. Nothing is read until [`Config::load`].
    pub fn spawn(env: Env, fs: Fs, path: ArcPath) -> Self {
        let (config, _) = core::Core::new(env, fs, path).spawn();
        config
    }

    /// Creates a new mock configuration instance for testing.
    pub fn mock(data: Data) -> Self {
        Self::Mock(mock::Mock::new(data))
    }

    /// Loads the configuration from the file and applies the
    /// `SOCIAL_FEED_CACHE_DIR` and `SOCIAL_FEED_LOG_LEVEL` overrides.
    ///
    /// For the mock implementation, this is a no-op that always succeeds.
    ///
    /// # Errors
    /// Fails if the file cannot be read or is not valid TOML, or if the log
    /// level override is not a level name.
    pub async fn load(&self) -> anyhow::Result<()> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::Load { tx })
                    .await
                    .context("Loading config with Config actor")
                    .expect("Config actor died");
                rx.await
                    .context("Awaiting response for config load with Config actor")
                    .expect("Config actor died")
            }
            Self::Mock(_) => Ok(()),
        }
    }

    /// Loads the configuration, writing the defaults out when there is no
    /// file yet. An existing file is never overwritten.
    ///
    /// # Errors
    /// Fails when the file exists but cannot be used, or when the defaults
    /// cannot be saved. Values that did load are kept either way.
    pub async fn load_or_init(&self) -> anyhow::Result<()> {
        match self.load().await {
            Ok(()) => Ok(()),
            Err(err) if is_not_found(&err) => self.save().await,
            Err(err) => Err(err),
        }
    }

    /// Saves the current configuration to the file.
    ///
    /// For the mock implementation, this is a no-op that always succeeds.
    pub async fn save(&self) -> anyhow::Result<()> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::Save { tx })
                    .await
                    .context("Saving config with Config actor")
                    .expect("Config actor died");
                rx.await
                    .context("Awaiting response for config save with Config actor")
                    .expect("Config actor died")
            }
            Self::Mock(_) => Ok(()),
        }
    }

    /// Gets a path-based configuration value.
    pub async fn path(&self, opt: PathOpt) -> ArcPath {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::GetPath { opt, tx })
                    .await
                    .context("Getting path with Config actor")
                    .expect("Config actor died");
                rx.await
                    .context("Awaiting response for path with Config actor")
                    .expect("Config actor died")
            }
            Self::Mock(mock) => mock.path(opt).await,
        }
    }

    /// Sets a path-based configuration value.
    pub async fn set_path(&self, opt: PathOpt, path: ArcPath) {
        match self {
            Self::Actual(sender) => {
                let _ = sender.send(Message::SetPath { opt, path }).await;
            }
            Self::Mock(mock) => mock.set_path(opt, path).await,
        }
    }

    /// Gets the current log level.
    pub async fn log_level(&self) -> LogLevel {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::GetLogLevel { tx })
                    .await
                    .context("Getting log level with Config actor")
                    .expect("Config actor died");
                rx.await
                    .context("Awaiting response for log level with Config actor")
                    .expect("Config actor died")
            }
            Self::Mock(mock) => mock.log_level().await,
        }
    }

    /// Sets the log level.
    pub async fn set_log_level(&self, level: LogLevel) {
        match self {
            Self::Actual(sender) => {
                let _ = sender.send(Message::SetLogLevel { level }).await;
            }
            Self::Mock(mock) => mock.set_log_level(level).await,
        }
    }

    /// Gets a numeric configuration value.
    pub async fn usize(&self, opt: USizeOpt) -> usize {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::GetUSize { opt, tx })
                    .await
                    .context("Getting numeric value with Config actor")
                    .expect("Config actor died");
                rx.await
                    .context("Awaiting response for numeric value with Config actor")
                    .expect("Config actor died")
            }
            Self::Mock(mock) => mock.usize(opt).await,
        }
    }

    /// Sets a numeric configuration value.
    pub async fn set_usize(&self, opt: USizeOpt, value: usize) {
        match self {
            Self::Actual(sender) => {
                let _ = sender.send(Message::SetUSize { opt, size: value }).await;
            }
            Self::Mock(mock) => mock.set_usize(opt, value).await,
        }
    }

    /// Every configured provider in file order, including disabled ones.
    pub async fn providers(&self) -> Vec<ProviderConfig> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::GetProviders { tx })
                    .await
                    .context("Getting providers with Config actor")
                    .expect("Config actor died");
                rx.await
                    .context("Awaiting response for providers with Config actor")
                    .expect("Config actor died")
            }
            Self::Mock(mock) => mock.providers().await,
        }
    }

    /// The provider configured with `id`, if any.
    pub async fn provider(&self, id: ProviderId) -> Option<ProviderConfig> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::GetProvider { id, tx })
                    .await
                    .context("Getting provider with Config actor")
                    .expect("Config actor died");
                rx.await
                    .context("Awaiting response for provider with Config actor")
                    .expect("Config actor died")
            }
            Self::Mock(mock) => mock.provider(&id).await,
        }
    }

    /// Replaces the provider list.
    pub async fn set_providers(&self, providers: Vec<ProviderConfig>) {
        match self {
            Self::Actual(sender) => {
                let _ = sender.send(Message::SetProviders { providers }).await;
            }
            Self::Mock(mock) => mock.set_providers(providers).await,
        }
    }
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|err| err.kind() == io::ErrorKind::NotFound)
    })
}
