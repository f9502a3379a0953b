use std::fmt::Display;

use tokio::{sync::mpsc::Sender, task::JoinHandle};

use crate::{ArcPath, fs::Fs};

mod core;
mod data;
mod message;
mod mock;

pub use core::LogCore;
pub use data::{LogLevel, LogMessage};
use message::Message;

/// The logging actor that provides a thread-safe interface for logging operations.
///
/// This enum represents either a real logging actor or a mock implementation
/// for testing purposes. Every message carries a scope, conventionally the
/// dotted module path of the caller (e.g. `"feed"` or `"store.file"`).
///
/// # Examples
/// ```ignore
/// let log = Log::spawn(fs, LogLevel::Warning, 7, log_dir).await?;
/// log.info("main", "Starting social-feed");
/// ```
///
/// # Thread Safety
/// Cloning is cheap as it only copies the channel sender or mock reference.
#[derive(Debug, Clone)]
pub enum Log {
    /// A real logging actor that writes to files and stderr
    Actual(Sender<Message>),
    /// A mock implementation for testing that keeps messages in memory
    Mock(mock::Mock),
}

impl Log {
    /// Builds a [`LogCore`] and spawns it as an actor.
    ///
    /// # Errors
    /// Fails if the log directory or the log files cannot be created.
    pub async fn spawn(
        fs: Fs,
        level: LogLevel,
        max_age: usize,
        log_dir: ArcPath,
    ) -> anyhow::Result<Self> {
        let (log, _) = LogCore::build(fs, level, max_age, log_dir).await?.spawn();
        Ok(log)
    }

    /// Creates a mock logger that records messages in memory.
    pub fn mock() -> Self {
        Self::Mock(mock::Mock::new())
    }

    /// Sends a [`LogMessage`] to the logger in a new task so it won't block
    /// the caller.
    fn log(&self, scope: &'static str, message: String, level: LogLevel) {
        let sender = match self {
            Log::Mock(mock) => return mock.log(scope, message, level),
            Log::Actual(sender) => sender.clone(),
        };

        tokio::spawn(async move {
            // A closed channel means the logger was flushed; late messages are dropped.
            let _ = sender
                .send(Message::Log(LogMessage {
                    level,
                    scope,
                    message,
                }))
                .await;
        });
    }

    /// Log a message with the `INFO` level
    pub fn info<M: Display>(&self, scope: &'static str, message: M) {
        self.log(scope, message.to_string(), LogLevel::Info);
    }

    /// Log a message with the `WARNING` level
    pub fn warn<M: Display>(&self, scope: &'static str, message: M) {
        self.log(scope, message.to_string(), LogLevel::Warning);
    }

    /// Log a message with the `ERROR` level
    pub fn error<M: Display>(&self, scope: &'static str, message: M) {
        self.log(scope, message.to_string(), LogLevel::Error);
    }

    /// Log an info message if the result is an error and return the result
    /// as is
    pub fn info_on_error<T, E: Display>(
        &self,
        scope: &'static str,
        result: Result<T, E>,
    ) -> Result<T, E> {
        if let Err(err) = &result {
            self.log(scope, err.to_string(), LogLevel::Info);
        }
        result
    }

    /// Log a warning message if the result is an error and return the result
    /// as is
    pub fn warn_on_error<T, E: Display>(
        &self,
        scope: &'static str,
        result: Result<T, E>,
    ) -> Result<T, E> {
        if let Err(err) = &result {
            self.log(scope, err.to_string(), LogLevel::Warning);
        }
        result
    }

    /// Log an error message if the result is an error and return the result
    /// as is
    pub fn error_on_error<T, E: Display>(
        &self,
        scope: &'static str,
        result: Result<T, E>,
    ) -> Result<T, E> {
        if let Err(err) = &result {
            self.log(scope, err.to_string(), LogLevel::Error);
        }
        result
    }

    /// Flushes the logger by printing its buffered messages to [`stderr`].
    /// After the flush completes the actor stops and later messages are
    /// dropped.
    ///
    /// [`stderr`]: std::io::stderr
    pub fn flush(self) -> JoinHandle<()> {
        match self {
            Self::Actual(sender) => tokio::spawn(async move {
                let _ = sender.send(Message::Flush).await;
            }),
            Self::Mock(mock) => mock.flush(),
        }
    }

    /// Deletes log files older than the `max_age` given to [`Log::spawn`].
    pub async fn collect_garbage(&self) {
        if let Self::Actual(sender) = self {
            let _ = sender.send(Message::CollectGarbage).await;
        }
    }

    /// Messages recorded by a mock logger, `None` for a real one.
    pub async fn get_messages(&self) -> Option<Vec<LogMessage>> {
        match self {
            Self::Actual(_) => None,
            Self::Mock(mock) => Some(mock.get_messages().await),
        }
    }
}
