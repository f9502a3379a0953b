use std::{collections::VecDeque, sync::Arc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::data::{LogLevel, LogMessage};

/// Mock implementation of the Log actor for testing purposes.
///
/// Messages are kept in memory so tests can assert on what was logged
/// without touching files or stderr.
#[derive(Debug, Clone, Default)]
pub struct Mock {
    messages: Arc<Mutex<VecDeque<LogMessage>>>,
}

impl Mock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message. Like the real logger this happens in a new task, so
    /// callers never block on logging.
    pub fn log(&self, scope: &'static str, message: String, level: LogLevel) {
        let messages = self.messages.clone();
        tokio::spawn(async move {
            messages.lock().await.push_back(LogMessage {
                level,
                scope,
                message,
            });
        });
    }

    /// Prints every recorded message to stderr.
    pub fn flush(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            for message in self.messages.lock().await.iter() {
                eprintln!("{message}");
            }
        })
    }

    pub async fn get_messages(&self) -> Vec<LogMessage> {
        self.messages.lock().await.iter().cloned().collect()
    }
}
