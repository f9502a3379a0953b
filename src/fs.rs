use std::{collections::LinkedList, io};

use anyhow::Context;
use tokio::{fs::File, sync::mpsc::Sender};

use crate::{ArcFile, ArcPath};

mod core;
mod message;
mod mock;
#[cfg(test)]
mod tests;

use message::Message;

/// The filesystem actor that provides a thread-safe interface for file operations.
///
/// The real variant forwards every operation to a spawned [`core::Core`] task.
/// The mock variant roots every path inside a temporary directory, so tests can
/// use the same code paths without touching the real filesystem.
///
/// # Examples
/// ```ignore
/// let fs = Fs::spawn();
/// fs.mkdir(cache_dir.clone()).await?;
/// let file = fs.write_file(path).await?;
/// ```
#[derive(Debug, Clone)]
pub enum Fs {
    /// A real filesystem actor
    Actual(Sender<Message>),
    /// A mock rooted in a temporary directory
    Mock(mock::Mock),
}

use Fs::*;

impl Fs {
    /// Creates a new filesystem actor.
    pub fn spawn() -> Self {
        let (fs, _) = core::Core::new().spawn();
        fs
    }

    /// Creates a mock filesystem backed by a fresh temporary directory.
    ///
    /// # Panics
    /// If the temporary directory cannot be created.
    pub fn mock() -> Self {
        Mock(mock::Mock::new())
    }

    /// Opens a file for appending, creating it if needed. Used for log files.
    pub async fn open_file(&self, path: ArcPath) -> Result<ArcFile, io::Error> {
        match self {
            Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::OpenFile { tx, path })
                    .await
                    .context("Opening file with Fs")
                    .expect("fs actor died");
                rx.await
                    .context("Awaiting response for file open with Fs")
                    .expect("fs actor died")
            }
            Mock(mock) => mock.open_file(path).await,
        }
    }

    /// Opens an existing file for reading.
    pub async fn read_file(&self, path: ArcPath) -> Result<File, io::Error> {
        match self {
            Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::ReadFile { tx, path })
                    .await
                    .context("Reading file with Fs")
                    .expect("fs actor died");
                rx.await
                    .context("Awaiting response for file read with Fs")
                    .expect("fs actor died")
            }
            Mock(mock) => mock.read_file(path).await,
        }
    }

    /// Opens a file for writing, truncating it and creating it if needed.
    pub async fn write_file(&self, path: ArcPath) -> Result<File, io::Error> {
        match self {
            Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::WriteFile { tx, path })
                    .await
                    .context("Writing file with Fs")
                    .expect("fs actor died");
                rx.await
                    .context("Awaiting response for file write with Fs")
                    .expect("fs actor died")
            }
            Mock(mock) => mock.write_file(path).await,
        }
    }

    /// Removes a file from the filesystem
    pub async fn remove_file(&self, path: ArcPath) -> Result<(), io::Error> {
        match self {
            Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::RemoveFile { tx, path })
                    .await
                    .context("Removing file with Fs")
                    .expect("fs actor died");
                rx.await
                    .context("Awaiting response for file removal with Fs")
                    .expect("fs actor died")
            }
            Mock(mock) => mock.remove_file(path).await,
        }
    }

    /// Lists the entries of a directory
    pub async fn read_dir(&self, path: ArcPath) -> Result<LinkedList<ArcPath>, io::Error> {
        match self {
            Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::ReadDir { tx, path })
                    .await
                    .context("Reading directory with Fs")
                    .expect("fs actor died");
                rx.await
                    .context("Awaiting response for directory read with Fs")
                    .expect("fs actor died")
            }
            Mock(mock) => mock.read_dir(path).await,
        }
    }

    /// Creates a directory and its parents if they don't exist
    pub async fn mkdir(&self, path: ArcPath) -> Result<(), io::Error> {
        match self {
            Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::MkDir { tx, path })
                    .await
                    .context("Creating directory with Fs")
                    .expect("fs actor died");
                rx.await
                    .context("Awaiting response for directory creation with Fs")
                    .expect("fs actor died")
            }
            Mock(mock) => mock.mkdir(path).await,
        }
    }
}
