use std::{collections::LinkedList, io, path::Path, sync::Arc};

use tokio::{
    fs::{File, OpenOptions},
    sync::{RwLock, mpsc},
};

use crate::{ArcFile, ArcPath};

use super::message::Message;

/// The core of the Fs actor, responsible for handling filesystem operations.
///
/// Wraps tokio's filesystem functions. Operations run one at a time in the
/// order they were sent.
#[derive(Debug, Default)]
pub struct Core;

impl Core {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn spawn(self) -> (super::Fs, tokio::task::JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                use Message::*;
                match msg {
                    OpenFile { tx, path } => {
                        let _ = tx.send(open_append(&path).await);
                    }
                    ReadFile { tx, path } => {
                        let _ = tx.send(File::open(&path).await);
                    }
                    WriteFile { tx, path } => {
                        let _ = tx.send(open_truncate(&path).await);
                    }
                    RemoveFile { tx, path } => {
                        let _ = tx.send(tokio::fs::remove_file(&path).await);
                    }
                    ReadDir { tx, path } => {
                        let _ = tx.send(list_dir(&path, &path).await);
                    }
                    MkDir { tx, path } => {
                        let _ = tx.send(tokio::fs::create_dir_all(&path).await);
                    }
                }
            }
        });
        (super::Fs::Actual(tx), handle)
    }
}

pub(super) async fn open_append(path: &Path) -> Result<ArcFile, io::Error> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    Ok(Arc::new(RwLock::new(file)))
}

pub(super) async fn open_truncate(path: &Path) -> Result<File, io::Error> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .await
}

/// Reads `real` and reports each entry as a child of `shown`.
pub(super) async fn list_dir(real: &Path, shown: &Path) -> Result<LinkedList<ArcPath>, io::Error> {
    let mut entries = LinkedList::new();
    let mut rd = tokio::fs::read_dir(real).await?;
    while let Some(entry) = rd.next_entry().await? {
        entries.push_back(ArcPath::from(shown.join(entry.file_name())));
    }
    Ok(entries)
}
