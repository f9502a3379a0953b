use std::{collections::HashMap, io::ErrorKind, time::Duration};

use anyhow::Context;
use chrono::{TimeDelta, Utc};
use regex::{Captures, Regex};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    task::JoinHandle,
};

use super::{
    Store,
    data::Entry,
    message::Message,
};
use crate::{ArcPath, ArcStr, fs::Fs, log::Log};

const SCOPE: &str = "store";
const EXTENSION: &str = "toml";

/// File-backed store. Each key lives in its own TOML file under `dir`; loaded
/// entries are mirrored in memory so repeated reads skip the filesystem.
///
/// Expired entries are never served: they are deleted the first time they
/// are read, or by a sweep.
#[derive(Debug)]
pub struct Core {
    fs: Fs,
    log: Log,
    dir: ArcPath,
    ttl: TimeDelta,
    /// Characters not allowed in entry file names
    unsafe_chars: Regex,
    entries: HashMap<ArcStr, Entry>,
}

impl Core {
    pub async fn build(fs: Fs, log: Log, dir: ArcPath, ttl: Duration) -> anyhow::Result<Self> {
        let ttl = TimeDelta::from_std(ttl).context("Cache TTL is out of range")?;
        let unsafe_chars = Regex::new(r"[^A-Za-z0-9_.-]").context("Compiling file name filter")?;

        fs.mkdir(dir.clone())
            .await
            .with_context(|| format!("Failed to create cache directory: {}", dir.display()))?;

        Ok(Self {
            fs,
            log,
            dir,
            ttl,
            unsafe_chars,
            entries: HashMap::new(),
        })
    }

    pub fn spawn(mut self) -> (Store, JoinHandle<()>) {
        let (tx, mut rx) = tokio::sync::mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                match msg {
                    Message::Get { key, tx } => {
                        let res = self.live_entry(&key).await.map(|entry| entry.payload);
                        let _ = tx.send(res);
                    }
                    Message::Set { key, blob, tx } => {
                        let res = self.set(key, blob).await;
                        let _ = tx.send(res);
                    }
                    Message::Remove { key, tx } => {
                        let res = self.remove(&key).await;
                        let _ = tx.send(res);
                    }
                    Message::Metadata { key, tx } => {
                        let res = self.live_entry(&key).await.map(|entry| entry.metadata());
                        let _ = tx.send(res);
                    }
                    Message::ClearExpired { tx } => {
                        let res = self.clear_expired().await;
                        let _ = tx.send(res);
                    }
                }
            }
        });
        (Store::Actual(tx), handle)
    }

    /// Maps a key to its entry file. Unsafe characters, `%` included, are
    /// percent-encoded so distinct keys never share a file.
    fn entry_path(&self, key: &str) -> ArcPath {
        let name = self.unsafe_chars.replace_all(key, |caps: &Captures| {
            caps[0]
                .bytes()
                .map(|byte| format!("%{byte:02X}"))
                .collect::<String>()
        });
        ArcPath::from(self.dir.join(format!("{name}.{EXTENSION}")))
    }

    /// Reads and parses one entry file. Unreadable or malformed files are
    /// reported and treated as absent.
    async fn read_entry(&self, path: ArcPath) -> Option<Entry> {
        let mut file = match self.fs.read_file(path.clone()).await {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                self.log.warn(
                    SCOPE,
                    format!("Failed to open cache entry {}: {err}", path.display()),
                );
                return None;
            }
        };

        let mut contents = String::new();
        if let Err(err) = file.read_to_string(&mut contents).await {
            self.log.warn(
                SCOPE,
                format!("Failed to read cache entry {}: {err}", path.display()),
            );
            return None;
        }

        self.log
            .warn_on_error(
                SCOPE,
                toml::from_str::<Entry>(&contents)
                    .with_context(|| format!("Malformed cache entry {}", path.display())),
            )
            .ok()
    }

    /// The entry for `key` if present and fresh. A stale entry is deleted.
    async fn live_entry(&mut self, key: &ArcStr) -> Option<Entry> {
        let entry = match self.entries.get(key) {
            Some(entry) => entry.clone(),
            None => {
                let entry = self.read_entry(self.entry_path(key)).await?;
                if entry.key != *key {
                    self.log.warn(
                        SCOPE,
                        format!("Cache entry for {key} holds key {}", entry.key),
                    );
                    return None;
                }
                self.entries.insert(key.clone(), entry.clone());
                entry
            }
        };

        if entry.is_expired(Utc::now()) {
            self.log.info(SCOPE, format!("Cache entry {key} expired"));
            self.remove(key).await;
            return None;
        }
        Some(entry)
    }

    async fn write_entry(&self, entry: &Entry) -> anyhow::Result<()> {
        let path = self.entry_path(&entry.key);
        let contents = toml::to_string(entry).context("Serializing cache entry")?;
        let mut file = self
            .fs
            .write_file(path.clone())
            .await
            .with_context(|| format!("Failed to create cache entry {}", path.display()))?;
        file.write_all(contents.as_bytes())
            .await
            .with_context(|| format!("Failed to write cache entry {}", path.display()))?;
        file.flush().await.context("Flushing cache entry")?;
        Ok(())
    }

    async fn set(&mut self, key: ArcStr, blob: ArcStr) -> bool {
        let entry = Entry::new(key.clone(), blob, self.ttl);
        match self.write_entry(&entry).await {
            Ok(()) => {
                self.entries.insert(key, entry);
                true
            }
            Err(err) => {
                self.log.error(SCOPE, format!("{err:#}"));
                // The file may hold an older version, so the mirror must not
                self.entries.remove(&key);
                false
            }
        }
    }

    async fn remove(&mut self, key: &ArcStr) -> bool {
        self.entries.remove(key);
        let path = self.entry_path(key);
        // Never unlink a file written for another key
        if let Some(entry) = self.read_entry(path.clone()).await {
            if entry.key != *key {
                return true;
            }
        }
        match self.fs.remove_file(path.clone()).await {
            Ok(()) => true,
            Err(err) if err.kind() == ErrorKind::NotFound => true,
            Err(err) => {
                self.log.error(
                    SCOPE,
                    format!("Failed to remove cache entry {}: {err}", path.display()),
                );
                false
            }
        }
    }

    async fn clear_expired(&mut self) -> usize {
        let now = Utc::now();
        let files = match self.fs.read_dir(self.dir.clone()).await {
            Ok(files) => files,
            Err(err) => {
                self.log.warn(
                    SCOPE,
                    format!("Failed to list cache directory {}: {err}", self.dir.display()),
                );
                return 0;
            }
        };

        let mut removed = 0;
        for path in files {
            if path.extension().is_none_or(|ext| ext != EXTENSION) {
                continue;
            }
            let Some(entry) = self.read_entry(path).await else {
                continue;
            };
            if entry.is_expired(now) && self.remove(&entry.key).await {
                removed += 1;
            }
        }

        self.entries.retain(|_, entry| !entry.is_expired(now));
        self.log
            .info(SCOPE, format!("Removed {removed} expired cache entries"));
        removed
    }
}
