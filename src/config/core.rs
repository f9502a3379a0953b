use std::path::Path;

use anyhow::Context;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::{ArcPath, BUFFER_SIZE, env::Env, fs::Fs};

use super::{
    Config,
    data::{Data, PathOpt},
    message::Message,
};

/// Overrides the cache directory from the environment
pub const CACHE_DIR_VAR: &str = "SOCIAL_FEED_CACHE_DIR";
/// Overrides the log level from the environment
pub const LOG_LEVEL_VAR: &str = "SOCIAL_FEED_LOG_LEVEL";

/// The core configuration actor that handles file I/O and data management.
///
/// Owns the configuration data and serializes every read and write through
/// its message loop.
pub struct Core {
    env: Env,
    fs: Fs,
    /// The path to the configuration file
    path: ArcPath,
    data: Data,
}

impl Core {
    pub fn new(env: Env, fs: Fs, path: ArcPath) -> Self {
        Self {
            env,
            fs,
            path,
            data: Data::default(),
        }
    }

    /// Spawns the configuration actor and returns a handle to it.
    pub fn spawn(mut self) -> (Config, tokio::task::JoinHandle<()>) {
        let (tx, mut rx) = tokio::sync::mpsc::channel(BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                match msg {
                    Message::Load { tx } => {
                        let res = self.load().await;
                        let _ = tx.send(res);
                    }
                    Message::Save { tx } => {
                        let res = self.save().await;
                        let _ = tx.send(res);
                    }
                    Message::GetPath { opt, tx } => {
                        let _ = tx.send(self.data.path(opt));
                    }
                    Message::SetPath { opt, path } => {
                        self.data.set_path(opt, path);
                    }
                    Message::GetLogLevel { tx } => {
                        let _ = tx.send(self.data.log_level());
                    }
                    Message::SetLogLevel { level } => {
                        self.data.set_log_level(level);
                    }
                    Message::GetUSize { opt, tx } => {
                        let _ = tx.send(self.data.usize(opt));
                    }
                    Message::SetUSize { opt, size } => {
                        self.data.set_usize(opt, size);
                    }
                    Message::GetProviders { tx } => {
                        let _ = tx.send(self.data.providers());
                    }
                    Message::GetProvider { id, tx } => {
                        let _ = tx.send(self.data.provider(&id));
                    }
                    Message::SetProviders { providers } => {
                        self.data.set_providers(providers);
                    }
                }
            }
        });
        (Config::Actual(tx), handle)
    }

    /// Reads the configuration file, then applies environment overrides.
    ///
    /// Once the file parses its values are kept, even when an override is
    /// rejected afterwards.
    async fn load(&mut self) -> anyhow::Result<()> {
        let mut file = self
            .fs
            .read_file(self.path.clone())
            .await
            .with_context(|| format!("Opening config file {}", self.path.display()))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .await
            .context("Reading config file")?;
        self.data = toml::from_str(&contents).context("Parsing config file")?;

        if let Some(dir) = self.env.env_opt(CACHE_DIR_VAR).await {
            self.data
                .set_path(PathOpt::CacheDir, ArcPath::from(Path::new(&*dir)));
        }
        if let Some(level) = self.env.env_opt(LOG_LEVEL_VAR).await {
            let level = level
                .parse()
                .with_context(|| format!("Ignoring invalid {LOG_LEVEL_VAR}"))?;
            self.data.set_log_level(level);
        }
        Ok(())
    }

    /// Writes the current configuration, creating the parent directory if needed.
    async fn save(&self) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(&self.data).context("Serializing config")?;
        if let Some(parent) = self.path.parent() {
            self.fs
                .mkdir(ArcPath::from(parent))
                .await
                .context("Creating config directory")?;
        }
        let mut file = self
            .fs
            .write_file(self.path.clone())
            .await
            .with_context(|| format!("Creating config file {}", self.path.display()))?;
        file.write_all(contents.as_bytes())
            .await
            .context("Writing config file")?;
        file.flush().await.context("Flushing config file")?;
        Ok(())
    }
}
