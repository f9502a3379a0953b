use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    ArcPath, ArcStr,
    log::LogLevel,
    provider::{ProviderId, ProviderKind},
};

/// Options for path-based configuration values that can be accessed and modified.
#[derive(Debug, Clone, Copy)]
pub enum PathOpt {
    /// Directory where log files are stored
    LogDir,
    /// Directory holding one cache entry file per provider
    CacheDir,
}

/// Options for numeric configuration values that can be accessed and modified.
#[derive(Debug, Clone, Copy)]
pub enum USizeOpt {
    /// Maximum age of log files in days before they are deleted
    MaxAge,
    /// Timeout for network requests in seconds, 0 disables it
    Timeout,
    /// Lifetime of a cached feed in seconds
    CacheTtl,
    /// How many posts to request from a provider
    PostLimit,
}

fn enabled_by_default() -> bool {
    true
}

/// One configured provider instance.
///
/// `source` and `account` mean different things per kind: the instance URL
/// and account id for Mastodon, the feed URL for Atom, and the user name for
/// Hacker News.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Unique id, also the cache key
    pub id: ProviderId,
    /// Human readable name
    pub label: ArcStr,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub kind: ProviderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ArcStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<ArcStr>,
}

/// The configuration data structure that holds all configurable values.
///
/// Missing keys in a configuration file fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Data {
    /// Directory holding the feed cache
    cache_dir: ArcPath,
    /// Directory where log files are stored
    log_dir: ArcPath,
    /// Current log level
    log_level: LogLevel,
    /// Maximum age of log files in days before they are deleted
    max_age: usize,
    /// Timeout for network requests in seconds
    timeout: usize,
    /// Lifetime of a cached feed in seconds
    cache_ttl: usize,
    /// How many posts to request from a provider
    post_limit: usize,
    // Arrays of tables must come last in TOML
    providers: Vec<ProviderConfig>,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            cache_dir: ArcPath::from(Path::new("/tmp/social-feed/cache")),
            log_dir: ArcPath::from(Path::new("/tmp/social-feed/logs")),
            log_level: LogLevel::Warning,
            max_age: 0,
            timeout: 30,
            cache_ttl: 3600,
            post_limit: 20,
            providers: Vec::new(),
        }
    }
}

impl Data {
    pub fn path(&self, opt: PathOpt) -> ArcPath {
        match opt {
            PathOpt::LogDir => self.log_dir.clone(),
            PathOpt::CacheDir => self.cache_dir.clone(),
        }
    }

    pub fn set_path(&mut self, opt: PathOpt, path: ArcPath) {
        match opt {
            PathOpt::LogDir => self.log_dir = path,
            PathOpt::CacheDir => self.cache_dir = path,
        }
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn set_log_level(&mut self, level: LogLevel) {
        self.log_level = level;
    }

    pub fn usize(&self, opt: USizeOpt) -> usize {
        match opt {
            USizeOpt::MaxAge => self.max_age,
            USizeOpt::Timeout => self.timeout,
            USizeOpt::CacheTtl => self.cache_ttl,
            USizeOpt::PostLimit => self.post_limit,
        }
    }

    pub fn set_usize(&mut self, opt: USizeOpt, value: usize) {
        match opt {
            USizeOpt::MaxAge => self.max_age = value,
            USizeOpt::Timeout => self.timeout = value,
            USizeOpt::CacheTtl => self.cache_ttl = value,
            USizeOpt::PostLimit => self.post_limit = value,
        }
    }

    pub fn providers(&self) -> Vec<ProviderConfig> {
        self.providers.clone()
    }

    /// Looks a provider up by id.
    pub fn provider(&self, id: &ProviderId) -> Option<ProviderConfig> {
        self.providers.iter().find(|p| &p.id == id).cloned()
    }

    pub fn set_providers(&mut self, providers: Vec<ProviderConfig>) {
        self.providers = providers;
    }
}
