//! Library entry point for the social-feed crate.
//!
//! Fetches posts from social providers, normalizes them into [`provider::Post`]s
//! and serves them through a time-limited cache. Every stateful component is
//! an actor; see [`feed::Feed`] for the cache-first retrieval flow.

pub mod cache;
pub mod config;
pub mod env;
pub mod feed;
pub mod fs;
pub mod log;
pub mod net;
pub mod provider;
pub mod store;
pub mod utils;

pub use utils::*;

/// Default channel buffer size used by the actors.
pub const BUFFER_SIZE: usize = 128;
