use std::{path::Path, time::Duration};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use social_feed::{
    ArcPath,
    cache::FeedCache,
    config::{Config, PathOpt, ProviderConfig, USizeOpt},
    env::Env,
    feed::{Feed, REFRESH_LEAD},
    fs::Fs,
    log::Log,
    net::Net,
    provider::{
        FeedFetcher, Post, PostExtractor, ProviderId, ProviderKind,
        atom::{AtomExtractor, AtomFetcher},
        hacker_news::{HackerNewsExtractor, HackerNewsFetcher},
        mastodon::{MastodonExtractor, MastodonFetcher},
    },
    store::Store,
};

const SCOPE: &str = "main";

#[derive(Parser)]
#[command(name = "social-feed")]
#[command(about = "Fetch, normalize and cache social media feeds")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a provider's posts, from the cache when it is fresh
    Feed {
        /// The provider id from the configuration file
        #[arg(required = true)]
        id: String,
        /// Print the normalized posts as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch a provider's posts and replace its cache entry
    Refresh {
        #[arg(required = true)]
        id: String,
    },
    /// Drop a provider's cache entry
    Clear {
        #[arg(required = true)]
        id: String,
    },
    /// Show when a provider's cache entry expires
    Expiry {
        #[arg(required = true)]
        id: String,
    },
    /// List the configured providers
    Providers,
    /// Drop every expired cache entry
    Sweep,
}

/// What to do with a single provider's feed
enum Action {
    Show { json: bool },
    Refresh,
    Clear,
    Expiry,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize actors
    let env = Env::spawn();
    let fs = Fs::spawn();

    let home = env.env("HOME").await.context("Reading $HOME")?;
    let config_path = Path::new(&*home)
        .join(".config")
        .join("social-feed")
        .join("config.toml");

    let config = Config::spawn(env.clone(), fs.clone(), ArcPath::from(config_path.as_path()));
    if let Err(err) = config.load_or_init().await {
        eprintln!("Configuration problem: {err:#}");
    }

    let log = Log::spawn(
        fs.clone(),
        config.log_level().await,
        config.usize(USizeOpt::MaxAge).await,
        config.path(PathOpt::LogDir).await,
    )
    .await?;
    log.collect_garbage().await;
    log.info(SCOPE, "Starting social-feed");

    let store = Store::spawn(
        fs.clone(),
        log.clone(),
        config.path(PathOpt::CacheDir).await,
        Duration::from_secs(config.usize(USizeOpt::CacheTtl).await as u64),
    )
    .await?;
    let cache = FeedCache::new(store, log.clone());
    let net = Net::spawn(config.clone(), log.clone()).await;

    let res = match cli.command {
        Commands::Feed { id, json } => {
            handle_feed_command(&config, &net, &cache, &log, id, Action::Show { json }).await
        }
        Commands::Refresh { id } => {
            handle_feed_command(&config, &net, &cache, &log, id, Action::Refresh).await
        }
        Commands::Clear { id } => {
            handle_feed_command(&config, &net, &cache, &log, id, Action::Clear).await
        }
        Commands::Expiry { id } => {
            handle_feed_command(&config, &net, &cache, &log, id, Action::Expiry).await
        }
        Commands::Providers => handle_providers_command(&config).await,
        Commands::Sweep => {
            let removed = cache.sweep().await;
            println!("Removed {removed} expired cache entries");
            Ok(())
        }
    };

    let res = log.error_on_error(SCOPE, res);
    log.flush().await.context("Flushing log")?;
    res
}

/// Handle the providers command to list configured providers
async fn handle_providers_command(config: &Config) -> anyhow::Result<()> {
    let providers = config.providers().await;
    if providers.is_empty() {
        println!("No providers configured");
        return Ok(());
    }

    for provider in providers {
        let state = if provider.enabled { "enabled" } else { "disabled" };
        println!(
            "{} - {} ({}, {})",
            provider.id, provider.label, provider.kind, state
        );
    }
    Ok(())
}

/// Builds the feed of the configured provider `id` and runs `action` on it
async fn handle_feed_command(
    config: &Config,
    net: &Net,
    cache: &FeedCache,
    log: &Log,
    id: String,
    action: Action,
) -> anyhow::Result<()> {
    let id = ProviderId::new(id);
    let Some(provider) = config.provider(id.clone()).await else {
        bail!("No provider with id {id} in the configuration");
    };
    if !provider.enabled && matches!(action, Action::Show { .. } | Action::Refresh) {
        bail!("Provider {id} is disabled");
    }

    let limit = config.usize(USizeOpt::PostLimit).await;
    let net = net.clone();
    match provider.kind {
        ProviderKind::Mastodon => {
            let fetcher = MastodonFetcher::from_config(net, &provider, limit)?;
            run(feed(&provider, fetcher, MastodonExtractor, cache, log), action).await
        }
        ProviderKind::Atom => {
            let fetcher = AtomFetcher::from_config(net, &provider, limit)?;
            run(feed(&provider, fetcher, AtomExtractor, cache, log), action).await
        }
        ProviderKind::HackerNews => {
            let fetcher = HackerNewsFetcher::from_config(net, &provider, limit)?;
            run(feed(&provider, fetcher, HackerNewsExtractor, cache, log), action).await
        }
    }
}

fn feed<F, E>(
    provider: &ProviderConfig,
    fetcher: F,
    extractor: E,
    cache: &FeedCache,
    log: &Log,
) -> Feed<F, E>
where
    F: FeedFetcher,
    E: PostExtractor<F::Raw>,
{
    let hook_log = log.clone();
    Feed::new(
        provider.id.clone(),
        fetcher,
        extractor,
        cache.clone(),
        log.clone(),
    )
    .with_refresh_hook(move |notice| {
        hook_log.info(
            SCOPE,
            format!(
                "{} cached until {}, next refresh due at {}",
                notice.provider,
                notice.expires_at,
                notice.refresh_at(REFRESH_LEAD)
            ),
        );
    })
}

async fn run<F, E>(feed: Feed<F, E>, action: Action) -> anyhow::Result<()>
where
    F: FeedFetcher,
    E: PostExtractor<F::Raw>,
{
    match action {
        Action::Show { json } => {
            let posts = feed.get_feed().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&posts)?);
            } else {
                print_posts(&posts);
            }
        }
        Action::Refresh => {
            let posts = feed.refresh().await?;
            println!("Fetched {} posts for {}", posts.len(), feed.id());
        }
        Action::Clear => {
            if !feed.clear_cache().await {
                bail!("Failed to clear the cache of {}", feed.id());
            }
            println!("Cleared the cache of {}", feed.id());
        }
        Action::Expiry => match feed.cache_expiry().await {
            Some(expiry) => println!(
                "{} expires at {}",
                feed.id(),
                expiry.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            None => println!("{} is not cached", feed.id()),
        },
    }
    Ok(())
}

fn print_posts(posts: &[Post]) {
    if posts.is_empty() {
        println!("No posts");
        return;
    }

    for (i, post) in posts.iter().enumerate() {
        println!("{}. {}", i + 1, post.user_name);
        println!("   Date: {}", post.created.format("%Y-%m-%d %H:%M:%S UTC"));
        println!("   Link: {}", post.url);
        if let Some(image) = &post.image {
            println!("   Image: {image}");
        }
        for line in post.content.lines() {
            println!("   {line}");
        }
        println!();
    }
}
