use std::path::Path;

use anyhow::Result;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::*;
use crate::provider::ProviderKind;

fn config_path() -> ArcPath {
    ArcPath::from(Path::new("/home/user/.config/social-feed/config.toml"))
}

async fn write_sample(fs: &Fs) -> Result<()> {
    let path = config_path();
    fs.mkdir(ArcPath::from(path.parent().unwrap())).await?;
    let mut file = fs.write_file(path).await?;
    file.write_all(include_str!("../../samples/config.toml").as_bytes())
        .await?;
    file.flush().await?;
    Ok(())
}

async fn read_config(fs: &Fs) -> Result<String> {
    let mut contents = String::new();
    fs.read_file(config_path())
        .await?
        .read_to_string(&mut contents)
        .await?;
    Ok(contents)
}

#[tokio::test]
async fn test_mock_config_creation() {
    let config = Config::mock(Data::default());
    assert!(matches!(config, Config::Mock(_)));
}

#[tokio::test]
async fn test_mock_config_load_save_are_noops() -> Result<()> {
    let config = Config::mock(Data::default());
    config.load().await?;
    config.save().await?;
    assert_eq!(config.usize(USizeOpt::CacheTtl).await, 3600);
    Ok(())
}

#[tokio::test]
async fn test_mock_setters_and_getters() {
    let config = Config::mock(Data::default());

    let new_path = ArcPath::from(Path::new("/custom/cache"));
    config.set_path(PathOpt::CacheDir, new_path.clone()).await;
    assert_eq!(config.path(PathOpt::CacheDir).await, new_path);

    config.set_log_level(LogLevel::Info).await;
    assert_eq!(config.log_level().await, LogLevel::Info);

    config.set_usize(USizeOpt::PostLimit, 5).await;
    assert_eq!(config.usize(USizeOpt::PostLimit).await, 5);
}

#[tokio::test]
async fn test_actual_config_loads_sample_file() -> Result<()> {
    let fs = Fs::mock();
    write_sample(&fs).await?;
    let config = Config::spawn(Env::mock::<_, &str, &str>([]), fs, config_path());

    config.load().await?;

    assert_eq!(config.usize(USizeOpt::CacheTtl).await, 900);
    assert_eq!(config.usize(USizeOpt::PostLimit).await, 10);
    assert_eq!(config.usize(USizeOpt::Timeout).await, 15);

    let providers = config.providers().await;
    let ids: Vec<_> = providers.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["fosstodon", "rust-blog", "hn-pg"]);

    let hn = config.provider("hn-pg".into()).await.unwrap();
    assert!(!hn.enabled);
    assert_eq!(hn.kind, ProviderKind::HackerNews);
    assert_eq!(hn.account.as_deref(), Some("pg"));
    assert!(config.provider("nope".into()).await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_actual_config_applies_env_overrides() -> Result<()> {
    let fs = Fs::mock();
    write_sample(&fs).await?;
    let env = Env::mock([(CACHE_DIR_VAR, "/var/cache/feeds"), (LOG_LEVEL_VAR, "error")]);
    let config = Config::spawn(env, fs, config_path());

    config.load().await?;

    assert_eq!(
        config.path(PathOpt::CacheDir).await,
        ArcPath::from(Path::new("/var/cache/feeds"))
    );
    assert_eq!(config.log_level().await, LogLevel::Error);
    Ok(())
}

#[tokio::test]
async fn test_actual_config_rejects_bad_log_level_override() -> Result<()> {
    let fs = Fs::mock();
    write_sample(&fs).await?;
    let env = Env::mock([(LOG_LEVEL_VAR, "chatty")]);
    let config = Config::spawn(env, fs, config_path());

    assert!(config.load().await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_actual_config_keeps_file_values_on_bad_override() -> Result<()> {
    let fs = Fs::mock();
    write_sample(&fs).await?;
    let env = Env::mock([(LOG_LEVEL_VAR, "chatty")]);
    let config = Config::spawn(env, fs.clone(), config_path());

    assert!(config.load_or_init().await.is_err());

    assert_eq!(config.providers().await.len(), 3);
    assert_eq!(config.log_level().await, LogLevel::Warning);
    assert_eq!(config.usize(USizeOpt::CacheTtl).await, 900);
    let on_disk = read_config(&fs).await?;
    assert_eq!(on_disk, include_str!("../../samples/config.toml"));
    Ok(())
}

#[tokio::test]
async fn test_actual_config_init_does_not_overwrite_broken_file() -> Result<()> {
    let fs = Fs::mock();
    let path = config_path();
    fs.mkdir(ArcPath::from(path.parent().unwrap())).await?;
    let mut file = fs.write_file(path).await?;
    file.write_all(b"cache_ttl = [").await?;
    file.flush().await?;
    let config = Config::spawn(Env::mock::<_, &str, &str>([]), fs.clone(), config_path());

    assert!(config.load_or_init().await.is_err());
    assert_eq!(read_config(&fs).await?, "cache_ttl = [");
    Ok(())
}

#[tokio::test]
async fn test_actual_config_init_writes_defaults_without_file() -> Result<()> {
    let fs = Fs::mock();
    let config = Config::spawn(Env::mock::<_, &str, &str>([]), fs.clone(), config_path());

    config.load_or_init().await?;

    let saved: Data = toml::from_str(&read_config(&fs).await?)?;
    assert_eq!(saved.usize(USizeOpt::CacheTtl), 3600);
    assert!(saved.providers().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_actual_config_load_fails_without_file() {
    let config = Config::spawn(Env::mock::<_, &str, &str>([]), Fs::mock(), config_path());
    assert!(config.load().await.is_err());
}

#[tokio::test]
async fn test_actual_config_save_then_load() -> Result<()> {
    let fs = Fs::mock();
    let config = Config::spawn(Env::mock::<_, &str, &str>([]), fs.clone(), config_path());
    config.set_usize(USizeOpt::CacheTtl, 42).await;
    config
        .set_providers(vec![ProviderConfig {
            id: "blog".into(),
            label: "Blog".into(),
            enabled: true,
            kind: ProviderKind::Atom,
            source: Some("https://blog.example/atom.xml".into()),
            account: None,
        }])
        .await;
    config.save().await?;

    let mut contents = String::new();
    fs.read_file(config_path())
        .await?
        .read_to_string(&mut contents)
        .await?;
    assert!(contents.contains("cache_ttl = 42"));

    let reloaded = Config::spawn(Env::mock::<_, &str, &str>([]), fs, config_path());
    reloaded.load().await?;
    assert_eq!(reloaded.usize(USizeOpt::CacheTtl).await, 42);
    assert_eq!(reloaded.providers().await.len(), 1);
    Ok(())
}
