use std::path::Path;

use chrono::TimeDelta;
use tokio::io::AsyncWriteExt;

use super::*;

const HOUR: Duration = Duration::from_secs(3600);

fn cache_dir() -> ArcPath {
    ArcPath::from(Path::new("/var/cache/social-feed"))
}

async fn file_store(fs: &Fs, ttl: Duration) -> Store {
    Store::spawn(fs.clone(), Log::mock(), cache_dir(), ttl)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_file_store_set_get_remove() {
    let store = file_store(&Fs::mock(), HOUR).await;
    assert!(matches!(store, Store::Actual(_)));

    assert_eq!(store.get("feed:blog".into()).await, None);
    assert!(store.set("feed:blog".into(), "[1]".into()).await);
    assert_eq!(store.get("feed:blog".into()).await.as_deref(), Some("[1]"));

    assert!(store.set("feed:blog".into(), "[2]".into()).await);
    assert_eq!(store.get("feed:blog".into()).await.as_deref(), Some("[2]"));

    assert!(store.remove("feed:blog".into()).await);
    assert_eq!(store.get("feed:blog".into()).await, None);
    assert!(store.remove("feed:blog".into()).await);
}

#[tokio::test]
async fn test_file_store_persists_between_actors() {
    let fs = Fs::mock();
    let first = file_store(&fs, HOUR).await;
    assert!(first.set("feed:blog".into(), "[1]".into()).await);
    let written = first.metadata("feed:blog".into()).await.unwrap();

    let second = file_store(&fs, HOUR).await;
    assert_eq!(second.get("feed:blog".into()).await.as_deref(), Some("[1]"));
    assert_eq!(second.metadata("feed:blog".into()).await, Some(written));
    assert_eq!(written.expire - written.created, TimeDelta::hours(1));
}

#[tokio::test]
async fn test_file_store_keys_are_encoded() {
    let fs = Fs::mock();
    let store = file_store(&fs, HOUR).await;
    assert!(store.set("feed:a/../b%".into(), "x".into()).await);

    let files = fs.read_dir(cache_dir()).await.unwrap();
    let names: Vec<_> = files
        .iter()
        .filter_map(|path| path.file_name()?.to_str().map(str::to_owned))
        .collect();
    assert_eq!(names, ["feed%3Aa%2F..%2Fb%25.toml"]);
    assert_eq!(store.get("feed:a/../b%".into()).await.as_deref(), Some("x"));
}

#[tokio::test]
async fn test_file_store_similar_keys_keep_separate_entries() {
    let fs = Fs::mock();
    let store = file_store(&fs, HOUR).await;
    assert!(store.set("a_b".into(), "[\"underscore\"]".into()).await);
    assert!(store.set("a:b".into(), "[\"colon\"]".into()).await);
    assert_eq!(fs.read_dir(cache_dir()).await.unwrap().len(), 2);

    let reopened = file_store(&fs, HOUR).await;
    assert_eq!(
        reopened.get("a_b".into()).await.as_deref(),
        Some("[\"underscore\"]")
    );
    assert_eq!(reopened.get("a:b".into()).await.as_deref(), Some("[\"colon\"]"));

    assert!(store.remove("a:b".into()).await);
    let reopened = file_store(&fs, HOUR).await;
    assert_eq!(reopened.get("a:b".into()).await, None);
    assert_eq!(
        reopened.get("a_b".into()).await.as_deref(),
        Some("[\"underscore\"]")
    );
}

#[tokio::test]
async fn test_file_store_remove_keeps_files_of_other_keys() {
    let fs = Fs::mock();
    let store = file_store(&fs, HOUR).await;

    // An entry file whose stored key does not match the key it is found under
    let path = ArcPath::from(cache_dir().join("feed%3Ablog.toml"));
    let foreign = Entry::new("feed:other".into(), "[]".into(), TimeDelta::hours(1));
    let mut file = fs.write_file(path.clone()).await.unwrap();
    file.write_all(toml::to_string(&foreign).unwrap().as_bytes())
        .await
        .unwrap();
    file.flush().await.unwrap();

    assert_eq!(store.get("feed:blog".into()).await, None);
    assert!(store.remove("feed:blog".into()).await);
    assert!(fs.read_dir(cache_dir()).await.unwrap().contains(&path));
}

#[tokio::test]
async fn test_file_store_zero_ttl_is_immediately_stale() {
    let store = file_store(&Fs::mock(), Duration::ZERO).await;
    assert!(store.set("feed:blog".into(), "[1]".into()).await);
    assert_eq!(store.get("feed:blog".into()).await, None);
    assert_eq!(store.metadata("feed:blog".into()).await, None);
}

#[tokio::test]
async fn test_file_store_malformed_entry_reads_as_absent() {
    let fs = Fs::mock();
    let store = file_store(&fs, HOUR).await;

    let path = ArcPath::from(cache_dir().join("feed%3Ablog.toml"));
    let mut file = fs.write_file(path).await.unwrap();
    file.write_all(b"this is = = not toml").await.unwrap();
    file.flush().await.unwrap();

    assert_eq!(store.get("feed:blog".into()).await, None);
}

#[tokio::test]
async fn test_file_store_clear_expired() {
    let fs = Fs::mock();
    let stale = file_store(&fs, Duration::ZERO).await;
    assert!(stale.set("feed:old".into(), "[]".into()).await);
    assert!(stale.set("feed:older".into(), "[]".into()).await);

    let fresh = file_store(&fs, HOUR).await;
    assert!(fresh.set("feed:new".into(), "[]".into()).await);

    assert_eq!(fresh.clear_expired().await, 2);
    assert_eq!(fresh.clear_expired().await, 0);
    assert_eq!(fresh.get("feed:new".into()).await.as_deref(), Some("[]"));
    assert_eq!(fs.read_dir(cache_dir()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_mock_store_honors_ttl() {
    let store = Store::mock(
        MockData::default()
            .with_entry("fresh", "[1]", TimeDelta::minutes(5))
            .with_entry("stale", "[2]", TimeDelta::minutes(-5)),
    );

    assert_eq!(store.get("fresh".into()).await.as_deref(), Some("[1]"));
    assert_eq!(store.get("stale".into()).await, None);
    assert!(store.metadata("fresh".into()).await.is_some());

    assert!(store.set("new".into(), "[3]".into()).await);
    assert_eq!(store.clear_expired().await, 0);
    assert!(store.remove("new".into()).await);
    assert_eq!(store.get("new".into()).await, None);
}

#[tokio::test]
async fn test_mock_store_write_failure() {
    let data = MockData {
        writable: false,
        ..MockData::default()
    };
    let store = Store::mock(data);
    assert!(!store.set("feed".into(), "[]".into()).await);
    assert_eq!(store.get("feed".into()).await, None);
}
