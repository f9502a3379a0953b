use std::env::VarError;

use super::{Env, core::Core};

#[tokio::test]
async fn test_mock_env_creation() {
    let env = Env::mock::<_, &str, &str>([]);
    assert!(matches!(env, Env::Mock(_)));
}

#[tokio::test]
async fn test_actual_env_creation() {
    let env = Env::spawn();
    assert!(matches!(env, Env::Actual(_)));
}

#[tokio::test]
async fn test_actual_env_reads_process_environment() {
    let env = Env::spawn();
    let path = env.env("PATH").await;
    assert_eq!(path.ok().as_deref(), std::env::var("PATH").ok().as_deref());

    let missing = env.env("SOCIAL_FEED_SURELY_UNSET_VARIABLE").await;
    assert!(matches!(missing, Err(VarError::NotPresent)));
}

#[tokio::test]
async fn test_mock_env_lookups() {
    let env = Env::mock([("HOME", "/home/feeds"), ("EMPTY", "")]);
    assert_eq!(&*env.env("HOME").await.unwrap(), "/home/feeds");
    assert!(matches!(env.env("USER").await, Err(VarError::NotPresent)));
    assert_eq!(&*env.env("EMPTY").await.unwrap(), "");
}

#[tokio::test]
async fn test_env_opt_treats_empty_as_absent() {
    let env = Env::mock([("HOME", "/home/feeds"), ("EMPTY", "")]);
    assert!(env.env_opt("EMPTY").await.is_none());
    assert!(env.env_opt("USER").await.is_none());
    assert_eq!(env.env_opt("HOME").await.as_deref(), Some("/home/feeds"));
}

#[tokio::test]
async fn test_core_get_env() {
    let core = Core::new();
    let (tx, rx) = tokio::sync::oneshot::channel();
    core.get_env(tx, "SOCIAL_FEED_SURELY_UNSET_VARIABLE".into());
    assert!(matches!(rx.await.unwrap(), Err(VarError::NotPresent)));
}
