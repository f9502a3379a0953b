use std::path::Path;

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::*;

#[tokio::test]
async fn test_fs_write_then_read() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = ArcPath::from(temp_dir.path().join("entry.toml"));
    let fs = Fs::spawn();

    let mut file = fs.write_file(path.clone()).await.unwrap();
    file.write_all(b"payload = \"[]\"").await.unwrap();
    file.flush().await.unwrap();

    let mut contents = String::new();
    fs.read_file(path.clone())
        .await
        .unwrap()
        .read_to_string(&mut contents)
        .await
        .unwrap();
    assert_eq!(contents, "payload = \"[]\"");

    fs.remove_file(path.clone()).await.unwrap();
    let result = fs.read_file(path).await;
    assert!(matches!(result, Err(e) if e.kind() == io::ErrorKind::NotFound));
}

#[tokio::test]
async fn test_fs_write_truncates() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = ArcPath::from(temp_dir.path().join("entry.toml"));
    let fs = Fs::spawn();

    let mut file = fs.write_file(path.clone()).await.unwrap();
    file.write_all(b"a much longer first version").await.unwrap();
    file.flush().await.unwrap();
    let mut file = fs.write_file(path.clone()).await.unwrap();
    file.write_all(b"short").await.unwrap();
    file.flush().await.unwrap();

    let mut contents = String::new();
    fs.read_file(path)
        .await
        .unwrap()
        .read_to_string(&mut contents)
        .await
        .unwrap();
    assert_eq!(contents, "short");
}

#[tokio::test]
async fn test_fs_mkdir_and_read_dir() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = ArcPath::from(temp_dir.path().join("nested").join("cache"));
    let fs = Fs::spawn();

    fs.mkdir(dir.clone()).await.unwrap();
    assert!(fs.read_dir(dir.clone()).await.unwrap().is_empty());

    let file = ArcPath::from(dir.join("a.toml"));
    fs.open_file(file.clone()).await.unwrap();
    let entries = fs.read_dir(dir).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries.contains(&file));
}

#[tokio::test]
async fn test_mock_resolves_absolute_paths_in_temp_root() {
    let fs = Fs::mock();
    let dir = ArcPath::from(Path::new("/var/cache/social-feed"));

    fs.mkdir(dir.clone()).await.unwrap();
    let file = ArcPath::from(dir.join("main.toml"));
    let mut handle = fs.write_file(file.clone()).await.unwrap();
    handle.write_all(b"x").await.unwrap();
    handle.flush().await.unwrap();

    let entries = fs.read_dir(dir).await.unwrap();
    assert_eq!(entries.front(), Some(&file));
    fs.remove_file(file).await.unwrap();
}
