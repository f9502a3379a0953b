use std::{
    collections::LinkedList,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use tempfile::TempDir;
use tokio::fs::File;

use super::core::{list_dir, open_append, open_truncate};
use crate::{ArcFile, ArcPath};

/// Mock implementation of the Fs actor for testing purposes.
///
/// Every path, absolute or relative, is resolved inside a temporary directory
/// that lives as long as the last clone of the mock.
#[derive(Debug, Clone)]
pub struct Mock {
    root: Arc<TempDir>,
}

impl Mock {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir for Fs mock");
        Self {
            root: Arc::new(root),
        }
    }

    fn mock_path(&self, path: &Path) -> PathBuf {
        let relative = path.strip_prefix("/").unwrap_or(path);
        self.root.path().join(relative)
    }

    pub async fn open_file(&self, path: ArcPath) -> Result<ArcFile, io::Error> {
        open_append(&self.mock_path(&path)).await
    }

    pub async fn read_file(&self, path: ArcPath) -> Result<File, io::Error> {
        File::open(self.mock_path(&path)).await
    }

    pub async fn write_file(&self, path: ArcPath) -> Result<File, io::Error> {
        open_truncate(&self.mock_path(&path)).await
    }

    pub async fn remove_file(&self, path: ArcPath) -> Result<(), io::Error> {
        tokio::fs::remove_file(self.mock_path(&path)).await
    }

    /// Lists a directory, reporting entries under the path the caller used
    /// rather than the temporary root.
    pub async fn read_dir(&self, path: ArcPath) -> Result<LinkedList<ArcPath>, io::Error> {
        list_dir(&self.mock_path(&path), &path).await
    }

    pub async fn mkdir(&self, path: ArcPath) -> Result<(), io::Error> {
        tokio::fs::create_dir_all(self.mock_path(&path)).await
    }
}
