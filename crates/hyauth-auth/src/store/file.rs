//! File-backed account store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::AuthError;
use crate::snapshot::Snapshot;

use super::AccountStore;

/// Store that reads the JSON users file on every load.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store for the given users file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the users file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AccountStore for FileStore {
    async fn load_all(&self) -> Result<Snapshot, AuthError> {
        let data = tokio::fs::read(&self.path).await?;
        Snapshot::from_json_slice(&data)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}
