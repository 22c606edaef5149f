//! Draft store backed by one JSON file per key.
//!
//! Reads go through `tokio::fs`; writes run the fsync'd write-then-rename on
//! the blocking pool so the runtime threads never wait on the disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use busmanifest_core::error::SourceError;
use busmanifest_core::sources::DraftStore;

use crate::atomic_write::atomic_write;
use crate::error::StorageError;

/// Stores each draft blob as `{dir}/{key}.json`.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    dir: PathBuf,
}

impl FileDraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    async fn write_blob(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let bytes = value.as_bytes().to_vec();
        let len = bytes.len();

        let target = path.clone();
        tokio::task::spawn_blocking(move || atomic_write(&target, &bytes)).await??;

        tracing::debug!(path = %path.display(), bytes = len, "Wrote draft blob");
        Ok(())
    }
}

#[async_trait]
impl DraftStore for FileDraftStore {
    async fn read(&self, key: &str) -> Result<Option<String>, SourceError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::from(err).into()),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), SourceError> {
        Ok(self.write_blob(key, value).await?)
    }
}
