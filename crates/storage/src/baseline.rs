//! Where the approved manifest document is published.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use busmanifest_core::error::SourceError;
use busmanifest_core::sources::{BaselineFetch, BaselineSource};
use reqwest::StatusCode;

use crate::error::StorageError;

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// Fetches the approved manifest with a `GET` to a fixed URL.
///
/// `200` yields the body, `404` means no baseline has been published, and
/// any other status is an error.
pub struct HttpBaselineSource {
    client: reqwest::Client,
    url: String,
}

impl HttpBaselineSource {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }

    async fn fetch_inner(&self) -> Result<BaselineFetch, StorageError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(BaselineFetch::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(BaselineFetch::Found(response.text().await?))
    }
}

#[async_trait]
impl BaselineSource for HttpBaselineSource {
    async fn fetch(&self) -> Result<BaselineFetch, SourceError> {
        tracing::debug!(url = %self.url, "Fetching approved manifest");
        Ok(self.fetch_inner().await?)
    }
}

// ---------------------------------------------------------------------------
// File
// ---------------------------------------------------------------------------

/// Reads the approved manifest from a local file. A missing file means no
/// baseline has been published.
pub struct FileBaselineSource {
    path: PathBuf,
}

impl FileBaselineSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BaselineSource for FileBaselineSource {
    async fn fetch(&self) -> Result<BaselineFetch, SourceError> {
        tracing::debug!(path = %self.path.display(), "Reading approved manifest");
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(BaselineFetch::Found(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BaselineFetch::NotFound),
            Err(err) => Err(StorageError::from(err).into()),
        }
    }
}
