use busmanifest_core::error::SourceError;

/// Errors from the storage adapters.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with an unexpected status code.
    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A blocking file task panicked or was cancelled.
    #[error("Blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<StorageError> for SourceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Status { status, .. } => SourceError::Status(status),
            StorageError::Request(e) => SourceError::Transport(e.to_string()),
            StorageError::Io(e) => SourceError::Io(e.to_string()),
            StorageError::Json(e) => SourceError::Malformed(e.to_string()),
            StorageError::Task(e) => SourceError::Io(e.to_string()),
        }
    }
}
