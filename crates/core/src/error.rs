#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The manifest has not finished bootstrapping (or bootstrap failed).
    #[error("Not ready: {0}")]
    NotReady(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures reported by the external collaborators: the baseline source,
/// the roster generator and the draft store.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The remote side answered with a status other than 200 or 404.
    #[error("HTTP {0}")]
    Status(u16),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("I/O failure: {0}")]
    Io(String),

    #[error("malformed data: {0}")]
    Malformed(String),
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
