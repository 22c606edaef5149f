use std::path::PathBuf;
use std::str::FromStr;

/// Where the approved manifest is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaselineLocation {
    /// Fetched over HTTP; a 404 means "not published yet".
    Url(String),
    /// Read from disk; a missing file means "not published yet".
    Path(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub baseline: BaselineLocation,
    /// Extraction result the roster is generated from when no baseline exists.
    pub roster_source_path: PathBuf,
    /// Directory holding the persisted draft blobs.
    pub draft_dir: PathBuf,
    /// Fixed seed for random fill. Unset means seeded from the OS.
    pub random_seed: Option<u64>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                              |
    /// |------------------------|--------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                            |
    /// | `PORT`                 | `3000`                               |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`              |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                 |
    /// | `BASELINE_URL`         | unset (takes precedence when set)    |
    /// | `BASELINE_PATH`        | `data/bus_manifest_approved.json`    |
    /// | `ROSTER_SOURCE_PATH`   | `data/participants.json`             |
    /// | `DRAFT_DIR`            | `data/draft`                         |
    /// | `RANDOM_SEED`          | unset                                |
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env_or("HOST", "0.0.0.0");
        let port = parse_env("PORT", "3000", "u16")?;

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse_env("REQUEST_TIMEOUT_SECS", "30", "u64")?;

        let baseline = match non_empty_env("BASELINE_URL") {
            Some(url) => BaselineLocation::Url(url),
            None => BaselineLocation::Path(
                env_or("BASELINE_PATH", "data/bus_manifest_approved.json").into(),
            ),
        };

        let roster_source_path = env_or("ROSTER_SOURCE_PATH", "data/participants.json").into();
        let draft_dir = env_or("DRAFT_DIR", "data/draft").into();

        let random_seed = non_empty_env("RANDOM_SEED")
            .map(|value| {
                value.parse().map_err(|_| ConfigError::Invalid {
                    name: "RANDOM_SEED",
                    expected: "u64",
                    value,
                })
            })
            .transpose()?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            baseline,
            roster_source_path,
            draft_dir,
            random_seed,
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: FromStr>(
    name: &'static str,
    default: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    let value = env_or(name, default);
    value
        .parse()
        .map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        })
}
