use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that end a synchronization pass.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("registry unreachable at {url}: {reason}")]
    UnreachableRegistry { url: String, reason: String },

    #[error("malformed manifest: {reason}")]
    MalformedManifest { reason: String },

    #[error("invalid registry URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error(transparent)]
    Marker(#[from] WriteError),
}

impl SyncError {
    #[must_use]
    pub fn unreachable(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::UnreachableRegistry {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedManifest {
            reason: reason.into(),
        }
    }
}

/// Failure to retrieve one remote file. Network-level errors carry no status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub status: Option<u16>,
    pub message: String,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(code) => write!(f, "HTTP {code}"),
            None => write!(f, "request failed: {}", self.message),
        }
    }
}

impl std::error::Error for FetchError {}

impl FetchError {
    #[must_use]
    pub fn status(code: u16) -> Self {
        Self {
            status: Some(code),
            message: format!("HTTP {code}"),
        }
    }

    #[must_use]
    pub fn network(message: impl std::fmt::Display) -> Self {
        Self {
            status: None,
            message: message.to_string(),
        }
    }
}

/// Failure to persist bytes under the target root.
#[derive(Debug, Error)]
#[error("failed to write {}: {source}", path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl WriteError {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
