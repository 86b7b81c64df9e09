use serde::{Deserialize, Serialize};

// ── Registry manifest ────────────────────────────────────────────────────────

/// A published registry release: the flat list of files that should exist
/// locally and the digest each one must match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub name: Option<String>,
    /// Opaque release identifier. Compared for equality only.
    pub version: String,
    pub release_date: Option<String>,
    pub repository: Option<String>,
    pub files: Vec<ManifestFile>,
}

impl Manifest {
    pub fn find_file(&self, path: &str) -> Option<&ManifestFile> {
        self.files.iter().find(|f| f.path == path)
    }
}

/// One file entry of a [`Manifest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFile {
    /// Relative, `/`-separated path. Unique within its manifest.
    pub path: String,
    /// Lowercase hex SHA-256 of the exact bytes to install.
    pub sha256: String,
    /// Declared size in bytes, when the publisher supplied one.
    pub size: Option<u64>,
}

// ── Transfer results ─────────────────────────────────────────────────────────

/// Why a single file was not installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    HttpError,
    HashMismatch,
    WriteError,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpError => write!(f, "http-error"),
            Self::HashMismatch => write!(f, "hash-mismatch"),
            Self::WriteError => write!(f, "write-error"),
        }
    }
}

/// Result of one per-file transfer unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOutcome {
    pub path: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<FailureReason>,
    /// Human-readable detail for failures (status code, io error, digest).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl TransferOutcome {
    pub fn installed(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            success: true,
            failure_reason: None,
            detail: None,
        }
    }

    pub fn failed(path: impl Into<String>, reason: FailureReason, detail: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            success: false,
            failure_reason: Some(reason),
            detail: Some(detail.into()),
        }
    }
}

/// Summary of one synchronization pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub version_before: Option<String>,
    /// Version recorded in the local marker once the pass finished.
    pub version_after: String,
    pub outcomes: Vec<TransferOutcome>,
}

impl SyncReport {
    /// `true` when the pass short-circuited because nothing changed.
    pub fn is_up_to_date(&self) -> bool {
        self.outcomes.is_empty() && self.version_before.as_deref() == Some(self.version_after.as_str())
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &TransferOutcome> {
        self.outcomes.iter().filter(|o| o.success)
    }

    pub fn failed(&self) -> impl Iterator<Item = &TransferOutcome> {
        self.outcomes.iter().filter(|o| !o.success)
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| !o.success)
    }
}
