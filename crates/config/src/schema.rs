/// Config schema types (registry endpoints, transfer limits, install target).
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default location of the published registry manifest.
pub const DEFAULT_MANIFEST_URL: &str = "https://registry.skillsync.dev/manifest.json";

/// Default base location that manifest file paths are joined onto.
pub const DEFAULT_BASE_URL: &str = "https://registry.skillsync.dev/files/";

/// Maximum number of file transfers in flight during a pass.
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 10;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsyncConfig {
    pub registry: RegistryConfig,
    pub install: InstallConfig,
}

/// Remote registry endpoints and transfer tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// URL of the manifest document.
    pub manifest_url: String,
    /// Base URL for file content. Manifest paths are resolved against it.
    pub base_url: String,
    /// Maximum number of concurrent file fetches.
    pub concurrency_limit: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            manifest_url: DEFAULT_MANIFEST_URL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            timeout_secs: 30,
            user_agent: concat!("skillsync/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

/// Local installation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Directory the registry files are installed into. Defaults to
    /// `<data dir>/skills` when unset.
    pub target_dir: Option<PathBuf>,
    pub marker_policy: MarkerPolicy,
}

/// When the local version marker advances after a transfer pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerPolicy {
    /// Record the new version once every transfer unit has finished, even if
    /// some of them failed.
    #[default]
    AlwaysAdvance,
    /// Keep the previous version unless every file was installed.
    RequireFullSuccess,
}

impl std::fmt::Display for MarkerPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlwaysAdvance => write!(f, "always-advance"),
            Self::RequireFullSuccess => write!(f, "require-full-success"),
        }
    }
}
