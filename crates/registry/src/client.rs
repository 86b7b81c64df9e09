use std::time::Duration;

use skillsync_config::RegistryConfig;

use crate::error::{Result, SyncError};

/// Shared HTTP client for manifest and file requests.
pub fn build_client(registry: &RegistryConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(registry.user_agent.as_str());
    if registry.timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(registry.timeout_secs));
    }
    builder.build().map_err(SyncError::Client)
}
