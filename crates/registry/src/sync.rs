//! One synchronization pass: manifest → version check → bounded transfers →
//! version marker.

use std::{path::PathBuf, sync::Arc};

use {
    skillsync_config::{MarkerPolicy, SkillsyncConfig},
    tokio::sync::Semaphore,
    tracing::{debug, info, warn},
};

use crate::{
    client::build_client,
    error::Result,
    fetch::{FileFetcher, HttpFileFetcher},
    install::TargetTree,
    integrity,
    manifest::{HttpManifestSource, ManifestSource},
    types::{FailureReason, ManifestFile, SyncReport, TransferOutcome},
    version::LocalVersionStore,
};

/// Tuning for a [`Synchronizer`].
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Maximum transfer units in flight. Values below 1 are treated as 1.
    pub concurrency_limit: usize,
    pub marker_policy: MarkerPolicy,
    /// Transfer every file even when the local version already matches.
    pub force: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: skillsync_config::schema::DEFAULT_CONCURRENCY_LIMIT,
            marker_policy: MarkerPolicy::default(),
            force: false,
        }
    }
}

impl SyncConfig {
    pub fn from_config(config: &SkillsyncConfig) -> Self {
        Self {
            concurrency_limit: config.registry.concurrency_limit,
            marker_policy: config.install.marker_policy,
            force: false,
        }
    }
}

/// Local and remote versions, without transferring anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    pub local_version: Option<String>,
    pub remote_version: String,
    pub file_count: usize,
}

impl SyncStatus {
    pub fn is_up_to_date(&self) -> bool {
        self.local_version.as_deref() == Some(self.remote_version.as_str())
    }
}

/// Keeps a target tree in step with the registry manifest.
pub struct Synchronizer {
    manifests: Arc<dyn ManifestSource>,
    fetcher: Arc<dyn FileFetcher>,
    target: TargetTree,
    versions: LocalVersionStore,
    config: SyncConfig,
}

impl Synchronizer {
    pub fn new(
        manifests: Arc<dyn ManifestSource>,
        fetcher: Arc<dyn FileFetcher>,
        target: TargetTree,
        config: SyncConfig,
    ) -> Self {
        let versions = LocalVersionStore::in_target(target.root());
        Self {
            manifests,
            fetcher,
            target,
            versions,
            config,
        }
    }

    /// HTTP-backed synchronizer for the configured registry.
    pub fn from_config(config: &SkillsyncConfig, target_root: PathBuf) -> Result<Self> {
        let client = build_client(&config.registry)?;
        let manifests = HttpManifestSource::new(client.clone(), config.registry.manifest_url.clone());
        let fetcher = HttpFileFetcher::new(client, &config.registry.base_url)?;
        Ok(Self::new(
            Arc::new(manifests),
            Arc::new(fetcher),
            TargetTree::new(target_root),
            SyncConfig::from_config(config),
        ))
    }

    /// Override whether an up-to-date marker short-circuits the pass.
    #[must_use]
    pub fn with_force(mut self, force: bool) -> Self {
        self.config.force = force;
        self
    }

    pub fn target(&self) -> &TargetTree {
        &self.target
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Compare the installed version with the registry's current one.
    pub async fn status(&self) -> Result<SyncStatus> {
        let manifest = self.manifests.fetch().await?;
        Ok(SyncStatus {
            local_version: self.versions.read(),
            remote_version: manifest.version,
            file_count: manifest.files.len(),
        })
    }

    /// Run one synchronization pass.
    ///
    /// Manifest failures abort before anything local changes. Per-file
    /// failures are recorded in the report and never abort the pass. The
    /// version marker is written once, after every transfer unit finished.
    pub async fn synchronize(&self) -> Result<SyncReport> {
        let manifest = self.manifests.fetch().await?;
        let version_before = self.versions.read();

        if !self.config.force && version_before.as_deref() == Some(manifest.version.as_str()) {
            info!(version = %manifest.version, "registry already up to date");
            return Ok(SyncReport {
                version_after: manifest.version,
                version_before,
                outcomes: Vec::new(),
            });
        }

        info!(
            from = version_before.as_deref().unwrap_or("none"),
            to = %manifest.version,
            files = manifest.files.len(),
            limit = self.config.concurrency_limit,
            "synchronizing registry"
        );

        let permits = Semaphore::new(self.config.concurrency_limit.max(1));
        let units = manifest
            .files
            .iter()
            .map(|file| self.transfer(file, &permits));
        let outcomes = futures::future::join_all(units).await;

        let failed = outcomes.iter().filter(|o| !o.success).count();
        let advance = match self.config.marker_policy {
            MarkerPolicy::AlwaysAdvance => true,
            MarkerPolicy::RequireFullSuccess => failed == 0,
        };

        let version_after = if advance {
            self.versions.write(&manifest.version).await?;
            manifest.version
        } else {
            warn!(
                failed,
                version = %manifest.version,
                "keeping previous version marker after failed transfers"
            );
            version_before.clone().unwrap_or_default()
        };

        info!(
            version = %version_after,
            installed = outcomes.len() - failed,
            failed,
            "registry synchronization finished"
        );

        Ok(SyncReport {
            version_before,
            version_after,
            outcomes,
        })
    }

    /// Fetch, verify, and install a single file. Never writes bytes that fail
    /// verification.
    async fn transfer(&self, file: &ManifestFile, permits: &Semaphore) -> TransferOutcome {
        let Ok(_permit) = permits.acquire().await else {
            return TransferOutcome::failed(
                &file.path,
                FailureReason::HttpError,
                "transfer pool closed",
            );
        };

        let bytes = match self.fetcher.fetch(&file.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %file.path, error = %e, "fetch failed");
                return TransferOutcome::failed(&file.path, FailureReason::HttpError, e.to_string());
            },
        };

        if let Some(size) = file.size
            && size != bytes.len() as u64
        {
            warn!(
                path = %file.path,
                declared = size,
                actual = bytes.len(),
                "size differs from manifest"
            );
        }

        if !integrity::verify(&bytes, &file.sha256) {
            let actual = integrity::digest(&bytes);
            warn!(path = %file.path, expected = %file.sha256, %actual, "digest mismatch, not installing");
            return TransferOutcome::failed(
                &file.path,
                FailureReason::HashMismatch,
                format!("expected {}, got {actual}", file.sha256),
            );
        }

        match self.target.write(&file.path, &bytes).await {
            Ok(dest) => {
                debug!(path = %file.path, dest = %dest.display(), "installed");
                TransferOutcome::installed(&file.path)
            },
            Err(e) => {
                warn!(path = %file.path, error = %e, "write failed");
                TransferOutcome::failed(&file.path, FailureReason::WriteError, e.to_string())
            },
        }
    }
}
