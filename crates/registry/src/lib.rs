//! Registry synchronization: keeps a local tree of skill documents in step
//! with a versioned remote registry.
//!
//! The registry publishes a manifest listing every file with its SHA-256
//! digest. A pass fetches the manifest, skips work when the local version
//! marker already matches, then downloads, verifies, and installs each file
//! under a bounded concurrency limit before recording the new version.

pub mod client;
pub mod error;
pub mod fetch;
pub mod install;
pub mod integrity;
pub mod manifest;
pub mod sync;
pub mod types;
pub mod version;

pub use {
    error::{FetchError, Result, SyncError, WriteError},
    fetch::{FileFetcher, HttpFileFetcher},
    install::TargetTree,
    manifest::{HttpManifestSource, ManifestSource},
    sync::{SyncConfig, SyncStatus, Synchronizer},
    types::{FailureReason, Manifest, ManifestFile, SyncReport, TransferOutcome},
    version::LocalVersionStore,
};
