//! Remote registry manifest: strict decoding and retrieval.

use std::{
    collections::HashSet,
    path::{Component, Path},
};

use {async_trait::async_trait, serde::Deserialize};

use crate::{
    error::{Result, SyncError},
    integrity,
    types::{Manifest, ManifestFile},
    version,
};

/// Source of the current registry manifest.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Retrieve and decode the manifest. No retries at this layer.
    async fn fetch(&self) -> Result<Manifest>;
}

/// Fetches the manifest document over HTTP.
pub struct HttpManifestSource {
    client: reqwest::Client,
    url: String,
}

impl HttpManifestSource {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ManifestSource for HttpManifestSource {
    async fn fetch(&self) -> Result<Manifest> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SyncError::unreachable(&self.url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SyncError::unreachable(&self.url, format!("HTTP {status}")));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| SyncError::unreachable(&self.url, e))?;
        let manifest = decode(&body)?;
        tracing::debug!(
            version = %manifest.version,
            files = manifest.files.len(),
            url = %self.url,
            "fetched registry manifest"
        );
        Ok(manifest)
    }
}

// ── Wire format ──────────────────────────────────────────────────────────────

/// Every field optional so absence is reported by [`decode`] with a precise
/// message instead of a generic serde error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireManifest {
    name: Option<String>,
    version: Option<String>,
    release_date: Option<String>,
    repository: Option<String>,
    files: Option<Vec<WireFile>>,
}

#[derive(Debug, Deserialize)]
struct WireFile {
    path: Option<String>,
    sha256: Option<String>,
    size: Option<u64>,
}

/// Decode a manifest document, rejecting anything that is not fully formed.
pub fn decode(body: &[u8]) -> Result<Manifest> {
    let wire: WireManifest = serde_json::from_slice(body)
        .map_err(|e| SyncError::malformed(format!("undecodable document: {e}")))?;

    let version = wire
        .version
        .ok_or_else(|| SyncError::malformed("missing `version`"))?;
    if version.is_empty() {
        return Err(SyncError::malformed("empty `version`"));
    }
    let wire_files = wire
        .files
        .ok_or_else(|| SyncError::malformed("missing `files`"))?;

    let mut seen = HashSet::with_capacity(wire_files.len());
    let mut files = Vec::with_capacity(wire_files.len());
    for (index, entry) in wire_files.into_iter().enumerate() {
        let path = entry
            .path
            .ok_or_else(|| SyncError::malformed(format!("files[{index}] is missing `path`")))?;
        let sha256 = entry.sha256.ok_or_else(|| {
            SyncError::malformed(format!(
                "files[{index}] ({path}) is missing `{}`",
                integrity::HASH_ALGORITHM
            ))
        })?;

        check_relative_path(&path)
            .map_err(|reason| SyncError::malformed(format!("files[{index}]: {reason}")))?;
        if !integrity::is_digest_hex(&sha256) {
            return Err(SyncError::malformed(format!(
                "files[{index}] ({path}) has an invalid digest"
            )));
        }
        if path == version::MARKER_FILE_NAME {
            return Err(SyncError::malformed(format!(
                "files[{index}] collides with the local version marker"
            )));
        }
        if !seen.insert(path.clone()) {
            return Err(SyncError::malformed(format!("duplicate path '{path}'")));
        }

        files.push(ManifestFile {
            path,
            sha256,
            size: entry.size,
        });
    }

    Ok(Manifest {
        name: wire.name,
        version,
        release_date: wire.release_date,
        repository: wire.repository,
        files,
    })
}

/// Manifest paths must stay inside the target root: relative, `/`-separated,
/// no `.`/`..` or empty segments.
fn check_relative_path(path: &str) -> std::result::Result<(), String> {
    if path.is_empty() {
        return Err("empty path".into());
    }
    if path.starts_with('/') || path.contains('\\') {
        return Err(format!("path must be relative and '/'-separated: {path}"));
    }
    for segment in path.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(format!("unsafe path segment in '{path}'"));
        }
    }
    for component in Path::new(path).components() {
        match component {
            Component::Normal(_) => {},
            Component::CurDir
            | Component::ParentDir
            | Component::RootDir
            | Component::Prefix(_) => {
                return Err(format!("unsafe path component in '{path}'"));
            },
        }
    }
    Ok(())
}
