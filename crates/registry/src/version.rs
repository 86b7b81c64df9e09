use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{error::WriteError, install::persist_atomically};

/// File name of the version marker inside the target root.
pub const MARKER_FILE_NAME: &str = ".skillsync-version.json";

#[derive(Debug, Serialize, Deserialize)]
struct VersionMarker {
    version: String,
}

/// Persistent record of which registry version is installed.
pub struct LocalVersionStore {
    path: PathBuf,
}

impl LocalVersionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store for the marker at its well-known location under `target_root`.
    pub fn in_target(target_root: &Path) -> Self {
        Self::new(target_root.join(MARKER_FILE_NAME))
    }

    /// Installed version, or `None` when nothing is installed.
    ///
    /// An unreadable or corrupt marker counts as "not installed" so the next
    /// pass re-syncs instead of failing.
    pub fn read(&self) -> Option<String> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "version marker unreadable");
                return None;
            },
        };
        match serde_json::from_str::<VersionMarker>(&data) {
            Ok(marker) => Some(marker.version),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "version marker corrupt");
                None
            },
        }
    }

    /// Replace the marker atomically via a uniquely named temp file and a
    /// rename.
    pub async fn write(&self, version: &str) -> Result<(), WriteError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| WriteError::new(parent, e))?;
        }
        let data = serde_json::to_vec_pretty(&VersionMarker {
            version: version.to_string(),
        })
        .map_err(|e| WriteError::new(&self.path, e.into()))?;

        persist_atomically(&self.path, data).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_missing_returns_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalVersionStore::in_target(tmp.path());
        assert_eq!(store.read(), None);
    }

    #[tokio::test]
    async fn write_then_read() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalVersionStore::in_target(&tmp.path().join("nested/target"));

        store.write("1.2.0").await.unwrap();
        assert_eq!(store.read().as_deref(), Some("1.2.0"));

        store.write("1.3.0").await.unwrap();
        assert_eq!(store.read().as_deref(), Some("1.3.0"));
        let names: Vec<_> = std::fs::read_dir(tmp.path().join("nested/target"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from(MARKER_FILE_NAME)]);
    }

    #[test]
    fn corrupt_marker_reads_as_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalVersionStore::in_target(tmp.path());
        std::fs::write(store.path(), "{\"version\":").unwrap();
        assert_eq!(store.read(), None);

        std::fs::write(store.path(), r#"{"other":"field"}"#).unwrap();
        assert_eq!(store.read(), None);
    }

    #[tokio::test]
    async fn marker_is_json_document() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalVersionStore::in_target(tmp.path());
        store.write("2026.10").await.unwrap();

        let raw = std::fs::read_to_string(tmp.path().join(MARKER_FILE_NAME)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], "2026.10");
    }

    #[tokio::test]
    async fn write_fails_when_parent_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("target");
        std::fs::write(&blocker, b"file").unwrap();

        let store = LocalVersionStore::in_target(&blocker);
        assert!(store.write("1").await.is_err());
    }

    #[tokio::test]
    async fn blocked_marker_leaves_no_temp_file() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join(MARKER_FILE_NAME)).unwrap();
        let store = LocalVersionStore::in_target(tmp.path());

        assert!(store.write("1").await.is_err());
        let names: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from(MARKER_FILE_NAME)]);
    }

    #[tokio::test]
    async fn marker_write_keeps_lookalike_file() {
        let tmp = tempfile::tempdir().unwrap();
        let lookalike = tmp.path().join(format!("{MARKER_FILE_NAME}.tmp"));
        std::fs::write(&lookalike, b"installed").unwrap();
        let store = LocalVersionStore::in_target(tmp.path());

        store.write("2").await.unwrap();
        assert_eq!(std::fs::read(&lookalike).unwrap(), b"installed");
        assert_eq!(store.read().as_deref(), Some("2"));
    }
}
