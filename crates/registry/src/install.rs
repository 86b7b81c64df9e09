use std::{
    io::Write,
    path::{Path, PathBuf},
};

use crate::error::WriteError;

/// Local directory that registry files are installed into.
///
/// Every write goes through a uniquely named sibling temp file and a rename, so readers
/// never observe a partially written document.
#[derive(Debug, Clone)]
pub struct TargetTree {
    root: PathBuf,
}

impl TargetTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local path for a manifest path. Manifest paths are validated as
    /// relative at decode time.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }

    /// Install `bytes` at `relative`, creating parent directories.
    pub async fn write(&self, relative: &str, bytes: &[u8]) -> Result<PathBuf, WriteError> {
        let dest = self.resolve(relative);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| WriteError::new(parent, e))?;
        }

        if let Ok(meta) = tokio::fs::symlink_metadata(&dest).await
            && meta.file_type().is_symlink()
        {
            return Err(WriteError::new(
                &dest,
                std::io::Error::other("refusing to overwrite a symlink"),
            ));
        }

        persist_atomically(&dest, bytes.to_vec()).await?;
        Ok(dest)
    }
}

/// Write `bytes` to a uniquely named temp file next to `dest`, then rename it
/// over `dest`. The temp file is removed if anything fails before the rename.
pub(crate) async fn persist_atomically(dest: &Path, bytes: Vec<u8>) -> Result<(), WriteError> {
    let dest = dest.to_path_buf();
    let parent = dest
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    tokio::task::spawn_blocking(move || {
        let mut tmp = tempfile::Builder::new()
            .prefix(".skillsync-")
            .suffix(".tmp")
            .tempfile_in(&parent)
            .map_err(|e| WriteError::new(&parent, e))?;
        tmp.write_all(&bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| WriteError::new(&dest, e))?;
        tmp.persist(&dest)
            .map_err(|e| WriteError::new(&dest, e.error))?;
        Ok::<(), WriteError>(())
    })
    .await
    .map_err(|e| WriteError::new(Path::new("."), std::io::Error::other(e)))?
}
