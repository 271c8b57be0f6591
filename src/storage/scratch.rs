use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use uuid::Uuid;

const MAX_NAME_LEN: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    #[error("Failed to prepare scratch directory {path}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Directory where uploads are staged before being forwarded.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StagingError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|source| StagingError::Directory {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` under a name unique to this call.
    pub async fn stage(
        &self,
        bytes: &[u8],
        suggested_name: &str,
    ) -> Result<StagedFile, StagingError> {
        let path = self
            .root
            .join(format!("{}-{}", Uuid::now_v7(), sanitize(suggested_name)));

        if let Err(source) = tokio::fs::write(&path, bytes).await {
            // A partial write may have left something behind.
            let _ = tokio::fs::remove_file(&path).await;
            return Err(StagingError::Write { path, source });
        }

        tracing::debug!(path = %path.display(), size = bytes.len(), "Staged upload");
        Ok(StagedFile {
            path,
            released: false,
        })
    }
}

/// A staged file. Removed by [`StagedFile::release`], or on drop if never released.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    released: bool,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the staged file. Never fails; problems are logged.
    pub async fn release(mut self) {
        self.released = true;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Released staged upload"),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Staged upload already gone");
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Failed to release staged upload: {e}");
            }
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Released staged upload on drop")
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Failed to release staged upload: {e}");
            }
        }
    }
}

/// Reduce a client-supplied file name to a safe final path component.
fn sanitize(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
