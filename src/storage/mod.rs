pub mod drive;
pub mod scratch;

use std::path::Path;

use async_trait::async_trait;

pub use drive::DriveUploader;
pub use scratch::{ScratchDir, StagedFile, StagingError};

#[derive(Debug, Clone, PartialEq)]
pub struct UploadResult {
    pub remote_id: String,
    pub link: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Failed to read staged file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Upload request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Upload rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Remote object store that accepts a staged file.
#[async_trait]
pub trait ObjectUploader: Send + Sync {
    async fn upload(
        &self,
        path: &Path,
        file_name: &str,
        folder_id: &str,
    ) -> Result<UploadResult, UploadError>;
}
