//! Object storage port.

/// Issues short-lived URLs the browser uploads images to directly.
pub trait UploadUrlSigner: Send + Sync {
    fn upload_url(&self) -> Result<String, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object storage is not configured")]
    NotConfigured,

    #[error("Signing failed: {0}")]
    Signing(String),
}
