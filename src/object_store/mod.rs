mod gcs;
mod local;

pub use gcs::GcsStore;
pub use local::LocalStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::validation::ImageFile;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Refusing to upload an empty file")]
    Empty,
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Hosting backend that turns an image into a publicly resolvable URL.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, image: &ImageFile) -> Result<String, UploadError>;
}

/// Object key for an upload: a fresh UUID, keeping the original extension.
pub fn object_key(file_name: &str) -> String {
    let id = uuid::Uuid::new_v4();
    match std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(ext) if !ext.is_empty() => format!("{id}.{}", ext.to_lowercase()),
        _ => id.to_string(),
    }
}

/// MIME type guessed from the file name, falling back to octet-stream.
pub fn content_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}
