use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{object_key, UploadError, Uploader};
use crate::validation::ImageFile;

/// Local filesystem store for development and testing. Files are assumed to
/// be served by some static host under `public_base_url`.
pub struct LocalStore {
    base_path: PathBuf,
    public_base_url: String,
}

impl LocalStore {
    pub fn new<P: AsRef<Path>>(
        base_path: P,
        public_base_url: &str,
    ) -> Result<Self, std::io::Error> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path)?;
        Ok(Self {
            base_path,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn object_path(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }
}

#[async_trait]
impl Uploader for LocalStore {
    async fn upload(&self, image: &ImageFile) -> Result<String, UploadError> {
        if image.bytes.is_empty() {
            return Err(UploadError::Empty);
        }

        let key = object_key(&image.name);
        tokio::fs::write(self.object_path(&key), &image.bytes).await?;

        tracing::debug!(key = %key, byte_size = image.byte_size(), "Stored image locally");
        Ok(format!("{}/{key}", self.public_base_url))
    }
}
