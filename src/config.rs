use std::time::Duration;

use thiserror::Error;

use crate::validation::DEFAULT_MAX_IMAGE_BYTES;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    /// Maximum image size in bytes accepted by the validator
    pub max_upload_size: u64,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the records API (the create/list endpoints hang off it)
    pub records_url: String,
    /// Base URL of the product catalog used by search
    pub catalog_url: String,
    /// Request timeout. `None` lets a hung request block indefinitely.
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub enum StorageBackend {
    Gcs,
    Local,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory for local storage backend
    pub local_storage_path: String,
    /// URL prefix under which the local directory is served
    pub public_base_url: String,
    /// GCS bucket name (required when backend is gcs)
    pub gcs_bucket: Option<String>,
    /// Path to GCS service account JSON (optional, defaults to ADC)
    pub gcs_credentials_file: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            records_url: "http://localhost:3000/api".to_string(),
            catalog_url: "http://localhost:3333".to_string(),
            timeout: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            local_storage_path: "./files".to_string(),
            public_base_url: "http://localhost:8080/files".to_string(),
            gcs_bucket: None,
            gcs_credentials_file: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = ApiConfig::default();
        let storage_defaults = StorageConfig::default();

        let records_url = std::env::var("RECORDS_API_URL").unwrap_or(defaults.records_url);
        let catalog_url = std::env::var("CATALOG_API_URL").unwrap_or(defaults.catalog_url);

        let timeout = std::env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs);

        let max_upload_size = std::env::var("MAX_UPLOAD_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_IMAGE_BYTES);

        let storage_backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".to_string())
            .to_lowercase()
            .as_str()
        {
            "gcs" => StorageBackend::Gcs,
            _ => StorageBackend::Local,
        };

        let local_storage_path =
            std::env::var("LOCAL_STORAGE_PATH").unwrap_or(storage_defaults.local_storage_path);
        let public_base_url =
            std::env::var("PUBLIC_BASE_URL").unwrap_or(storage_defaults.public_base_url);

        let gcs_bucket = std::env::var("GCS_BUCKET").ok();
        let gcs_credentials_file = std::env::var("GCS_CREDENTIALS_FILE").ok();

        let config = Config {
            api: ApiConfig {
                records_url: records_url.trim_end_matches('/').to_string(),
                catalog_url: catalog_url.trim_end_matches('/').to_string(),
                timeout,
            },
            storage: StorageConfig {
                backend: storage_backend,
                local_storage_path,
                public_base_url: public_base_url.trim_end_matches('/').to_string(),
                gcs_bucket,
                gcs_credentials_file,
            },
            max_upload_size,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, url) in [
            ("RECORDS_API_URL", &self.api.records_url),
            ("CATALOG_API_URL", &self.api.catalog_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be an http(s) URL, got '{url}'"
                )));
            }
        }

        if self.max_upload_size == 0 {
            return Err(ConfigError::ValidationError(
                "MAX_UPLOAD_SIZE must be greater than 0".to_string(),
            ));
        }

        if matches!(self.storage.backend, StorageBackend::Gcs) && self.storage.gcs_bucket.is_none()
        {
            return Err(ConfigError::ValidationError(
                "GCS_BUCKET is required when STORAGE_BACKEND=gcs".to_string(),
            ));
        }

        if self.max_upload_size != DEFAULT_MAX_IMAGE_BYTES {
            tracing::warn!(
                max_upload_size = self.max_upload_size,
                default_max_upload_size = DEFAULT_MAX_IMAGE_BYTES,
                "Image size limit overridden"
            );
        }

        Ok(())
    }
}
