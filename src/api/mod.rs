//! Client side of the records API.

mod client;
pub mod response;

pub use client::{build_http_client, read_json, HttpRecordsApi};
pub use response::{CreateRecordResponse, Record, RecordPage, StoredRecord};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to parse response as JSON: {0}")]
    Decode(String),
    #[error("Invalid query: {0}")]
    Query(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// The remote collection of image records.
#[async_trait]
pub trait RecordsApi: Send + Sync {
    /// `POST /records`. A reply with `success: false` is still `Ok`.
    async fn create_record(&self, record: &StoredRecord) -> Result<CreateRecordResponse, ApiError>;

    /// `GET /records`, one page starting after `after`.
    async fn list_records(&self, after: Option<&str>) -> Result<RecordPage, ApiError>;
}
