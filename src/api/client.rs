use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::{ApiError, CreateRecordResponse, RecordPage, RecordsApi, StoredRecord};

const RECORDS_PATH: &str = "/records";

/// Build the shared reqwest client. Without a timeout a hung request waits forever.
pub fn build_http_client(timeout: Option<Duration>) -> Result<Client, ApiError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| ApiError::Transport(format!("Failed to create HTTP client: {e}")))
}

/// Turn a non-2xx reply into `ApiError::Status`, otherwise decode the JSON body.
pub async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

/// reqwest-backed `RecordsApi`.
#[derive(Clone, Debug)]
pub struct HttpRecordsApi {
    client: Client,
    base_url: String,
}

impl HttpRecordsApi {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn records_url(&self) -> String {
        format!("{}{RECORDS_PATH}", self.base_url)
    }
}

#[async_trait]
impl RecordsApi for HttpRecordsApi {
    async fn create_record(&self, record: &StoredRecord) -> Result<CreateRecordResponse, ApiError> {
        let response = self
            .client
            .post(self.records_url())
            .json(record)
            .send()
            .await?;

        let body: CreateRecordResponse = read_json(response).await?;
        tracing::debug!(url = %record.url, success = body.success, "Create record answered");
        Ok(body)
    }

    async fn list_records(&self, after: Option<&str>) -> Result<RecordPage, ApiError> {
        let mut request = self.client.get(self.records_url());
        if let Some(cursor) = after {
            request = request.query(&[("after", cursor)]);
        }

        read_json(request.send().await?).await
    }
}
