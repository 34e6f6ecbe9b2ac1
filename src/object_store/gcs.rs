use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{content_type, object_key, UploadError, Uploader};
use crate::validation::ImageFile;

const TOKEN_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_write";
const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Google Cloud Storage backend. The bucket must allow public reads for the
/// returned URLs to resolve.
pub struct GcsStore {
    bucket: String,
    client: Client,
    access_token: tokio::sync::RwLock<String>,
    credentials_file: Option<String>,
}

#[derive(Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    token_uri: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl GcsStore {
    pub async fn new(bucket: &str, credentials_file: Option<&str>) -> Result<Self, anyhow::Error> {
        let client = Client::builder().build()?;

        let store = Self {
            bucket: bucket.to_string(),
            client,
            access_token: tokio::sync::RwLock::new(String::new()),
            credentials_file: credentials_file.map(|s| s.to_string()),
        };

        store.refresh_token().await?;
        Ok(store)
    }

    async fn refresh_token(&self) -> Result<(), anyhow::Error> {
        let token = if let Some(ref creds_path) = self.credentials_file {
            self.token_from_service_account(creds_path).await?
        } else {
            self.token_from_metadata_server().await?
        };

        *self.access_token.write().await = token;
        Ok(())
    }

    async fn token_from_service_account(&self, path: &str) -> Result<String, anyhow::Error> {
        let key: ServiceAccountKey = serde_json::from_str(&tokio::fs::read_to_string(path).await?)?;

        let now = chrono::Utc::now().timestamp();
        let header = base64_url_encode(&serde_json::to_vec(&serde_json::json!({
            "alg": "RS256",
            "typ": "JWT"
        }))?);
        let claims = base64_url_encode(&serde_json::to_vec(&serde_json::json!({
            "iss": key.client_email,
            "scope": TOKEN_SCOPE,
            "aud": key.token_uri,
            "iat": now,
            "exp": now + 3600,
        }))?);
        let unsigned = format!("{header}.{claims}");
        let signature = sign_rs256(unsigned.as_bytes(), &key.private_key)?;
        let jwt = format!("{unsigned}.{}", base64_url_encode(&signature));

        let resp: TokenResponse = self
            .client
            .post(&key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", &jwt),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(resp.access_token)
    }

    async fn token_from_metadata_server(&self) -> Result<String, anyhow::Error> {
        let resp: TokenResponse = self
            .client
            .get(METADATA_TOKEN_URL)
            .header("Metadata-Flavor", "Google")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(resp.access_token)
    }

    fn upload_url(&self, key: &str) -> String {
        format!(
            "https://storage.googleapis.com/upload/storage/v1/b/{}/o?uploadType=media&name={}",
            self.bucket, key
        )
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://storage.googleapis.com/{}/{}", self.bucket, key)
    }

    async fn put(&self, key: &str, image: &ImageFile) -> Result<reqwest::Response, UploadError> {
        let token = self.access_token.read().await.clone();

        self.client
            .post(self.upload_url(key))
            .bearer_auth(&token)
            .header("Content-Type", content_type(&image.name))
            .body(image.bytes.clone())
            .send()
            .await
            .map_err(|e| UploadError::Backend(e.to_string()))
    }
}

#[async_trait]
impl Uploader for GcsStore {
    async fn upload(&self, image: &ImageFile) -> Result<String, UploadError> {
        if image.bytes.is_empty() {
            return Err(UploadError::Empty);
        }

        let key = object_key(&image.name);
        let mut resp = self.put(&key, image).await?;

        // Tokens live an hour; refresh once and retry on expiry.
        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            tracing::debug!("GCS token rejected, refreshing");
            self.refresh_token()
                .await
                .map_err(|e| UploadError::Backend(format!("Token refresh failed: {e}")))?;
            resp = self.put(&key, image).await?;
        }

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(UploadError::Backend(format!(
                "GCS upload failed ({status}): {body}"
            )));
        }

        tracing::debug!(bucket = %self.bucket, key = %key, "Uploaded image to GCS");
        Ok(self.public_url(&key))
    }
}

fn base64_url_encode(data: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(data)
}

fn sign_rs256(data: &[u8], private_key_pem: &str) -> Result<Vec<u8>, anyhow::Error> {
    // Strip PEM armour and decode the DER body
    let der_b64: String = private_key_pem
        .lines()
        .filter(|line| !line.starts_with("-----"))
        .collect();
    let der = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, &der_b64)?;

    let key_pair = ring::signature::RsaKeyPair::from_pkcs8(&der)
        .map_err(|e| anyhow::anyhow!("Failed to parse RSA key: {e}"))?;

    let mut signature = vec![0u8; key_pair.public().modulus_len()];
    key_pair
        .sign(
            &ring::signature::RSA_PKCS1_SHA256,
            &ring::rand::SystemRandom::new(),
            data,
            &mut signature,
        )
        .map_err(|e| anyhow::anyhow!("Failed to sign: {e}"))?;

    Ok(signature)
}
