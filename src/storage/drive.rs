//! Google Drive uploads authenticated with a service-account key.

use std::path::Path;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::{ObjectUploader, UploadError, UploadResult};

const SCOPE: &str = "https://www.googleapis.com/auth/drive.file";
const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// The fields of a service-account key file that matter here.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: String,
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedFile {
    id: String,
    web_view_link: Option<String>,
}

pub struct DriveUploader {
    client: reqwest::Client,
    client_email: String,
    token_uri: String,
    signing_key: EncodingKey,
    upload_url: String,
}

impl DriveUploader {
    /// Load and parse the key file. Called once at startup.
    pub fn from_key_file(path: &Path, upload_url: &str) -> Result<Self, String> {
        let raw = std::fs::read(path)
            .map_err(|e| format!("Failed to read Drive credentials {}: {e}", path.display()))?;
        let key: ServiceAccountKey = serde_json::from_slice(&raw)
            .map_err(|e| format!("Invalid Drive credentials {}: {e}", path.display()))?;
        Self::new(key, upload_url)
    }

    pub fn new(key: ServiceAccountKey, upload_url: &str) -> Result<Self, String> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| format!("Invalid Drive private key: {e}"))?;

        Ok(Self {
            client: reqwest::Client::new(),
            client_email: key.client_email,
            token_uri: key.token_uri,
            signing_key,
            upload_url: upload_url.to_string(),
        })
    }

    async fn access_token(&self) -> Result<String, UploadError> {
        let now = Utc::now();
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: SCOPE,
            aud: &self.token_uri,
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .map_err(|e| UploadError::Auth(format!("JWT encode failed: {e}")))?;

        let resp = self
            .client
            .post(&self.token_uri)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| UploadError::Auth(format!("Token request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(UploadError::Auth(format!("Token endpoint returned {status}: {body}")));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| UploadError::Auth(format!("Malformed token response: {e}")))?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl ObjectUploader for DriveUploader {
    async fn upload(
        &self,
        path: &Path,
        file_name: &str,
        folder_id: &str,
    ) -> Result<UploadResult, UploadError> {
        let content = tokio::fs::read(path).await?;
        let token = self.access_token().await?;

        let metadata = json!({ "name": file_name, "parents": [folder_id] });
        let boundary = format!("formrelay-{}", Uuid::now_v7().simple());
        let body = related_body(&boundary, &metadata, &content);

        let resp = self
            .client
            .post(format!(
                "{}?uploadType=multipart&fields=id,webViewLink&supportsAllDrives=true",
                self.upload_url
            ))
            .bearer_auth(token)
            .header(
                "Content-Type",
                format!("multipart/related; boundary={boundary}"),
            )
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(1024)
                .collect::<String>();
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let created: CreatedFile = resp.json().await?;
        tracing::info!(file_id = %created.id, "Uploaded {file_name} to Drive");

        Ok(UploadResult {
            remote_id: created.id,
            link: created.web_view_link,
        })
    }
}

/// Build a `multipart/related` body: JSON metadata part, then the file bytes.
fn related_body(boundary: &str, metadata: &serde_json::Value, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(content.len() + 512);
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!("--{boundary}\r\nContent-Type: application/octet-stream\r\n\r\n").as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}
