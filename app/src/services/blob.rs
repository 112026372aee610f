//! Signed upload URL minting for direct-to-blob uploads.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

const APP_TAG: &str = "company-qr-generator";

#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Blob API rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Blob API response did not contain an upload URL")]
    MissingUploadUrl,
}

/// Result of asking for a signed upload URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobUploadTicket {
    /// No token configured; clients should use the local upload endpoint.
    Disabled,
    Signed(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBlobResponse {
    upload_url: Option<String>,
}

#[derive(Clone)]
pub struct BlobUploadService {
    http: Client,
    api_url: String,
    token: String,
}

impl BlobUploadService {
    pub fn new(api_url: String, token: String) -> Result<Self, BlobError> {
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            http,
            api_url,
            token,
        })
    }

    pub fn is_enabled(&self) -> bool {
        !self.token.is_empty()
    }

    /// Create an empty client-upload blob and return its signed URL.
    pub async fn request_upload_url(&self) -> Result<BlobUploadTicket, BlobError> {
        if !self.is_enabled() {
            return Ok(BlobUploadTicket::Disabled);
        }

        let resp = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.token)
            .json(&json!({
                "clientUpload": true,
                "token": self.token,
                "metadata": { "app": APP_TAG },
            }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Blob API rejected upload URL request");
            return Err(BlobError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let data: CreateBlobResponse = resp.json().await?;
        let url = data.upload_url.ok_or(BlobError::MissingUploadUrl)?;
        tracing::debug!("Signed blob upload URL issued");
        Ok(BlobUploadTicket::Signed(url))
    }
}
