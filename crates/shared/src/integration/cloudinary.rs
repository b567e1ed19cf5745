use async_trait::async_trait;
use chrono::Utc;
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{error, info};

use crate::{abstract_trait::MediaStorageTrait, config::CloudinaryConfig, utils::AppError};

#[derive(Debug, Clone)]
pub struct CloudinaryStorage {
    cloud_name: String,
    api_key: String,
    api_secret: String,
    client: Client,
}

impl CloudinaryStorage {
    pub fn new(config: &CloudinaryConfig) -> Result<Self, AppError> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;

        Ok(Self {
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Signed-upload signature: parameters sorted by name, joined as a query
/// string, suffixed with the API secret and hashed with SHA-256.
pub fn upload_signature(folder: &str, timestamp: i64, api_secret: &str) -> String {
    let to_sign = format!("folder={folder}&timestamp={timestamp}{api_secret}");
    hex::encode(Sha256::digest(to_sign.as_bytes()))
}

#[async_trait]
impl MediaStorageTrait for CloudinaryStorage {
    async fn upload_image(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        folder: &str,
    ) -> Result<String, AppError> {
        info!("Uploading {file_name} ({} bytes) to folder {folder}", bytes.len());

        let timestamp = Utc::now().timestamp();
        let signature = upload_signature(folder, timestamp, &self.api_secret);

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()))
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("folder", folder.to_string())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.cloud_name
        );

        let response = self.client.post(url).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            error!("Cloudinary upload failed {status}: {text}");
            return Err(AppError::UpstreamError(format!("Cloudinary returned {status}")));
        }

        let uploaded: UploadResponse = response.json().await?;

        Ok(uploaded.secure_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_matches_documented_scheme() {
        assert_eq!(
            upload_signature("home-sweet-loan/avatars", 1315060510, "abcd"),
            "84c73d476a99c7c8862bbe63a7a94f855868afdb660ee97b85aa6a7680554cf7"
        );
    }
}
