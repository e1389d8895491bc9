use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::config::CloudinaryConfig;

/// Folder the host stores avatar uploads under.
const FOLDER: &str = "usuarios";
/// Formats the host accepts; anything else is rejected service-side.
const ALLOWED_FORMATS: &str = "jpg,png,jpeg";
/// Shrink every avatar to fit inside 500x500 without upscaling.
const TRANSFORMATION: &str = "c_limit,h_500,w_500";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("image host rejected the upload: {status} {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Cloudinary upload client. Credentials and upload rules are fixed at
/// construction and live for the whole process.
#[derive(Clone)]
pub struct Cloudinary {
    http: reqwest::Client,
    config: CloudinaryConfig,
}

impl Cloudinary {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Push one image to the host and return its public URL.
    pub async fn upload_avatar(
        &self,
        data: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<String, UploadError> {
        let timestamp = Utc::now().timestamp().to_string();
        let public_id = Uuid::new_v4().to_string();
        let params = [
            ("allowed_formats", ALLOWED_FORMATS),
            ("folder", FOLDER),
            ("public_id", public_id.as_str()),
            ("timestamp", timestamp.as_str()),
            ("transformation", TRANSFORMATION),
        ];
        let signature = sign(&params, &self.config.api_secret);

        let file = reqwest::multipart::Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(content_type)?;
        let mut form = reqwest::multipart::Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .part("file", file);
        for (name, value) in params {
            form = form.text(name, value.to_string());
        }

        let response = self
            .http
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Api { status, body });
        }

        let parsed: UploadResponse = response.json().await?;
        Ok(parsed.secure_url)
    }

    fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        )
    }
}

/// Request signature the host verifies: parameters sorted by name, joined
/// as `name=value&...`, with the API secret appended, SHA-256, lowercase hex.
fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by_key(|(name, _)| *name);
    let joined = sorted
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_known_vector() {
        let params = [
            ("allowed_formats", "jpg,png,jpeg"),
            ("folder", "usuarios"),
            ("timestamp", "1700000000"),
            ("transformation", "c_limit,h_500,w_500"),
        ];
        assert_eq!(
            sign(&params, "secreto123"),
            "8d9d473635c365db6d7669fcf5d7f5bc3fa000485f0ce68908703fc3480ad23f"
        );
    }

    #[test]
    fn test_signature_sorts_params() {
        let ordered = [("folder", "usuarios"), ("timestamp", "1700000000")];
        let shuffled = [("timestamp", "1700000000"), ("folder", "usuarios")];
        assert_eq!(sign(&ordered, "s"), sign(&shuffled, "s"));
    }

    #[test]
    fn test_signature_depends_on_secret() {
        let params = [("folder", "usuarios")];
        assert_ne!(sign(&params, "uno"), sign(&params, "dos"));
    }

    #[test]
    fn test_upload_url_uses_cloud_name() {
        let client = Cloudinary::new(CloudinaryConfig {
            cloud_name: "mi-nube".into(),
            api_key: "k".into(),
            api_secret: "s".into(),
        });
        assert_eq!(
            client.upload_url(),
            "https://api.cloudinary.com/v1_1/mi-nube/image/upload"
        );
    }
}
