//! Image hosting upload.
//!
//! Images are posted one at a time as multipart form data to an unsigned
//! Cloudinary upload preset. The cloud name and preset are read from the
//! environment on every call, so a missing variable surfaces as an error at
//! submit time rather than at startup.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use fruition_core::draft::StagedFile;

/// Environment variable naming the Cloudinary cloud.
pub const CLOUD_NAME_VAR: &str = "CLOUDINARY_CLOUD_NAME";

/// Environment variable naming the unsigned upload preset.
pub const UPLOAD_PRESET_VAR: &str = "CLOUDINARY_UPLOAD_PRESET";

const DEFAULT_UPLOAD_HOST: &str = "https://api.cloudinary.com";

#[derive(Debug, Clone, thiserror::Error)]
pub enum UploadError {
    /// A required setting is absent or blank.
    #[error("Image upload is not configured: {0} is not set")]
    MissingConfig(&'static str),

    #[error("Image upload request failed: {0}")]
    Request(Arc<reqwest::Error>),

    /// The hosting service answered with a non-2xx status.
    #[error("Image host rejected upload ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// A 2xx answer without a `secure_url`.
    #[error("Image host response did not contain a secure_url")]
    MissingUrl,
}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        UploadError::Request(Arc::new(err))
    }
}

/// Resolved upload settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    pub cloud_name: String,
    pub upload_preset: String,
}

impl UploadConfig {
    /// Resolve settings through `lookup`. Blank values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, UploadError> {
        let read = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(UploadError::MissingConfig(name))
        };
        Ok(Self {
            cloud_name: read(CLOUD_NAME_VAR)?,
            upload_preset: read(UPLOAD_PRESET_VAR)?,
        })
    }

    pub fn from_env() -> Result<Self, UploadError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

/// Turns a staged image into a publicly reachable URL.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, file: &StagedFile) -> Result<String, UploadError>;
}

type SettingsLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// [`ImageUploader`] backed by Cloudinary's unsigned upload endpoint.
pub struct CloudinaryUploader {
    client: reqwest::Client,
    host: String,
    settings: SettingsLookup,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

impl CloudinaryUploader {
    /// Uploader reading its settings from the process environment.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            host: DEFAULT_UPLOAD_HOST.to_string(),
            settings: Arc::new(|name| std::env::var(name).ok()),
        }
    }

    /// Point the uploader at a different host (used against local mocks).
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the settings source.
    pub fn with_settings(
        mut self,
        settings: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.settings = Arc::new(settings);
        self
    }
}

#[async_trait]
impl ImageUploader for CloudinaryUploader {
    async fn upload(&self, file: &StagedFile) -> Result<String, UploadError> {
        let config = UploadConfig::from_lookup(|name| (self.settings)(name))?;
        let url = format!("{}/v1_1/{}/upload", self.host, config.cloud_name);

        let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", config.upload_preset);

        tracing::debug!(file = %file.file_name, size = file.bytes.len(), "Uploading image");
        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body: UploadResponse = response.json().await?;
        let secure_url = body
            .secure_url
            .filter(|url| !url.trim().is_empty())
            .ok_or(UploadError::MissingUrl)?;

        tracing::info!(file = %file.file_name, url = %secure_url, "Image uploaded");
        Ok(secure_url)
    }
}
