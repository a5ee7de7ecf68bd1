use std::sync::Arc;

use fruition_core::error::CoreError;

use crate::upload::UploadError;

/// Errors from the client layer.
///
/// `Clone` so that every caller joined on one de-duplicated fetch can observe
/// the same failure; the non-cloneable `reqwest::Error` is shared via `Arc`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(Arc<reqwest::Error>),

    /// The backend returned a non-2xx status code.
    #[error("Backend API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The backend answered with a payload that does not match the contract.
    #[error("Invalid backend payload: {0}")]
    Decode(String),

    /// An image upload failed.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// A domain rule was violated before anything was sent.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Request(Arc::new(err))
    }
}

impl ClientError {
    /// HTTP status reported by the backend, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
