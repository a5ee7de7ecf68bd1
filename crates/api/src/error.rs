use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fruition_client::error::ClientError;
use fruition_client::upload::UploadError;
use fruition_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`ClientError`] for failures
/// talking to the backend or the image host. Implements [`IntoResponse`] to
/// produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `fruition_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A backend, decode or upload failure from `fruition_client`.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

type Classified = (StatusCode, &'static str, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Client(client) => classify_client_error(client),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> Classified {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify_core_error(core: &CoreError) -> Classified {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Classify a client-layer error.
///
/// - Backend 404/401/403 keep their meaning.
/// - Backend 400/409/422 are passed through as `BACKEND_REJECTED` with the
///   backend's message.
/// - Any other backend status, unreachable backend or undecodable payload
///   maps to 502.
/// - Missing upload configuration is a server misconfiguration (sanitized
///   500); other upload failures are 502.
fn classify_client_error(err: &ClientError) -> Classified {
    match err {
        ClientError::Core(core) => classify_core_error(core),
        ClientError::Api { status, body } => match *status {
            404 => (StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found".to_string()),
            401 => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Invalid credentials".to_string()),
            403 => (StatusCode::FORBIDDEN, "FORBIDDEN", "Access denied".to_string()),
            400 | 409 | 422 => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST),
                "BACKEND_REJECTED",
                body.clone(),
            ),
            _ => {
                tracing::error!(status, body = %body, "Backend error");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "The dealership backend returned an error".to_string(),
                )
            }
        },
        ClientError::Request(e) => {
            tracing::error!(error = %e, "Backend unreachable");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_UNAVAILABLE",
                "The dealership backend is unavailable".to_string(),
            )
        }
        ClientError::Decode(msg) => {
            tracing::error!(error = %msg, "Undecodable backend payload");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_INVALID",
                "The dealership backend sent an invalid response".to_string(),
            )
        }
        ClientError::Upload(UploadError::MissingConfig(var)) => {
            tracing::error!(setting = *var, "Image upload is not configured");
            internal()
        }
        ClientError::Upload(upload) => {
            tracing::warn!(error = %upload, "Image upload failed");
            (
                StatusCode::BAD_GATEWAY,
                "UPLOAD_FAILED",
                "Image upload failed".to_string(),
            )
        }
    }
}
