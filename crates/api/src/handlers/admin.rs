//! Handlers for category and admin creation.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use fruition_core::admin::Credentials;
use fruition_core::category::CategoryRecord;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /admin/create-category`.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// Created admin, without the password.
#[derive(Debug, Serialize)]
pub struct AdminCreated {
    pub email: String,
}

/// POST /admin/create-category
///
/// Rejects blank or duplicate names before calling the backend.
pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CategoryRecord>>)> {
    let category = state.dealer.create_category(&input.name).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// POST /admin/create-admin
pub async fn create_admin(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> AppResult<(StatusCode, Json<DataResponse<AdminCreated>>)> {
    state.dealer.create_admin(&credentials).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AdminCreated {
                email: credentials.email,
            },
        }),
    ))
}
