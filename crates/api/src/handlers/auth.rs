//! Handlers for admin login and logout.

use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use fruition_core::admin::Credentials;

use crate::error::AppResult;
use crate::middleware::route_guard::{safe_callback, LOGIN_PATH};
use crate::middleware::session::{expired_cookie, is_cookie_safe, session_cookie};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query string of the login page and login submission.
#[derive(Debug, Default, Deserialize)]
pub struct LoginParams {
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginView {
    /// Where a successful login will land.
    pub redirect_to: String,
}

/// GET /admin/login
///
/// Only reached without the auth cookie; the route guard sends logged-in
/// admins to the dashboard.
pub async fn login_view(Query(params): Query<LoginParams>) -> Json<DataResponse<LoginView>> {
    Json(DataResponse {
        data: LoginView {
            redirect_to: safe_callback(params.callback_url.as_deref()),
        },
    })
}

/// POST /admin/login
///
/// Verify credentials with the backend, set the auth cookie and redirect
/// (303) to the callback path or the dashboard.
pub async fn login(
    State(state): State<AppState>,
    Query(params): Query<LoginParams>,
    Json(credentials): Json<Credentials>,
) -> AppResult<Response> {
    let response = state.dealer.login(&credentials).await?;

    let token = match response.token {
        Some(token) if is_cookie_safe(&token) => token,
        Some(_) => {
            tracing::warn!("Backend token is not cookie-safe, issuing an opaque session marker");
            uuid::Uuid::new_v4().to_string()
        }
        None => uuid::Uuid::new_v4().to_string(),
    };

    let cookie = session_cookie(
        &state.config.auth_cookie_name,
        &token,
        state.config.auth_cookie_max_age_secs,
    );
    let target = safe_callback(params.callback_url.as_deref());

    tracing::info!(email = %credentials.email, %target, "Admin logged in");
    Ok(([(SET_COOKIE, cookie)], Redirect::to(&target)).into_response())
}

/// POST /admin/logout
pub async fn logout(State(state): State<AppState>) -> Response {
    let cookie = expired_cookie(&state.config.auth_cookie_name);
    tracing::info!("Admin logged out");
    ([(SET_COOKIE, cookie)], Redirect::to(LOGIN_PATH)).into_response()
}
