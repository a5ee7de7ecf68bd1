use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use fruition_client::cache::EntryStatus;
use fruition_client::dealer::QueryKey;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether a car listing is currently cached and fresh.
    pub catalog_cached: bool,
}

/// GET /health -- liveness plus cache state. Never calls the backend.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let catalog_cached = state.dealer.status(&QueryKey::Cars).await == Some(EntryStatus::Fresh);

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        catalog_cached,
    })
}

/// Mount health check routes at the root level.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
