pub mod admin;
pub mod catalog;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree (without middleware).
///
/// ```text
/// /health                  health check
/// /cars, /categories       public catalog
/// /admin/...               admin area (guarded)
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(catalog::router())
        .nest("/admin", admin::router())
}
