//! Route definitions for the admin area.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{admin, auth, cars, dashboard};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /login              -> login_view
/// POST   /login              -> login
/// POST   /logout             -> logout
/// GET    /dashboard          -> dashboard (stats + filtered page)
/// DELETE /cars/{id}          -> delete_car
/// GET    /add-car/{slug}     -> form_view   (slug: `new` or car id)
/// POST   /add-car/{slug}     -> submit_form (multipart)
/// POST   /create-category    -> create_category
/// POST   /create-admin       -> create_admin
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_view).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/cars/{id}", delete(dashboard::delete_car))
        .route("/add-car/{slug}", get(cars::form_view).post(cars::submit_form))
        .route("/create-category", post(admin::create_category))
        .route("/create-admin", post(admin::create_admin))
}
