//! Route definitions for the public catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Public routes mounted at the root.
///
/// ```text
/// GET /cars          -> list_cars (search, category, sort, price, page)
/// GET /cars/{id}     -> get_car
/// GET /categories    -> list_categories
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cars", get(catalog::list_cars))
        .route("/cars/{id}", get(catalog::get_car))
        .route("/categories", get(catalog::list_categories))
}
