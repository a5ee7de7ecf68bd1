//! Handlers for the admin dashboard.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use fruition_core::car::CarRecord;
use fruition_core::category::CategoryRecord;
use fruition_core::listing::Page;
use fruition_core::stats::DashboardStats;
use fruition_core::types::DbId;

use crate::error::AppResult;
use crate::query::DashboardParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub cars: Page<CarRecord>,
    pub categories: Vec<CategoryRecord>,
}

/// GET /admin/dashboard
///
/// Headline stats over the full inventory plus one filtered page of cars.
pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> AppResult<Json<DataResponse<DashboardView>>> {
    let (cars, categories) = tokio::try_join!(state.dealer.cars(), state.dealer.categories())?;

    let stats = DashboardStats::compute(&cars, &categories);
    let page = params.view_state().apply(&cars).map(CarRecord::clone);

    Ok(Json(DataResponse {
        data: DashboardView {
            stats,
            cars: page,
            categories: categories.to_vec(),
        },
    }))
}

/// DELETE /admin/cars/{id}
pub async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.dealer.delete_car(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
