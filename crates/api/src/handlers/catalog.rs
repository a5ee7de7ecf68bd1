//! Handlers for the public catalog.

use axum::extract::{Path, Query, State};
use axum::Json;

use fruition_core::car::CarRecord;
use fruition_core::category::CategoryRecord;
use fruition_core::listing::Page;
use fruition_core::types::DbId;

use crate::error::AppResult;
use crate::query::CatalogParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /cars
///
/// One page of the catalog after search, category, price and sort.
pub async fn list_cars(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> AppResult<Json<DataResponse<Page<CarRecord>>>> {
    let view = params.view_state()?;
    let cars = state.dealer.cars().await?;
    let page = view.apply(&cars).map(CarRecord::clone);

    Ok(Json(DataResponse { data: page }))
}

/// GET /cars/{id}
pub async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CarRecord>>> {
    let car = state.dealer.car(id).await?;
    Ok(Json(DataResponse {
        data: CarRecord::clone(&car),
    }))
}

/// GET /categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CategoryRecord>>>> {
    let categories = state.dealer.categories().await?;
    Ok(Json(DataResponse {
        data: categories.to_vec(),
    }))
}
