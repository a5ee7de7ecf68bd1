//! Query parameter types for the listing endpoints.

use serde::Deserialize;

use fruition_core::error::CoreError;
use fruition_core::listing::{
    CategoryFilter, ListViewState, PriceRange, SortOrder, ADMIN_PAGE_SIZE, CATALOG_PAGE_SIZE,
};

/// `GET /cars?search=&category=&sort=&min_price=&max_price=&page=`
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: Option<SortOrder>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub page: Option<usize>,
}

impl CatalogParams {
    pub fn view_state(&self) -> Result<ListViewState, CoreError> {
        let range = PriceRange {
            min: self.min_price,
            max: self.max_price,
        };
        if let (Some(min), Some(max)) = (range.min, range.max) {
            if min > max {
                return Err(CoreError::Validation(
                    "min_price must not exceed max_price".into(),
                ));
            }
        }

        let mut state = ListViewState::new(CATALOG_PAGE_SIZE);
        state.set_search(self.search.clone().unwrap_or_default());
        state.set_category(CategoryFilter::parse(self.category.as_deref()));
        state.set_price_range(range);
        state.set_sort(self.sort.unwrap_or_default());
        state.set_page(self.page.unwrap_or(1));
        Ok(state)
    }
}

/// `GET /admin/dashboard?search=&category=&page=`
#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: Option<usize>,
}

impl DashboardParams {
    pub fn view_state(&self) -> ListViewState {
        let mut state = ListViewState::new(ADMIN_PAGE_SIZE);
        state.set_search(self.search.clone().unwrap_or_default());
        state.set_category(CategoryFilter::parse(self.category.as_deref()));
        state.set_page(self.page.unwrap_or(1));
        state
    }
}
