//! List view engine: search, category filter, price sort and pagination over
//! an in-memory slice of cars.
//!
//! Every step borrows from the input slice and preserves its relative order
//! unless an explicit price sort is requested (which is stable), so the
//! result is always a derived view and never a mutation of cached data.

use serde::{Deserialize, Serialize};

use crate::car::CarRecord;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Cars per page on the admin dashboard.
pub const ADMIN_PAGE_SIZE: usize = 6;

/// Cars per page on the public catalog.
pub const CATALOG_PAGE_SIZE: usize = 9;

/// Sentinel category filter value meaning "no category restriction".
pub const ALL_CATEGORIES: &str = "all";

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// Category restriction applied to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Parse a raw query value. Missing, blank and `"all"` mean no restriction.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::All,
            Some(value) if value.eq_ignore_ascii_case(ALL_CATEGORIES) => Self::All,
            Some(value) => Self::Only(value.to_string()),
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(name) => name == category,
        }
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Keep the backend's order.
    #[default]
    Default,
    #[serde(alias = "priceLowToHigh")]
    PriceAsc,
    #[serde(alias = "priceHighToLow")]
    PriceDesc,
}

/// Inclusive price bounds; a missing bound is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
    }
}

// ---------------------------------------------------------------------------
// Pipeline steps
// ---------------------------------------------------------------------------

/// Case-insensitive substring match against title and brand name.
fn matches_search(car: &CarRecord, needle: &str) -> bool {
    needle.is_empty()
        || car.title.to_lowercase().contains(needle)
        || car.brand_name.to_lowercase().contains(needle)
}

/// Keep the records matching `search` and `category`, in their original order.
pub fn filter_cars<'a>(
    records: &'a [CarRecord],
    search: &str,
    category: &CategoryFilter,
) -> Vec<&'a CarRecord> {
    let needle = search.to_lowercase();
    records
        .iter()
        .filter(|car| matches_search(car, &needle) && category.matches(&car.category))
        .collect()
}

/// Drop records whose price falls outside `range`.
pub fn filter_price<'a>(cars: Vec<&'a CarRecord>, range: &PriceRange) -> Vec<&'a CarRecord> {
    if range.is_unbounded() {
        return cars;
    }
    cars.into_iter().filter(|car| range.contains(car.price)).collect()
}

/// Stable sort by price. Ties keep their incoming relative order.
pub fn sort_cars(cars: &mut [&CarRecord], order: SortOrder) {
    match order {
        SortOrder::Default => {}
        SortOrder::PriceAsc => cars.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortOrder::PriceDesc => cars.sort_by(|a, b| b.price.total_cmp(&a.price)),
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// One page of a listing plus the numbers needed to render a pager.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// The page actually served (after clamping), 1-based.
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    /// 1-based index of the first item on this page, `0` when empty.
    pub first_index: usize,
    /// 1-based index of the last item on this page, `0` when empty.
    pub last_index: usize,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
            first_index: self.first_index,
            last_index: self.last_index,
        }
    }
}

/// Number of pages needed for `total_items` at `page_size` per page.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1))
}

/// Clamp a requested page into `1..=max(total_pages, 1)`.
pub fn clamp_page(requested: usize, total_pages: usize) -> usize {
    requested.clamp(1, total_pages.max(1))
}

/// Slice `items` into the requested page, clamping out-of-range requests.
pub fn paginate<T: Clone>(items: &[T], requested_page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_pages(total_items, page_size);
    let page = clamp_page(requested_page, total_pages);

    let start = ((page - 1) * page_size).min(total_items);
    let end = (page * page_size).min(total_items);
    let slice = items[start..end].to_vec();

    let (first_index, last_index) = if slice.is_empty() {
        (0, 0)
    } else {
        (start + 1, end)
    };

    Page {
        items: slice,
        page,
        page_size,
        total_items,
        total_pages,
        first_index,
        last_index,
    }
}

// ---------------------------------------------------------------------------
// ListViewState
// ---------------------------------------------------------------------------

/// User-controlled state of one listing view.
///
/// Changing the search text, category or price range resets the page to 1
/// so a narrower result set never lands on an empty out-of-range page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListViewState {
    search: String,
    category: CategoryFilter,
    price_range: PriceRange,
    sort: SortOrder,
    page: usize,
    page_size: usize,
}

impl ListViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            category: CategoryFilter::All,
            price_range: PriceRange::default(),
            sort: SortOrder::Default,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if search != self.search {
            self.search = search;
            self.page = 1;
        }
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        if category != self.category {
            self.category = category;
            self.page = 1;
        }
    }

    pub fn set_price_range(&mut self, range: PriceRange) {
        if range != self.price_range {
            self.price_range = range;
            self.page = 1;
        }
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Records passing every filter, in display order.
    pub fn filtered<'a>(&self, records: &'a [CarRecord]) -> Vec<&'a CarRecord> {
        let cars = filter_cars(records, &self.search, &self.category);
        let mut cars = filter_price(cars, &self.price_range);
        sort_cars(&mut cars, self.sort);
        cars
    }

    /// Produce the page to render for `records`.
    pub fn apply<'a>(&self, records: &'a [CarRecord]) -> Page<&'a CarRecord> {
        paginate(&self.filtered(records), self.page, self.page_size)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
