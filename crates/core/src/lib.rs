//! Fruition Motors domain layer.
//!
//! Car and category records, the list view engine (search, category filter,
//! price sort, pagination), dashboard statistics and the draft/gallery state
//! behind the admin car form. Nothing in this crate performs I/O, so it is
//! shared by the HTTP client and the web application alike.

pub mod admin;
pub mod car;
pub mod category;
pub mod draft;
pub mod error;
pub mod listing;
pub mod stats;
pub mod types;
