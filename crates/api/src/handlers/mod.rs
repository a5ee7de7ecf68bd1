pub mod admin;
pub mod auth;
pub mod cars;
pub mod catalog;
pub mod dashboard;
