//! Request middleware.
//!
//! - [`route_guard`] -- redirects navigation based on auth-cookie presence.
//! - [`session`] -- auth cookie parsing and `Set-Cookie` construction.

pub mod route_guard;
pub mod session;
