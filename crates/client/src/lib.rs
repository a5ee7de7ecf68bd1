//! Fruition Motors client layer.
//!
//! - [`api::DealershipApi`] -- `reqwest` client for the dealership REST backend.
//! - [`cache::QueryCache`] -- keyed query cache with fetch de-duplication and
//!   invalidation after mutations.
//! - [`dealer::DealerClient`] -- session-scoped facade pairing the backend with
//!   the cache; the only place reads and writes meet.
//! - [`upload::CloudinaryUploader`] -- image hosting uploads.
//! - [`form::FormController`] -- admin car form: draft edits, staged images,
//!   upload-then-write submit.

pub mod api;
pub mod backend;
pub mod cache;
pub mod dealer;
pub mod error;
pub mod form;
pub mod upload;
pub mod wire;
