use crate::types::DbId;

/// Domain errors raised before, or in place of, a backend round trip.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// The backend has no record with this id.
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: DbId },

    /// User input breaks a field rule.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The input collides with an existing record.
    #[error("Already exists: {0}")]
    Conflict(String),

    /// The request needs an admin session.
    #[error("Not logged in: {0}")]
    Unauthorized(String),

    /// A broken internal invariant; never shown to users verbatim.
    #[error("Internal error: {0}")]
    Internal(String),
}
