//! Admin credentials used for login and for creating further admins.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "a valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

impl Credentials {
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))
    }
}

// Keep passwords out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
