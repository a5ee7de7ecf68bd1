//! Car categories. The set is open (defined by the backend) and append-only.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length of a category name.
pub const MAX_CATEGORY_NAME_LEN: usize = 64;

/// A category; `name` doubles as display label and as the value matched
/// against `CarRecord::category`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub name: String,
}

impl CategoryRecord {
    /// Build a category from user input, trimming surrounding whitespace.
    pub fn new(name: &str) -> Result<Self, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("category name is required".into()));
        }
        if name.chars().count() > MAX_CATEGORY_NAME_LEN {
            return Err(CoreError::Validation(format!(
                "category name must be at most {MAX_CATEGORY_NAME_LEN} characters"
            )));
        }
        Ok(Self {
            name: name.to_string(),
        })
    }
}

/// Validate a new category against the names already known.
pub fn ensure_unique(candidate: &CategoryRecord, existing: &[CategoryRecord]) -> Result<(), CoreError> {
    if existing.iter().any(|c| c.name == candidate.name) {
        return Err(CoreError::Conflict(format!(
            "category '{}' already exists",
            candidate.name
        )));
    }
    Ok(())
}
