//! Article categories.

use serde::Serialize;

use super::identifier::define_entity_id;
use super::validation::{ValidationError, required};

/// Maximum characters in a category name.
pub const CATEGORY_NAME_MAX_CHARS: usize = 24;

define_entity_id! {
    /// Identifier of a stored category.
    CategoryId
}

/// Non-blank category name of at most 24 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CategoryName(String);

impl CategoryName {
    /// Validate and wrap a category name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when blank or longer than
    /// [`CATEGORY_NAME_MAX_CHARS`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        required("name", value.into(), Some(CATEGORY_NAME_MAX_CHARS))
            .map(Self)
    }

    /// Borrow the name text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A stored category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: CategoryName,
    /// Optional free-text description; `null` when absent.
    pub description: Option<String>,
}

/// Validated values for creating or replacing a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    /// Display name.
    pub name: CategoryName,
    /// Optional description.
    pub description: Option<String>,
}
