//! Articles and their type codes.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::{Category, CategoryId};
use super::identifier::define_entity_id;
use super::user::{User, UserId};
use super::validation::{ValidationError, required};

/// Maximum characters in an article title.
pub const ARTICLE_TITLE_MAX_CHARS: usize = 256;

define_entity_id! {
    /// Identifier of a stored article.
    ArticleId
}

/// Kind of article, stored and exchanged as a two-letter code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArticleType {
    /// `UN`
    #[default]
    #[serde(rename = "UN")]
    Unspecified,
    /// `TU`
    #[serde(rename = "TU")]
    Tutorial,
    /// `RS`
    #[serde(rename = "RS")]
    Research,
    /// `RW`
    #[serde(rename = "RW")]
    Review,
}

impl ArticleType {
    /// Every type, in code order.
    pub const ALL: [Self; 4] = [Self::Unspecified, Self::Tutorial, Self::Research, Self::Review];

    /// Two-letter code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Unspecified => "UN",
            Self::Tutorial => "TU",
            Self::Research => "RS",
            Self::Review => "RW",
        }
    }
}

impl FromStr for ArticleType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code() == s)
            .ok_or_else(|| ValidationError::InvalidChoice {
                field: "type",
                value: s.to_owned(),
            })
    }
}

/// Non-blank title of at most 256 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArticleTitle(String);

impl ArticleTitle {
    /// Validate and wrap a title.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when blank or too long.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        required("title", value.into(), Some(ARTICLE_TITLE_MAX_CHARS))
            .map(Self)
    }

    /// Borrow the title text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Non-blank article body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArticleContent(String);

impl ArticleContent {
    /// Validate and wrap article content.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Blank`] for empty or whitespace content.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        required("content", value.into(), None).map(Self)
    }

    /// Borrow the content text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A stored article with its author and categories expanded.
///
/// Categories are kept in ascending identifier order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    /// Identifier.
    pub id: ArticleId,
    /// Title.
    pub title: ArticleTitle,
    /// Authoring user.
    pub author: User,
    /// Type code.
    #[serde(rename = "type")]
    pub article_type: ArticleType,
    /// Attached categories.
    pub categories: Vec<Category>,
    /// Body text.
    pub content: ArticleContent,
    /// Creation time, assigned by the store.
    pub created_at: DateTime<Utc>,
    /// Last modification time, assigned by the store.
    pub updated_at: DateTime<Utc>,
}

/// Validated values for creating or replacing an article.
///
/// References are checked by the store, which reports missing authors or
/// categories as unknown references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    /// Title.
    pub title: ArticleTitle,
    /// Body text.
    pub content: ArticleContent,
    /// Authoring user.
    pub author: UserId,
    /// Type code.
    pub article_type: ArticleType,
    categories: Vec<CategoryId>,
}

impl ArticleDraft {
    /// Assemble a draft. Category identifiers are sorted and deduplicated.
    #[must_use]
    pub fn new(
        title: ArticleTitle,
        content: ArticleContent,
        author: UserId,
        article_type: ArticleType,
        mut categories: Vec<CategoryId>,
    ) -> Self {
        categories.sort_unstable();
        categories.dedup();
        Self {
            title,
            content,
            author,
            article_type,
            categories,
        }
    }

    /// Distinct category identifiers in ascending order.
    #[must_use]
    pub fn categories(&self) -> &[CategoryId] {
        &self.categories
    }
}
