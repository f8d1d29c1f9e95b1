//! Generated record types.
//!
//! These types mirror the backend's write models without depending on them.
//! Identifiers of existing records are carried as plain `i64` values.

use serde::{Deserialize, Serialize};

/// Article type code for a generated article.
///
/// Mirrors the backend's `ArticleType` enumeration without creating a
/// dependency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArticleTypeSeed {
    /// No particular kind (`UN`).
    #[default]
    #[serde(rename = "UN")]
    Unspecified,
    /// Step-by-step guide (`TU`).
    #[serde(rename = "TU")]
    Tutorial,
    /// Research write-up (`RS`).
    #[serde(rename = "RS")]
    Research,
    /// Review of something (`RW`).
    #[serde(rename = "RW")]
    Review,
}

impl ArticleTypeSeed {
    /// Every type code, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Unspecified,
        Self::Tutorial,
        Self::Research,
        Self::Review,
    ];

    /// Two-letter storage code.
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

/// A generated user.
///
/// # Example
///
/// ```
/// use example_data::ExampleUserSeed;
///
/// let user = ExampleUserSeed {
///     username: "user_1".to_owned(),
///     first_name: "Ada".to_owned(),
///     last_name: "Lovelace".to_owned(),
///     password: "helloworld".to_owned(),
/// };
/// assert_eq!(user.username, "user_1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleUserSeed {
    /// Sequential username, unique within one factory.
    pub username: String,
    /// Random first name.
    pub first_name: String,
    /// Random last name.
    pub last_name: String,
    /// Plain-text placeholder password taken from the factory config.
    pub password: String,
}

/// A generated category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleCategorySeed {
    /// Sequential category name.
    pub name: String,
    /// One random sentence.
    pub description: String,
}

/// A generated article referencing existing users and categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleArticleSeed {
    /// Random sentence used as the title.
    pub title: String,
    /// Identifier of the authoring user.
    pub author_id: i64,
    /// Uniformly chosen article type.
    #[serde(rename = "type")]
    pub article_type: ArticleTypeSeed,
    /// Identifiers of attached categories, without duplicates.
    pub category_ids: Vec<i64>,
    /// Paragraphs separated by blank lines.
    pub content: String,
}
