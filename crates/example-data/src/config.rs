//! Factory configuration.
//!
//! Every default the factories use is an explicit field here rather than a
//! module-level constant, so callers can tune generation per run.

use std::ops::RangeInclusive;

/// Placeholder password shared by every generated user.
const DEFAULT_PASSWORD: &str = "helloworld";

/// Configuration consumed by [`crate::UserFactory`], [`crate::CategoryFactory`]
/// and [`crate::ArticleFactory`].
///
/// # Example
///
/// ```
/// use example_data::FactoryConfig;
///
/// let config = FactoryConfig::default().with_password("s3cret");
/// assert_eq!(config.password, "s3cret");
/// assert_eq!(config.username_prefix, "user");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryConfig {
    /// Password assigned to every generated user.
    pub password: String,
    /// Prefix for sequential usernames (`user` produces `user_1`, `user_2`).
    pub username_prefix: String,
    /// Prefix for sequential category names.
    pub category_prefix: String,
    /// Number of categories a population run creates.
    pub category_count: usize,
    /// Number of articles a population run creates.
    pub article_count: usize,
    /// Word count range for generated category descriptions.
    pub description_words: RangeInclusive<usize>,
    /// Word count range for generated article titles.
    pub title_words: RangeInclusive<usize>,
    /// Number of paragraphs in generated article content.
    pub paragraphs: usize,
    /// Number of sentences in each generated paragraph.
    pub sentences_per_paragraph: usize,
    /// Bounds on the number of random categories attached to an article.
    pub categories_per_article: RangeInclusive<usize>,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            password: DEFAULT_PASSWORD.to_owned(),
            username_prefix: "user".to_owned(),
            category_prefix: "category".to_owned(),
            category_count: 5,
            article_count: 20,
            // Roughly six and twelve words, varied by up to 40%.
            description_words: 4..=8,
            title_words: 8..=16,
            paragraphs: 5,
            sentences_per_paragraph: 30,
            categories_per_article: 1..=3,
        }
    }
}

impl FactoryConfig {
    /// Replace the shared user password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Replace the number of articles a run creates.
    #[must_use]
    pub const fn with_article_count(mut self, article_count: usize) -> Self {
        self.article_count = article_count;
        self
    }

    /// Replace the number of categories a run creates.
    #[must_use]
    pub const fn with_category_count(mut self, category_count: usize) -> Self {
        self.category_count = category_count;
        self
    }
}
