//! Record factories.
//!
//! Each factory owns its sequence counter and borrows its defaults from a
//! [`FactoryConfig`]. Randomness is always supplied by the caller.

use std::ops::{Range, RangeInclusive};

use fake::Fake;
use fake::faker::lorem::raw::{Paragraph, Sentence};
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::config::FactoryConfig;
use crate::error::GenerationError;
use crate::seed::{ArticleTypeSeed, ExampleArticleSeed, ExampleCategorySeed, ExampleUserSeed};
use crate::selection::{AuthorCycle, select_subset};

/// Monotonic counter producing `prefix_1`, `prefix_2`, ...
#[derive(Debug, Clone)]
struct Sequence {
    prefix: String,
    next: u64,
}

impl Sequence {
    fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_owned(),
            next: 1,
        }
    }

    fn advance(&mut self) -> String {
        let value = format!("{}_{}", self.prefix, self.next);
        self.next += 1;
        value
    }
}

/// Convert an inclusive word/sentence range into the half-open range `fake`
/// expects, rejecting empty ranges.
fn half_open(
    setting: &'static str,
    range: &RangeInclusive<usize>,
) -> Result<Range<usize>, GenerationError> {
    let (start, end) = (*range.start(), *range.end());
    if start == 0 || start > end {
        return Err(GenerationError::InvalidRange {
            setting,
            start,
            end,
        });
    }
    Ok(start..end + 1)
}

/// Generates users with sequential usernames and random names.
///
/// # Example
///
/// ```
/// use example_data::{FactoryConfig, UserFactory, seeded_rng};
///
/// let config = FactoryConfig::default();
/// let mut factory = UserFactory::new(&config);
/// let users = factory.generate_batch(&mut seeded_rng(1), 3);
///
/// let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
/// assert_eq!(names, ["user_1", "user_2", "user_3"]);
/// ```
#[derive(Debug, Clone)]
pub struct UserFactory {
    sequence: Sequence,
    password: String,
}

impl UserFactory {
    /// Create a factory whose sequence starts at one.
    #[must_use]
    pub fn new(config: &FactoryConfig) -> Self {
        Self {
            sequence: Sequence::new(&config.username_prefix),
            password: config.password.clone(),
        }
    }

    /// Generate the next user in the sequence.
    pub fn generate<R>(&mut self, rng: &mut R) -> ExampleUserSeed
    where
        R: Rng + ?Sized,
    {
        ExampleUserSeed {
            username: self.sequence.advance(),
            first_name: FirstName(EN).fake_with_rng(rng),
            last_name: LastName(EN).fake_with_rng(rng),
            password: self.password.clone(),
        }
    }

    /// Generate `count` users.
    pub fn generate_batch<R>(&mut self, rng: &mut R, count: usize) -> Vec<ExampleUserSeed>
    where
        R: Rng + ?Sized,
    {
        (0..count).map(|_| self.generate(rng)).collect()
    }
}

/// Generates categories with sequential names and a random description.
#[derive(Debug, Clone)]
pub struct CategoryFactory {
    sequence: Sequence,
    description_words: Range<usize>,
}

impl CategoryFactory {
    /// Create a factory whose sequence starts at one.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidRange`] when the description word
    /// range is empty.
    pub fn new(config: &FactoryConfig) -> Result<Self, GenerationError> {
        Ok(Self {
            sequence: Sequence::new(&config.category_prefix),
            description_words: half_open("description_words", &config.description_words)?,
        })
    }

    /// Generate the next category in the sequence.
    pub fn generate<R>(&mut self, rng: &mut R) -> ExampleCategorySeed
    where
        R: Rng + ?Sized,
    {
        ExampleCategorySeed {
            name: self.sequence.advance(),
            description: Sentence(EN, self.description_words.clone())
                .fake_with_rng(rng),
        }
    }

    /// Generate `count` categories.
    pub fn generate_batch<R>(&mut self, rng: &mut R, count: usize) -> Vec<ExampleCategorySeed>
    where
        R: Rng + ?Sized,
    {
        (0..count).map(|_| self.generate(rng)).collect()
    }
}

/// Generates articles over existing users and categories.
///
/// Authors are taken round-robin from the identifiers passed to
/// [`ArticleFactory::new`]; categories are sampled from the supplied pool.
///
/// # Example
///
/// ```
/// use example_data::{ArticleFactory, FactoryConfig, seeded_rng};
///
/// let config = FactoryConfig::default();
/// let mut factory = ArticleFactory::new(&config, vec![1, 2], vec![10, 11, 12])
///     .expect("valid factory");
/// let mut rng = seeded_rng(3);
///
/// let first = factory.generate(&mut rng, &[]);
/// let second = factory.generate(&mut rng, &[]);
/// let third = factory.generate(&mut rng, &[]);
/// assert_eq!([first.author_id, second.author_id, third.author_id], [1, 2, 1]);
/// assert!((1..=3).contains(&first.category_ids.len()));
/// ```
#[derive(Debug, Clone)]
pub struct ArticleFactory {
    authors: AuthorCycle,
    category_pool: Vec<i64>,
    title_words: Range<usize>,
    paragraphs: usize,
    sentences_per_paragraph: usize,
    min_categories: usize,
    max_categories: usize,
}

impl ArticleFactory {
    /// Create a factory over the given author and category identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::NoAuthors`] when `authors` is empty and
    /// [`GenerationError::InvalidRange`] when a configured range is empty.
    pub fn new(
        config: &FactoryConfig,
        authors: Vec<i64>,
        category_pool: Vec<i64>,
    ) -> Result<Self, GenerationError> {
        let title_words = half_open("title_words", &config.title_words)?;
        let (min_categories, max_categories) = (
            *config.categories_per_article.start(),
            *config.categories_per_article.end(),
        );
        if min_categories > max_categories {
            return Err(GenerationError::InvalidRange {
                setting: "categories_per_article",
                start: min_categories,
                end: max_categories,
            });
        }
        Ok(Self {
            authors: AuthorCycle::new(authors)?,
            category_pool,
            title_words,
            paragraphs: config.paragraphs,
            sentences_per_paragraph: config.sentences_per_paragraph,
            min_categories,
            max_categories,
        })
    }

    /// Generate the next article.
    ///
    /// `extra_categories` are attached in addition to the randomly sampled
    /// ones; duplicates are removed while keeping first-seen order.
    pub fn generate<R>(&mut self, rng: &mut R, extra_categories: &[i64]) -> ExampleArticleSeed
    where
        R: Rng + ?Sized,
    {
        let title = Sentence(EN, self.title_words.clone()).fake_with_rng(rng);
        let author_id = self.authors.next_author();
        let article_type = ArticleTypeSeed::ALL
            .choose(rng)
            .copied()
            .unwrap_or_default();
        let content = self.generate_content(rng);

        let sampled = select_subset(
            rng,
            &self.category_pool,
            self.min_categories,
            self.max_categories,
        );
        let mut category_ids: Vec<i64> =
            Vec::with_capacity(extra_categories.len() + sampled.len());
        for id in extra_categories.iter().copied().chain(sampled) {
            if !category_ids.contains(&id) {
                category_ids.push(id);
            }
        }

        ExampleArticleSeed {
            title,
            author_id,
            article_type,
            category_ids,
            content,
        }
    }

    /// Generate `count` articles without extra categories.
    pub fn generate_batch<R>(&mut self, rng: &mut R, count: usize) -> Vec<ExampleArticleSeed>
    where
        R: Rng + ?Sized,
    {
        (0..count).map(|_| self.generate(rng, &[])).collect()
    }

    fn generate_content<R>(&self, rng: &mut R) -> String
    where
        R: Rng + ?Sized,
    {
        let sentences = self.sentences_per_paragraph.max(1);
        let mut content = String::new();
        for _ in 0..self.paragraphs {
            let paragraph: String = Paragraph(EN, sentences..sentences + 1).fake_with_rng(rng);
            content.push('\n');
            content.push_str(&paragraph);
            content.push('\n');
        }
        content
    }
}
