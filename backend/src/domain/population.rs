//! Synthetic database population.
//!
//! [`DatabasePopulator`] turns `example-data` seeds into validated drafts and
//! writes them through the repository ports: users first (get-or-create by
//! username), then categories, then articles spread across every stored user
//! and category. Any failure aborts the run; records written before the
//! failure are kept.

use std::sync::Arc;

use example_data::{
    ArticleFactory, ArticleTypeSeed, CategoryFactory, ExampleArticleSeed, ExampleCategorySeed,
    ExampleUserSeed, FactoryConfig, FactoryRng, GenerationError, UserFactory,
};
use thiserror::Error;
use tracing::{debug, info};

use super::ports::{ResourcePersistenceError, ResourceRepository, UserRepository};
use super::{
    Article, ArticleContent, ArticleDraft, ArticleTitle, ArticleType, Category, CategoryDraft,
    CategoryId, CategoryName, PasswordHash, PersonName, User, UserDraft, UserId, Username,
    ValidationError,
};

/// Errors that abort a population run.
#[derive(Debug, Error)]
pub enum PopulationError {
    /// The factories could not produce records.
    #[error("synthetic data generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// A generated record failed domain validation.
    #[error("generated record failed validation: {0}")]
    InvalidRecord(#[from] ValidationError),
    /// A repository write or read failed.
    #[error("population persistence failed: {0}")]
    Persistence(#[from] ResourcePersistenceError),
}

/// Repository ports the populator writes through.
#[derive(Clone)]
pub struct PopulationPorts {
    /// Get-or-create access to users.
    pub users: Arc<dyn UserRepository>,
    /// Listing access to users, used to pick article authors.
    pub user_records: Arc<dyn ResourceRepository<User>>,
    /// Category storage.
    pub categories: Arc<dyn ResourceRepository<Category>>,
    /// Article storage.
    pub articles: Arc<dyn ResourceRepository<Article>>,
}

/// Parameters of one population run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulationRequest {
    /// Number of users to generate.
    pub user_count: usize,
    /// Categories attached to every generated article in addition to the
    /// randomly sampled ones.
    pub extra_categories: Vec<CategoryId>,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulationOutcome {
    /// Users inserted by this run.
    pub users_created: usize,
    /// Generated usernames that already existed.
    pub users_reused: usize,
    /// Categories inserted.
    pub categories_created: usize,
    /// Articles inserted.
    pub articles_created: usize,
}

/// Service filling the store with synthetic users, categories and articles.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use backend::domain::{DatabasePopulator, PopulationPorts, PopulationRequest};
/// use backend::outbound::memory::InMemoryBlogStore;
/// use example_data::{FactoryConfig, seeded_rng};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = Arc::new(InMemoryBlogStore::new());
/// let populator = DatabasePopulator::new(
///     PopulationPorts {
///         users: store.clone(),
///         user_records: store.clone(),
///         categories: store.clone(),
///         articles: store,
///     },
///     FactoryConfig::default(),
/// );
/// let request = PopulationRequest { user_count: 3, ..PopulationRequest::default() };
/// let outcome = populator
///     .populate(&request, &mut seeded_rng(7))
///     .await
///     .expect("population succeeds");
/// assert_eq!(outcome.users_created, 3);
/// assert_eq!(outcome.articles_created, 20);
/// # });
/// ```
pub struct DatabasePopulator {
    ports: PopulationPorts,
    config: FactoryConfig,
}

impl DatabasePopulator {
    /// Create a populator over the given ports.
    #[must_use]
    pub fn new(ports: PopulationPorts, config: FactoryConfig) -> Self {
        Self { ports, config }
    }

    /// Run the three population steps in order.
    ///
    /// # Errors
    ///
    /// Returns [`PopulationError`] on the first generation, validation or
    /// persistence failure.
    pub async fn populate(
        &self,
        request: &PopulationRequest,
        rng: &mut FactoryRng,
    ) -> Result<PopulationOutcome, PopulationError> {
        let mut outcome = PopulationOutcome::default();

        let mut users = UserFactory::new(&self.config);
        for seed in users.generate_batch(rng, request.user_count) {
            let (user, created) = self.ports.users.get_or_create(user_draft(seed)?).await?;
            if created {
                outcome.users_created += 1;
            } else {
                debug!(username = user.username.as_str(), "reusing existing user");
                outcome.users_reused += 1;
            }
        }

        let mut categories = CategoryFactory::new(&self.config)?;
        for seed in categories.generate_batch(rng, self.config.category_count) {
            self.ports.categories.create(category_draft(seed)?).await?;
            outcome.categories_created += 1;
        }

        let authors: Vec<i64> = self
            .ports
            .user_records
            .list()
            .await?
            .into_iter()
            .map(|user| user.id.get())
            .collect();
        let category_pool: Vec<i64> = self
            .ports
            .categories
            .list()
            .await?
            .into_iter()
            .map(|category| category.id.get())
            .collect();
        let extra: Vec<i64> = request
            .extra_categories
            .iter()
            .map(|id| id.get())
            .collect();

        let mut articles = ArticleFactory::new(&self.config, authors, category_pool)?;
        for _ in 0..self.config.article_count {
            let seed = articles.generate(rng, &extra);
            self.ports.articles.create(article_draft(seed)?).await?;
            outcome.articles_created += 1;
        }

        info!(
            users_created = outcome.users_created,
            users_reused = outcome.users_reused,
            categories_created = outcome.categories_created,
            articles_created = outcome.articles_created,
            "database population finished"
        );
        Ok(outcome)
    }
}

fn user_draft(seed: ExampleUserSeed) -> Result<UserDraft, ValidationError> {
    Ok(UserDraft {
        username: Username::new(seed.username)?,
        first_name: PersonName::first(seed.first_name)?,
        last_name: PersonName::last(seed.last_name)?,
        password: Some(PasswordHash::generate(&seed.password)),
    })
}

fn category_draft(seed: ExampleCategorySeed) -> Result<CategoryDraft, ValidationError> {
    Ok(CategoryDraft {
        name: CategoryName::new(seed.name)?,
        description: Some(seed.description),
    })
}

fn article_draft(seed: ExampleArticleSeed) -> Result<ArticleDraft, ValidationError> {
    Ok(ArticleDraft::new(
        ArticleTitle::new(seed.title)?,
        ArticleContent::new(seed.content)?,
        UserId::new(seed.author_id),
        article_type(seed.article_type),
        seed.category_ids.into_iter().map(CategoryId::new).collect(),
    ))
}

fn article_type(seed: ArticleTypeSeed) -> ArticleType {
    match seed {
        ArticleTypeSeed::Unspecified => ArticleType::Unspecified,
        ArticleTypeSeed::Tutorial => ArticleType::Tutorial,
        ArticleTypeSeed::Research => ArticleType::Research,
        ArticleTypeSeed::Review => ArticleType::Review,
    }
}

#[cfg(test)]
mod tests {
    use example_data::seeded_rng;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::outbound::memory::InMemoryBlogStore;

    fn ports_with_users(
        users: Arc<dyn UserRepository>,
        store: &Arc<InMemoryBlogStore>,
    ) -> PopulationPorts {
        PopulationPorts {
            users,
            user_records: store.clone(),
            categories: store.clone(),
            articles: store.clone(),
        }
    }

    #[rstest]
    #[case(ArticleTypeSeed::Unspecified, "UN")]
    #[case(ArticleTypeSeed::Tutorial, "TU")]
    #[case(ArticleTypeSeed::Research, "RS")]
    #[case(ArticleTypeSeed::Review, "RW")]
    fn seed_types_map_to_matching_codes(#[case] seed: ArticleTypeSeed, #[case] code: &str) {
        assert_eq!(article_type(seed).code(), code);
        assert_eq!(seed.code(), code);
    }

    #[rstest]
    fn generated_users_receive_hashed_passwords() {
        let draft = user_draft(ExampleUserSeed {
            username: "user_1".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            password: "helloworld".to_owned(),
        })
        .expect("valid seed");
        let password = draft.password.expect("password set");
        assert!(password.verify("helloworld"));
    }

    #[tokio::test]
    async fn persistence_failure_aborts_before_categories() {
        let mut users = MockUserRepository::new();
        users
            .expect_get_or_create()
            .times(1)
            .returning(|_| Err(ResourcePersistenceError::connection("refused")));
        let store = Arc::new(InMemoryBlogStore::new());
        let populator = DatabasePopulator::new(
            ports_with_users(Arc::new(users), &store),
            FactoryConfig::default(),
        );

        let request = PopulationRequest {
            user_count: 2,
            ..PopulationRequest::default()
        };
        let error = populator
            .populate(&request, &mut seeded_rng(1))
            .await
            .expect_err("population should fail");

        assert!(matches!(
            error,
            PopulationError::Persistence(ResourcePersistenceError::Connection { .. })
        ));
        assert!(
            ResourceRepository::<Category>::list(store.as_ref())
                .await
                .expect("list categories")
                .is_empty()
        );
    }

    #[tokio::test]
    async fn zero_users_on_empty_store_reports_missing_authors() {
        let store = Arc::new(InMemoryBlogStore::new());
        let populator = DatabasePopulator::new(
            ports_with_users(store.clone(), &store),
            FactoryConfig::default(),
        );
        let error = populator
            .populate(&PopulationRequest::default(), &mut seeded_rng(2))
            .await
            .expect_err("no authors available");
        assert!(matches!(
            error,
            PopulationError::Generation(GenerationError::NoAuthors)
        ));
    }
}
