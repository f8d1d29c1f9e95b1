//! Process-local store implementing every repository port.
//!
//! All state sits behind one mutex, so each operation, cascades included, is
//! atomic with respect to the others. Identifiers start at 1 and are never
//! reused. Article timestamps come from an injected [`Clock`] and never move
//! backwards.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use tracing::debug;

use crate::domain::ports::{ResourcePersistenceError, ResourceRepository, UserRepository};
use crate::domain::{
    Article, ArticleContent, ArticleDraft, ArticleId, ArticleTitle, ArticleType, Category,
    CategoryDraft, CategoryId, PasswordHash, User, UserDraft, UserId,
};

struct StoredUser {
    user: User,
    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "credentials are stored but nothing authenticates yet")
    )]
    password: PasswordHash,
}

struct StoredArticle {
    title: ArticleTitle,
    author: UserId,
    article_type: ArticleType,
    categories: BTreeSet<CategoryId>,
    content: ArticleContent,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
struct StoreState {
    users: BTreeMap<UserId, StoredUser>,
    categories: BTreeMap<CategoryId, Category>,
    articles: BTreeMap<ArticleId, StoredArticle>,
    last_user_id: i64,
    last_category_id: i64,
    last_article_id: i64,
    last_timestamp: Option<DateTime<Utc>>,
}

impl StoreState {
    fn username_taken(&self, username: &str, except: Option<UserId>) -> bool {
        self.users.values().any(|stored| {
            stored.user.username.as_str() == username && Some(stored.user.id) != except
        })
    }

    fn insert_user(&mut self, draft: UserDraft) -> Result<User, ResourcePersistenceError> {
        if self.username_taken(draft.username.as_str(), None) {
            return Err(ResourcePersistenceError::conflict("username"));
        }
        self.last_user_id += 1;
        let user = User {
            id: UserId::new(self.last_user_id),
            username: draft.username,
            first_name: draft.first_name,
            last_name: draft.last_name,
        };
        self.users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password: draft.password.unwrap_or_else(PasswordHash::unusable),
            },
        );
        Ok(user)
    }

    fn check_references(&self, draft: &ArticleDraft) -> Result<(), ResourcePersistenceError> {
        if !self.users.contains_key(&draft.author) {
            return Err(ResourcePersistenceError::unknown_reference(
                "author",
                draft.author.get(),
            ));
        }
        if let Some(missing) = draft
            .categories()
            .iter()
            .find(|id| !self.categories.contains_key(id))
        {
            return Err(ResourcePersistenceError::unknown_reference(
                "categories",
                missing.get(),
            ));
        }
        Ok(())
    }

    /// Current time, clamped so it never precedes an earlier stamp.
    fn stamp(&mut self, clock: &dyn Clock) -> DateTime<Utc> {
        let now = clock.utc();
        let now = self.last_timestamp.map_or(now, |last| last.max(now));
        self.last_timestamp = Some(now);
        now
    }

    fn render_article(
        &self,
        id: ArticleId,
        stored: &StoredArticle,
    ) -> Result<Article, ResourcePersistenceError> {
        let author = self
            .users
            .get(&stored.author)
            .map(|u| u.user.clone())
            .ok_or_else(|| {
                ResourcePersistenceError::query(format!("article {id} has no author"))
            })?;
        let categories = stored
            .categories
            .iter()
            .filter_map(|category_id| self.categories.get(category_id).cloned())
            .collect();
        Ok(Article {
            id,
            title: stored.title.clone(),
            author,
            article_type: stored.article_type,
            categories,
            content: stored.content.clone(),
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        })
    }
}

/// In-memory blog store.
///
/// # Examples
/// ```
/// use backend::domain::ports::ResourceRepository;
/// use backend::domain::{Category, CategoryDraft, CategoryName};
/// use backend::outbound::memory::InMemoryBlogStore;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = InMemoryBlogStore::new();
/// let draft = CategoryDraft {
///     name: CategoryName::new("rust").expect("valid name"),
///     description: None,
/// };
/// let created = ResourceRepository::<Category>::create(&store, draft)
///     .await
///     .expect("create succeeds");
/// assert_eq!(created.id.get(), 1);
/// # });
/// ```
pub struct InMemoryBlogStore {
    state: Mutex<StoreState>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryBlogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBlogStore {
    /// Empty store stamping articles with the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Empty store stamping articles with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, ResourcePersistenceError> {
        self.state
            .lock()
            .map_err(|_| ResourcePersistenceError::query("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl ResourceRepository<User> for InMemoryBlogStore {
    async fn list(&self) -> Result<Vec<User>, ResourcePersistenceError> {
        let state = self.lock()?;
        Ok(state.users.values().map(|s| s.user.clone()).collect())
    }

    async fn find(&self, id: UserId) -> Result<Option<User>, ResourcePersistenceError> {
        let state = self.lock()?;
        Ok(state.users.get(&id).map(|s| s.user.clone()))
    }

    async fn create(&self, draft: UserDraft) -> Result<User, ResourcePersistenceError> {
        self.lock()?.insert_user(draft)
    }

    async fn replace(
        &self,
        id: UserId,
        draft: UserDraft,
    ) -> Result<Option<User>, ResourcePersistenceError> {
        let mut state = self.lock()?;
        if !state.users.contains_key(&id) {
            return Ok(None);
        }
        if state.username_taken(draft.username.as_str(), Some(id)) {
            return Err(ResourcePersistenceError::conflict("username"));
        }
        let Some(stored) = state.users.get_mut(&id) else {
            return Ok(None);
        };
        stored.user.username = draft.username;
        stored.user.first_name = draft.first_name;
        stored.user.last_name = draft.last_name;
        if let Some(password) = draft.password {
            stored.password = password;
        }
        Ok(Some(stored.user.clone()))
    }

    async fn delete(&self, id: UserId) -> Result<bool, ResourcePersistenceError> {
        let mut state = self.lock()?;
        if state.users.remove(&id).is_none() {
            return Ok(false);
        }
        let before = state.articles.len();
        state.articles.retain(|_, article| article.author != id);
        debug!(user_id = %id, removed_articles = before - state.articles.len(), "user deleted");
        Ok(true)
    }
}

#[async_trait]
impl UserRepository for InMemoryBlogStore {
    async fn get_or_create(
        &self,
        draft: UserDraft,
    ) -> Result<(User, bool), ResourcePersistenceError> {
        let mut state = self.lock()?;
        let existing = state
            .users
            .values()
            .find(|s| s.user.username == draft.username)
            .map(|s| s.user.clone());
        match existing {
            Some(user) => Ok((user, false)),
            None => state.insert_user(draft).map(|user| (user, true)),
        }
    }
}

#[async_trait]
impl ResourceRepository<Category> for InMemoryBlogStore {
    async fn list(&self) -> Result<Vec<Category>, ResourcePersistenceError> {
        Ok(self.lock()?.categories.values().cloned().collect())
    }

    async fn find(&self, id: CategoryId) -> Result<Option<Category>, ResourcePersistenceError> {
        Ok(self.lock()?.categories.get(&id).cloned())
    }

    async fn create(&self, draft: CategoryDraft) -> Result<Category, ResourcePersistenceError> {
        let mut state = self.lock()?;
        state.last_category_id += 1;
        let category = Category {
            id: CategoryId::new(state.last_category_id),
            name: draft.name,
            description: draft.description,
        };
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn replace(
        &self,
        id: CategoryId,
        draft: CategoryDraft,
    ) -> Result<Option<Category>, ResourcePersistenceError> {
        let mut state = self.lock()?;
        Ok(state.categories.get_mut(&id).map(|category| {
            category.name = draft.name;
            category.description = draft.description;
            category.clone()
        }))
    }

    async fn delete(&self, id: CategoryId) -> Result<bool, ResourcePersistenceError> {
        let mut state = self.lock()?;
        if state.categories.remove(&id).is_none() {
            return Ok(false);
        }
        for article in state.articles.values_mut() {
            article.categories.remove(&id);
        }
        Ok(true)
    }
}

#[async_trait]
impl ResourceRepository<Article> for InMemoryBlogStore {
    async fn list(&self) -> Result<Vec<Article>, ResourcePersistenceError> {
        let state = self.lock()?;
        state
            .articles
            .iter()
            .map(|(id, stored)| state.render_article(*id, stored))
            .collect()
    }

    async fn find(&self, id: ArticleId) -> Result<Option<Article>, ResourcePersistenceError> {
        let state = self.lock()?;
        state
            .articles
            .get(&id)
            .map(|stored| state.render_article(id, stored))
            .transpose()
    }

    async fn create(&self, draft: ArticleDraft) -> Result<Article, ResourcePersistenceError> {
        let mut state = self.lock()?;
        state.check_references(&draft)?;
        let now = state.stamp(self.clock.as_ref());
        state.last_article_id += 1;
        let id = ArticleId::new(state.last_article_id);
        let stored = StoredArticle {
            categories: draft.categories().iter().copied().collect(),
            title: draft.title,
            author: draft.author,
            article_type: draft.article_type,
            content: draft.content,
            created_at: now,
            updated_at: now,
        };
        let article = state.render_article(id, &stored)?;
        state.articles.insert(id, stored);
        Ok(article)
    }

    async fn replace(
        &self,
        id: ArticleId,
        draft: ArticleDraft,
    ) -> Result<Option<Article>, ResourcePersistenceError> {
        let mut state = self.lock()?;
        if !state.articles.contains_key(&id) {
            return Ok(None);
        }
        state.check_references(&draft)?;
        let now = state.stamp(self.clock.as_ref());
        let Some(stored) = state.articles.get_mut(&id) else {
            return Ok(None);
        };
        stored.categories = draft.categories().iter().copied().collect();
        stored.title = draft.title;
        stored.author = draft.author;
        stored.article_type = draft.article_type;
        stored.content = draft.content;
        stored.updated_at = now.max(stored.created_at);
        let state = &*state;
        state
            .articles
            .get(&id)
            .map(|stored| state.render_article(id, stored))
            .transpose()
    }

    async fn delete(&self, id: ArticleId) -> Result<bool, ResourcePersistenceError> {
        Ok(self.lock()?.articles.remove(&id).is_some())
    }
}
