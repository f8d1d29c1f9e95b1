//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data` so they depend only
//! on repository ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::ResourceRepository;
use crate::domain::{Article, Category, User};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn ResourceRepository<User>>,
    pub categories: Arc<dyn ResourceRepository<Category>>,
    pub articles: Arc<dyn ResourceRepository<Article>>,
}

impl HttpState {
    /// Bundle one repository per collection.
    pub fn new(
        users: Arc<dyn ResourceRepository<User>>,
        categories: Arc<dyn ResourceRepository<Category>>,
        articles: Arc<dyn ResourceRepository<Article>>,
    ) -> Self {
        Self {
            users,
            categories,
            articles,
        }
    }

    /// Serve every collection from a single store.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::inbound::http::state::HttpState;
    /// use backend::outbound::memory::InMemoryBlogStore;
    ///
    /// let state = HttpState::from_store(Arc::new(InMemoryBlogStore::new()));
    /// # let _ = state;
    /// ```
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: ResourceRepository<User>
            + ResourceRepository<Category>
            + ResourceRepository<Article>
            + 'static,
    {
        let users: Arc<dyn ResourceRepository<User>> = store.clone();
        let categories: Arc<dyn ResourceRepository<Category>> = store.clone();
        let articles: Arc<dyn ResourceRepository<Article>> = store;
        Self::new(users, categories, articles)
    }
}
