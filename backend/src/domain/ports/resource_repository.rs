//! Generic storage port shared by every resource collection.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{
    Article, ArticleDraft, ArticleId, Category, CategoryDraft, CategoryId, User, UserDraft, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Failures reported by resource repositories.
    pub enum ResourcePersistenceError {
        /// The store could not be reached.
        Connection { message: String } => "resource store connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } => "resource store query failed: {message}",
        /// A referenced record does not exist.
        UnknownReference { field: String, id: i64 } => "{field} references missing record {id}",
        /// A unique column already holds the value.
        Conflict { field: String } => "{field} must be unique",
    }
}

/// A record type stored behind a [`ResourceRepository`].
pub trait Entity: Clone + Send + Sync + 'static {
    /// Numeric identifier type.
    type Id: Copy + Eq + Send + Sync + fmt::Display + From<i64> + Into<i64> + 'static;
    /// Validated input for create and replace.
    type Draft: Send + 'static;
    /// Singular name used in messages and logs.
    const NAME: &'static str;

    /// Identifier of this record.
    fn id(&self) -> Self::Id;
}

impl Entity for User {
    type Id = UserId;
    type Draft = UserDraft;
    const NAME: &'static str = "user";

    fn id(&self) -> UserId {
        self.id
    }
}

impl Entity for Category {
    type Id = CategoryId;
    type Draft = CategoryDraft;
    const NAME: &'static str = "category";

    fn id(&self) -> CategoryId {
        self.id
    }
}

impl Entity for Article {
    type Id = ArticleId;
    type Draft = ArticleDraft;
    const NAME: &'static str = "article";

    fn id(&self) -> ArticleId {
        self.id
    }
}

/// Identifier-addressed CRUD over one entity type.
///
/// Implementations must:
/// - return `list` in ascending identifier order;
/// - report missing referenced records as
///   [`ResourcePersistenceError::UnknownReference`];
/// - report unique-column clashes as [`ResourcePersistenceError::Conflict`];
/// - apply cascades (user → articles, category → links) atomically with the
///   parent delete.
#[async_trait]
pub trait ResourceRepository<E: Entity>: Send + Sync {
    /// Every record, ordered by identifier.
    async fn list(&self) -> Result<Vec<E>, ResourcePersistenceError>;

    /// The record with `id`, if present.
    async fn find(&self, id: E::Id) -> Result<Option<E>, ResourcePersistenceError>;

    /// Persist a new record and return it with its assigned identifier.
    async fn create(&self, draft: E::Draft) -> Result<E, ResourcePersistenceError>;

    /// Overwrite the record with `id`; `None` when it does not exist.
    async fn replace(
        &self,
        id: E::Id,
        draft: E::Draft,
    ) -> Result<Option<E>, ResourcePersistenceError>;

    /// Remove the record with `id`; `false` when it does not exist.
    async fn delete(&self, id: E::Id) -> Result<bool, ResourcePersistenceError>;
}
