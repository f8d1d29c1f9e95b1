//! PostgreSQL-backed user storage.
//!
//! Implements both the generic [`ResourceRepository`] for users and the
//! idempotent [`UserRepository`] used by database population. The password
//! column is written but never selected.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{ResourcePersistenceError, ResourceRepository, UserRepository};
use crate::domain::{PasswordHash, PersonName, User, UserDraft, UserId, Username};

use super::diesel_error_mapping::{map_invalid_row, map_pool_error};
use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed user repository.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over the given pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/blog")).await?;
    /// let repository = DieselUserRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn row_to_user(row: UserRow) -> Result<User, ResourcePersistenceError> {
    Ok(User {
        id: UserId::new(row.id),
        username: Username::new(row.username).map_err(map_invalid_row)?,
        first_name: PersonName::first(row.first_name).map_err(map_invalid_row)?,
        last_name: PersonName::last(row.last_name).map_err(map_invalid_row)?,
    })
}

fn new_row<'a>(draft: &'a UserDraft, unusable: &'a PasswordHash) -> NewUserRow<'a> {
    NewUserRow {
        username: draft.username.as_str(),
        first_name: draft.first_name.as_str(),
        last_name: draft.last_name.as_str(),
        password: draft.password.as_ref().unwrap_or(unusable).as_str(),
    }
}

#[async_trait]
impl ResourceRepository<User> for DieselUserRepository {
    async fn list(&self) -> Result<Vec<User>, ResourcePersistenceError> {
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order(users::id.asc())
            .load(&mut conn)
            .await?;
        rows.into_iter().map(row_to_user).collect()
    }

    async fn find(&self, id: UserId) -> Result<Option<User>, ResourcePersistenceError> {
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        row.map(row_to_user).transpose()
    }

    async fn create(&self, draft: UserDraft) -> Result<User, ResourcePersistenceError> {
        let unusable = PasswordHash::unusable();
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;
        let row: UserRow = diesel::insert_into(users::table)
            .values(&new_row(&draft, &unusable))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await?;
        row_to_user(row)
    }

    async fn replace(
        &self,
        id: UserId,
        draft: UserDraft,
    ) -> Result<Option<User>, ResourcePersistenceError> {
        let changes = UserChangeset {
            username: draft.username.as_str(),
            first_name: draft.first_name.as_str(),
            last_name: draft.last_name.as_str(),
            password: draft.password.as_ref().map(PasswordHash::as_str),
        };
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = diesel::update(users::table.find(id.get()))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?;
        row.map(row_to_user).transpose()
    }

    async fn delete(&self, id: UserId) -> Result<bool, ResourcePersistenceError> {
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;
        // Articles go with their author through `ON DELETE CASCADE`.
        let removed = diesel::delete(users::table.find(id.get()))
            .execute(&mut conn)
            .await?;
        Ok(removed > 0)
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn get_or_create(
        &self,
        draft: UserDraft,
    ) -> Result<(User, bool), ResourcePersistenceError> {
        let unusable = PasswordHash::unusable();
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;

        let (row, created) = conn
            .transaction(|conn| {
                async move {
                    let inserted = diesel::insert_into(users::table)
                        .values(&new_row(&draft, &unusable))
                        .on_conflict(users::username)
                        .do_nothing()
                        .execute(conn)
                        .await?;

                    let row: UserRow = users::table
                        .filter(users::username.eq(draft.username.as_str()))
                        .select(UserRow::as_select())
                        .first(conn)
                        .await?;

                    Ok::<_, ResourcePersistenceError>((row, inserted > 0))
                }
                .scope_boxed()
            })
            .await?;

        Ok((row_to_user(row)?, created))
    }
}
