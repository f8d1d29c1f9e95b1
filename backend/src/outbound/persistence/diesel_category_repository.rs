//! PostgreSQL-backed category storage.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ResourcePersistenceError, ResourceRepository};
use crate::domain::{Category, CategoryDraft, CategoryId, CategoryName};

use super::diesel_error_mapping::{map_invalid_row, map_pool_error};
use super::models::{CategoryRow, CategoryValues};
use super::pool::DbPool;
use super::schema::categories;

/// Diesel-backed category repository.
#[derive(Clone)]
pub struct DieselCategoryRepository {
    pool: DbPool,
}

impl DieselCategoryRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn row_to_category(row: CategoryRow) -> Result<Category, ResourcePersistenceError> {
    Ok(Category {
        id: CategoryId::new(row.id),
        name: CategoryName::new(row.name).map_err(map_invalid_row)?,
        description: row.description,
    })
}

fn values(draft: &CategoryDraft) -> CategoryValues<'_> {
    CategoryValues {
        name: draft.name.as_str(),
        description: draft.description.as_deref(),
    }
}

#[async_trait]
impl ResourceRepository<Category> for DieselCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, ResourcePersistenceError> {
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;
        let rows: Vec<CategoryRow> = categories::table
            .select(CategoryRow::as_select())
            .order(categories::id.asc())
            .load(&mut conn)
            .await?;
        rows.into_iter().map(row_to_category).collect()
    }

    async fn find(&self, id: CategoryId) -> Result<Option<Category>, ResourcePersistenceError> {
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;
        let row: Option<CategoryRow> = categories::table
            .find(id.get())
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        row.map(row_to_category).transpose()
    }

    async fn create(&self, draft: CategoryDraft) -> Result<Category, ResourcePersistenceError> {
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;
        let row: CategoryRow = diesel::insert_into(categories::table)
            .values(&values(&draft))
            .returning(CategoryRow::as_returning())
            .get_result(&mut conn)
            .await?;
        row_to_category(row)
    }

    async fn replace(
        &self,
        id: CategoryId,
        draft: CategoryDraft,
    ) -> Result<Option<Category>, ResourcePersistenceError> {
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;
        let row: Option<CategoryRow> = diesel::update(categories::table.find(id.get()))
            .set(&values(&draft))
            .returning(CategoryRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?;
        row.map(row_to_category).transpose()
    }

    async fn delete(&self, id: CategoryId) -> Result<bool, ResourcePersistenceError> {
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;
        // Link rows go through `ON DELETE CASCADE`; articles stay.
        let removed = diesel::delete(categories::table.find(id.get()))
            .execute(&mut conn)
            .await?;
        Ok(removed > 0)
    }
}
