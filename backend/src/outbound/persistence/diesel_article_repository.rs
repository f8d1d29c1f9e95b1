//! PostgreSQL-backed article storage.
//!
//! Article rows hold the author reference and type code; category links live
//! in `article_categories`. Every mutation runs in one transaction so an
//! article is never visible with a partial category set.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use mockable::Clock;

use crate::domain::ports::{ResourcePersistenceError, ResourceRepository};
use crate::domain::{
    Article, ArticleContent, ArticleDraft, ArticleId, ArticleTitle, ArticleType, Category, User,
};

use super::diesel_category_repository::row_to_category;
use super::diesel_error_mapping::{map_invalid_row, map_pool_error};
use super::diesel_user_repository::row_to_user;
use super::models::{
    ArticleCategoryRow, ArticleChangeset, ArticleRow, CategoryRow, NewArticleRow, UserRow,
};
use super::pool::DbPool;
use super::schema::{article_categories, articles, categories, users};

/// Diesel-backed article repository.
#[derive(Clone)]
pub struct DieselArticleRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselArticleRepository {
    /// Create a repository stamping articles with `clock`.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

/// Reject drafts whose author or categories are missing.
async fn check_references(
    conn: &mut AsyncPgConnection,
    draft: &ArticleDraft,
) -> Result<(), ResourcePersistenceError> {
    let author_exists: bool =
        diesel::select(diesel::dsl::exists(users::table.find(draft.author.get())))
            .get_result(conn)
            .await?;
    if !author_exists {
        return Err(ResourcePersistenceError::unknown_reference(
            "author",
            draft.author.get(),
        ));
    }

    let wanted: Vec<i64> = draft.categories().iter().map(|id| id.get()).collect();
    if wanted.is_empty() {
        return Ok(());
    }
    let found: Vec<i64> = categories::table
        .filter(categories::id.eq_any(&wanted))
        .select(categories::id)
        .load(conn)
        .await?;
    match wanted.iter().find(|id| !found.contains(id)) {
        Some(missing) => Err(ResourcePersistenceError::unknown_reference(
            "categories",
            *missing,
        )),
        None => Ok(()),
    }
}

async fn write_links(
    conn: &mut AsyncPgConnection,
    article_id: i64,
    draft: &ArticleDraft,
) -> Result<(), ResourcePersistenceError> {
    diesel::delete(
        article_categories::table.filter(article_categories::article_id.eq(article_id)),
    )
    .execute(conn)
    .await?;

    let links: Vec<ArticleCategoryRow> = draft
        .categories()
        .iter()
        .map(|category| ArticleCategoryRow {
            article_id,
            category_id: category.get(),
        })
        .collect();
    if !links.is_empty() {
        diesel::insert_into(article_categories::table)
            .values(&links)
            .execute(conn)
            .await?;
    }
    Ok(())
}

/// Load authors and categories for `rows` and assemble domain articles.
async fn render(
    conn: &mut AsyncPgConnection,
    rows: Vec<ArticleRow>,
) -> Result<Vec<Article>, ResourcePersistenceError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let article_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let mut author_ids: Vec<i64> = rows.iter().map(|row| row.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let author_rows: Vec<UserRow> = users::table
        .filter(users::id.eq_any(&author_ids))
        .select(UserRow::as_select())
        .load(conn)
        .await?;
    let mut authors: HashMap<i64, User> = HashMap::with_capacity(author_rows.len());
    for row in author_rows {
        authors.insert(row.id, row_to_user(row)?);
    }

    let link_rows: Vec<(i64, CategoryRow)> = article_categories::table
        .inner_join(categories::table)
        .filter(article_categories::article_id.eq_any(&article_ids))
        .select((article_categories::article_id, CategoryRow::as_select()))
        .order(categories::id.asc())
        .load(conn)
        .await?;
    let mut linked: HashMap<i64, Vec<Category>> = HashMap::new();
    for (article_id, row) in link_rows {
        linked
            .entry(article_id)
            .or_default()
            .push(row_to_category(row)?);
    }

    rows.into_iter()
        .map(|row| {
            let author = authors.get(&row.author_id).cloned().ok_or_else(|| {
                ResourcePersistenceError::query(format!("article {} has no author", row.id))
            })?;
            let categories = linked.remove(&row.id).unwrap_or_default();
            row_to_article(row, author, categories)
        })
        .collect()
}

async fn render_one(
    conn: &mut AsyncPgConnection,
    row: ArticleRow,
) -> Result<Article, ResourcePersistenceError> {
    let id = row.id;
    render(conn, vec![row])
        .await?
        .pop()
        .ok_or_else(|| ResourcePersistenceError::query(format!("article {id} vanished")))
}

fn row_to_article(
    row: ArticleRow,
    author: User,
    categories: Vec<Category>,
) -> Result<Article, ResourcePersistenceError> {
    Ok(Article {
        id: ArticleId::new(row.id),
        title: ArticleTitle::new(row.title).map_err(map_invalid_row)?,
        author,
        article_type: row
            .article_type
            .parse::<ArticleType>()
            .map_err(map_invalid_row)?,
        categories,
        content: ArticleContent::new(row.content).map_err(map_invalid_row)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// `updated_at` never precedes `created_at` nor the previous stamp, whatever
/// the clock says.
fn updated_stamp(
    now: DateTime<Utc>,
    created_at: DateTime<Utc>,
    previous: DateTime<Utc>,
) -> DateTime<Utc> {
    now.max(created_at).max(previous)
}

#[async_trait]
impl ResourceRepository<Article> for DieselArticleRepository {
    async fn list(&self) -> Result<Vec<Article>, ResourcePersistenceError> {
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;
        let rows: Vec<ArticleRow> = articles::table
            .select(ArticleRow::as_select())
            .order(articles::id.asc())
            .load(&mut conn)
            .await?;
        render(&mut conn, rows).await
    }

    async fn find(&self, id: ArticleId) -> Result<Option<Article>, ResourcePersistenceError> {
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;
        let row: Option<ArticleRow> = articles::table
            .find(id.get())
            .select(ArticleRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        match row {
            Some(row) => render_one(&mut conn, row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn create(&self, draft: ArticleDraft) -> Result<Article, ResourcePersistenceError> {
        let now = self.clock.utc();
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                check_references(conn, &draft).await?;

                let row: ArticleRow = diesel::insert_into(articles::table)
                    .values(&NewArticleRow {
                        title: draft.title.as_str(),
                        author_id: draft.author.get(),
                        article_type: draft.article_type.code(),
                        content: draft.content.as_str(),
                        created_at: now,
                        updated_at: now,
                    })
                    .returning(ArticleRow::as_returning())
                    .get_result(conn)
                    .await?;

                write_links(conn, row.id, &draft).await?;
                render_one(conn, row).await
            }
            .scope_boxed()
        })
        .await
    }

    async fn replace(
        &self,
        id: ArticleId,
        draft: ArticleDraft,
    ) -> Result<Option<Article>, ResourcePersistenceError> {
        let now = self.clock.utc();
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let stamps: Option<(DateTime<Utc>, DateTime<Utc>)> = articles::table
                    .find(id.get())
                    .select((articles::created_at, articles::updated_at))
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let Some((created_at, previous)) = stamps else {
                    return Ok(None);
                };

                check_references(conn, &draft).await?;

                let row: ArticleRow = diesel::update(articles::table.find(id.get()))
                    .set(&ArticleChangeset {
                        title: draft.title.as_str(),
                        author_id: draft.author.get(),
                        article_type: draft.article_type.code(),
                        content: draft.content.as_str(),
                        updated_at: updated_stamp(now, created_at, previous),
                    })
                    .returning(ArticleRow::as_returning())
                    .get_result(conn)
                    .await?;

                write_links(conn, row.id, &draft).await?;
                render_one(conn, row).await.map(Some)
            }
            .scope_boxed()
        })
        .await
    }

    async fn delete(&self, id: ArticleId) -> Result<bool, ResourcePersistenceError> {
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;
        let removed = diesel::delete(articles::table.find(id.get()))
            .execute(&mut conn)
            .await?;
        Ok(removed > 0)
    }
}
