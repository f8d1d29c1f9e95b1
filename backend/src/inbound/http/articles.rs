//! Article collection.
//!
//! ```text
//! POST /api/v1/articles {"title":"Intro","content":"hello","author":1}
//! ```
//!
//! Articles render their author and categories in full but are written with
//! identifiers. A missing `type` defaults to `UN`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::ResourceRepository;
use crate::domain::{
    Article, ArticleContent, ArticleDraft, ArticleTitle, ArticleType, CategoryId, Error, UserId,
};

use super::resource::HttpResource;
use super::state::HttpState;
use super::validation::{FieldName, require};

/// Write payload for articles.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct ArticlePayload {
    /// Non-blank title, at most 256 characters.
    #[schema(example = "Intro")]
    pub title: Option<String>,
    /// Non-blank body.
    pub content: Option<String>,
    /// Identifier of an existing user.
    #[schema(example = 1)]
    pub author: Option<i64>,
    /// One of `UN`, `TU`, `RS`, `RW`.
    #[serde(rename = "type")]
    #[schema(example = "TU")]
    pub article_type: Option<String>,
    /// Identifiers of existing categories.
    pub categories: Option<Vec<i64>>,
}

impl HttpResource for Article {
    const COLLECTION: &'static str = "articles";
    type Payload = ArticlePayload;

    fn repository(state: &HttpState) -> &Arc<dyn ResourceRepository<Self>> {
        &state.articles
    }

    fn validate(payload: ArticlePayload) -> Result<ArticleDraft, Error> {
        let title = require(payload.title, FieldName::new("title"))?;
        let content = require(payload.content, FieldName::new("content"))?;
        let author = require(payload.author, FieldName::new("author"))?;
        let article_type = match payload.article_type {
            Some(code) => code.parse::<ArticleType>()?,
            None => ArticleType::default(),
        };
        let categories = payload
            .categories
            .unwrap_or_default()
            .into_iter()
            .map(CategoryId::new)
            .collect();

        Ok(ArticleDraft::new(
            ArticleTitle::new(title)?,
            ArticleContent::new(content)?,
            UserId::new(author),
            article_type,
            categories,
        ))
    }

    fn merge(current: &Article, patch: ArticlePayload) -> ArticlePayload {
        ArticlePayload {
            title: patch
                .title
                .or_else(|| Some(current.title.as_str().to_owned())),
            content: patch
                .content
                .or_else(|| Some(current.content.as_str().to_owned())),
            author: patch.author.or(Some(current.author.id.get())),
            article_type: patch
                .article_type
                .or_else(|| Some(current.article_type.code().to_owned())),
            categories: patch.categories.or_else(|| {
                Some(current.categories.iter().map(|c| c.id.get()).collect())
            }),
        }
    }
}
