//! Category collection.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::ResourceRepository;
use crate::domain::{Category, CategoryDraft, CategoryName, Error};

use super::resource::HttpResource;
use super::state::HttpState;
use super::validation::{FieldName, require};

/// Write payload for categories.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct CategoryPayload {
    /// Display name, at most 24 characters.
    #[schema(example = "rust")]
    pub name: Option<String>,
    /// `None` when the key is absent, `Some(None)` for an explicit `null`.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

/// Distinguish an explicit `null` from a missing key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl HttpResource for Category {
    const COLLECTION: &'static str = "categories";
    type Payload = CategoryPayload;

    fn repository(state: &HttpState) -> &Arc<dyn ResourceRepository<Self>> {
        &state.categories
    }

    fn validate(payload: CategoryPayload) -> Result<CategoryDraft, Error> {
        let name = require(payload.name, FieldName::new("name"))?;
        Ok(CategoryDraft {
            name: CategoryName::new(name)?,
            description: payload.description.flatten(),
        })
    }

    fn merge(current: &Category, patch: CategoryPayload) -> CategoryPayload {
        CategoryPayload {
            name: patch
                .name
                .or_else(|| Some(current.name.as_str().to_owned())),
            description: patch
                .description
                .or_else(|| Some(current.description.clone())),
        }
    }
}
