//! User collection.
//!
//! ```text
//! POST /api/v1/users {"username":"ada","first_name":"Ada","password":"s3cret"}
//! ```
//!
//! Passwords are accepted on write, stored hashed and never rendered.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::ResourceRepository;
use crate::domain::{Error, PasswordHash, PersonName, User, UserDraft, Username};

use super::resource::HttpResource;
use super::state::HttpState;
use super::validation::{FieldName, require};

/// Write payload for users.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UserPayload {
    /// Unique login name.
    #[schema(example = "ada")]
    pub username: Option<String>,
    /// First name; blank when omitted.
    pub first_name: Option<String>,
    /// Last name; blank when omitted.
    pub last_name: Option<String>,
    /// Plain-text password; omitted keeps the stored credential.
    #[schema(write_only)]
    pub password: Option<String>,
}

impl HttpResource for User {
    const COLLECTION: &'static str = "users";
    type Payload = UserPayload;

    fn repository(state: &HttpState) -> &Arc<dyn ResourceRepository<Self>> {
        &state.users
    }

    fn validate(payload: UserPayload) -> Result<UserDraft, Error> {
        let username = require(payload.username, FieldName::new("username"))?;
        Ok(UserDraft {
            username: Username::new(username)?,
            first_name: PersonName::first(payload.first_name.unwrap_or_default())?,
            last_name: PersonName::last(payload.last_name.unwrap_or_default())?,
            password: payload.password.as_deref().map(PasswordHash::generate),
        })
    }

    fn merge(current: &User, patch: UserPayload) -> UserPayload {
        UserPayload {
            username: patch
                .username
                .or_else(|| Some(current.username.as_str().to_owned())),
            first_name: patch
                .first_name
                .or_else(|| Some(current.first_name.as_str().to_owned())),
            last_name: patch
                .last_name
                .or_else(|| Some(current.last_name.as_str().to_owned())),
            password: patch.password,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;
    use crate::domain::UserId;

    #[fixture]
    fn stored() -> User {
        User {
            id: UserId::new(1),
            username: Username::new("ada").expect("valid"),
            first_name: PersonName::first("Ada").expect("valid"),
            last_name: PersonName::last("Lovelace").expect("valid"),
        }
    }

    #[rstest]
    fn names_default_to_blank() {
        let draft = User::validate(UserPayload {
            username: Some("grace".to_owned()),
            ..UserPayload::default()
        })
        .expect("valid payload");
        assert_eq!(draft.first_name.as_str(), "");
        assert_eq!(draft.last_name.as_str(), "");
        assert!(draft.password.is_none());
    }

    #[rstest]
    fn password_is_hashed() {
        let draft = User::validate(UserPayload {
            username: Some("grace".to_owned()),
            password: Some("hunter2".to_owned()),
            ..UserPayload::default()
        })
        .expect("valid payload");
        let hash = draft.password.expect("password supplied");
        assert_ne!(hash.as_str(), "hunter2");
        assert!(hash.verify("hunter2"));
    }

    #[rstest]
    fn missing_username_is_reported() {
        let err = User::validate(UserPayload::default()).expect_err("username required");
        assert_eq!(
            err.details(),
            Some(&json!({"field": "username", "code": "missing_field"}))
        );
    }

    #[rstest]
    fn merge_keeps_unspecified_fields(stored: User) {
        let merged = User::merge(
            &stored,
            UserPayload {
                last_name: Some("Byron".to_owned()),
                ..UserPayload::default()
            },
        );
        assert_eq!(merged.username.as_deref(), Some("ada"));
        assert_eq!(merged.first_name.as_deref(), Some("Ada"));
        assert_eq!(merged.last_name.as_deref(), Some("Byron"));
        assert!(merged.password.is_none());
    }
}
