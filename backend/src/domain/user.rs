//! Blog users.
//!
//! A user owns a unique [`Username`], optional first and last names and a
//! [`PasswordHash`]. Only the public fields serialise; the credential is held
//! by [`UserDraft`] on the way into storage and never read back out.

use serde::{Deserialize, Serialize};

use super::identifier::define_entity_id;
use super::password::PasswordHash;
use super::validation::{ValidationError, bounded};

/// Maximum characters in a username.
pub const USERNAME_MAX_CHARS: usize = 150;
/// Maximum characters in a first or last name.
pub const PERSON_NAME_MAX_CHARS: usize = 150;

define_entity_id! {
    /// Identifier of a stored user.
    UserId
}

/// Login name: letters, digits and `@ . + - _`, unique across users.
///
/// # Examples
/// ```
/// use backend::domain::Username;
///
/// assert!(Username::new("ada.lovelace+blog@example").is_ok());
/// assert!(Username::new("ada lovelace").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and wrap a username.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the name is blank, too long or holds
    /// characters outside the allowed set.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        const FIELD: &str = "username";
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Blank { field: FIELD });
        }
        let value = bounded(FIELD, value, USERNAME_MAX_CHARS)?;
        if !value.chars().all(is_username_char) {
            return Err(ValidationError::InvalidCharacters { field: FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the username text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}

impl TryFrom<String> for Username {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// First or last name; may be blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    /// Validate a first name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TooLong`] past [`PERSON_NAME_MAX_CHARS`].
    pub fn first(value: impl Into<String>) -> Result<Self, ValidationError> {
        bounded("first_name", value.into(), PERSON_NAME_MAX_CHARS)
            .map(Self)
    }

    /// Validate a last name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TooLong`] past [`PERSON_NAME_MAX_CHARS`].
    pub fn last(value: impl Into<String>) -> Result<Self, ValidationError> {
        bounded("last_name", value.into(), PERSON_NAME_MAX_CHARS)
            .map(Self)
    }

    /// Borrow the name text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A stored user as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: Username,
    /// First name, possibly blank.
    pub first_name: PersonName,
    /// Last name, possibly blank.
    pub last_name: PersonName,
}

/// Validated values for creating or replacing a user.
///
/// A `None` password stores the unusable marker on create and keeps the
/// existing credential on replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    /// Unique login name.
    pub username: Username,
    /// First name.
    pub first_name: PersonName,
    /// Last name.
    pub last_name: PersonName,
    /// New credential, if one was supplied.
    pub password: Option<PasswordHash>,
}
