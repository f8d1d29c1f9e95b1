//! User-specific storage port used by the population service.

use async_trait::async_trait;

use crate::domain::{User, UserDraft};

use super::ResourcePersistenceError;

/// Lookup-or-insert by username.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Return the user named by `draft.username`, creating it from `draft`
    /// when absent. The flag is `true` when a new row was inserted.
    ///
    /// An existing user is returned unchanged; the draft's other fields are
    /// ignored in that case.
    async fn get_or_create(
        &self,
        draft: UserDraft,
    ) -> Result<(User, bool), ResourcePersistenceError>;
}
