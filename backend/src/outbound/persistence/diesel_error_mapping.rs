//! Translation of pool and Diesel failures into port errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ValidationError;
use crate::domain::ports::ResourcePersistenceError;

use super::pool::PoolError;

const USERNAME_UNIQUE_CONSTRAINT: &str = "users_username_key";

/// Pool checkout or build failures mean the database is unreachable.
pub(crate) fn map_pool_error(error: PoolError) -> ResourcePersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ResourcePersistenceError::connection(message)
        }
    }
}

/// Map a Diesel error, keeping the detailed message in debug logs only.
pub(crate) fn map_diesel_error(error: DieselError) -> ResourcePersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            if info.constraint_name() == Some(USERNAME_UNIQUE_CONSTRAINT) =>
        {
            ResourcePersistenceError::conflict("username")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ResourcePersistenceError::connection("database connection error")
        }
        DieselError::NotFound => ResourcePersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => {
            ResourcePersistenceError::query("database query error")
        }
        _ => ResourcePersistenceError::query("database error"),
    }
}

/// A stored row no longer satisfies domain validation.
pub(crate) fn map_invalid_row(error: ValidationError) -> ResourcePersistenceError {
    debug!(field = error.field(), code = error.code(), "stored row failed validation");
    ResourcePersistenceError::query(format!("stored {} is invalid", error.field()))
}

impl From<DieselError> for ResourcePersistenceError {
    fn from(error: DieselError) -> Self {
        map_diesel_error(error)
    }
}
