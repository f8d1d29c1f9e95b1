//! Domain ports.
//!
//! Adapters implement these traits; inbound code and domain services only
//! ever hold them as `Arc<dyn ...>`.

mod macros;
mod resource_repository;
mod user_repository;

pub(crate) use macros::define_port_error;

pub use resource_repository::{Entity, ResourcePersistenceError, ResourceRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
