//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows and domain types and map
//! database failures to [`ResourcePersistenceError`]. Row structs and the
//! schema stay private to this module.
//!
//! [`ResourcePersistenceError`]: crate::domain::ports::ResourcePersistenceError

mod diesel_article_repository;
mod diesel_category_repository;
mod diesel_error_mapping;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_article_repository::DieselArticleRepository;
pub use diesel_category_repository::DieselCategoryRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
