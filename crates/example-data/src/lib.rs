//! Synthetic blog data generation for local development databases.
//!
//! This crate provides factories that produce believable users, categories,
//! and articles. It is deliberately independent of backend domain types so the
//! backend can depend on it without creating cycles; generated seeds are
//! converted into domain drafts at the point of use.
//!
//! # Overview
//!
//! - [`FactoryConfig`] carries every default the factories rely on (shared
//!   password, name prefixes, counts, word and sentence ranges).
//! - [`UserFactory`] and [`CategoryFactory`] hold their own sequence counters,
//!   so two factories never share numbering state.
//! - [`ArticleFactory`] cycles authors through the supplied user identifiers
//!   and samples categories from the supplied category identifiers.
//! - Every generator takes the random source as a parameter; seed a
//!   [`FactoryRng`] to obtain reproducible output.
//!
//! # Example
//!
//! ```
//! use example_data::{FactoryConfig, UserFactory, seeded_rng};
//!
//! let config = FactoryConfig::default();
//! let mut users = UserFactory::new(&config);
//! let mut rng = seeded_rng(42);
//!
//! let first = users.generate(&mut rng);
//! let second = users.generate(&mut rng);
//!
//! assert_eq!(first.username, "user_1");
//! assert_eq!(second.username, "user_2");
//! assert_eq!(first.password, "helloworld");
//! ```

mod config;
mod error;
mod generator;
mod seed;
mod selection;

pub use config::FactoryConfig;
pub use error::GenerationError;
pub use generator::{ArticleFactory, CategoryFactory, UserFactory};
pub use seed::{ArticleTypeSeed, ExampleArticleSeed, ExampleCategorySeed, ExampleUserSeed};
pub use selection::AuthorCycle;

use rand::SeedableRng;

/// Random source used by the factories when callers do not bring their own.
pub type FactoryRng = rand_chacha::ChaCha8Rng;

/// Build a deterministic random source from a numeric seed.
///
/// The same seed always yields the same sequence of generated records.
#[must_use]
pub fn seeded_rng(seed: u64) -> FactoryRng {
    FactoryRng::seed_from_u64(seed)
}

/// Build a random source seeded from operating system entropy.
#[must_use]
pub fn entropy_rng() -> FactoryRng {
    FactoryRng::from_os_rng()
}
