//! Domain types, validation and services.
//!
//! Value types validate on construction, so anything that reaches a port is
//! already well formed. Reference integrity (authors, categories) and
//! username uniqueness are enforced by the stores behind the ports.
//!
//! Public surface:
//! - [`User`], [`Category`], [`Article`] and their drafts.
//! - [`Error`] and [`ErrorCode`]: transport-agnostic failures.
//! - [`DatabasePopulator`]: synthetic data population.
//! - [`ports`]: repository traits implemented by outbound adapters.

mod article;
mod category;
pub mod error;
mod identifier;
mod password;
mod population;
pub mod ports;
mod trace_id;
mod user;
mod validation;

pub use self::article::{
    ARTICLE_TITLE_MAX_CHARS, Article, ArticleContent, ArticleDraft, ArticleId, ArticleTitle,
    ArticleType,
};
pub use self::category::{
    CATEGORY_NAME_MAX_CHARS, Category, CategoryDraft, CategoryId, CategoryName,
};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::password::PasswordHash;
pub use self::population::{
    DatabasePopulator, PopulationError, PopulationOutcome, PopulationPorts, PopulationRequest,
};
pub use self::trace_id::TraceId;
pub use self::user::{
    PERSON_NAME_MAX_CHARS, PersonName, USERNAME_MAX_CHARS, User, UserDraft, UserId, Username,
};
pub use self::validation::ValidationError;
