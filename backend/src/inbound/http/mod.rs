//! HTTP inbound adapter exposing the blog's REST endpoints.

pub mod api;
pub mod articles;
pub mod categories;
pub mod error;
pub mod health;
pub mod resource;
pub mod schemas;
pub mod state;
pub mod users;
pub mod validation;

pub use error::ApiResult;
