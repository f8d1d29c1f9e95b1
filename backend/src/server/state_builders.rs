//! Select the repository adapters backing the HTTP state.

use std::sync::Arc;

use color_eyre::eyre::{Context, Result};
use mockable::DefaultClock;
use tracing::{info, warn};

use backend::inbound::http::state::HttpState;
use backend::outbound::memory::InMemoryBlogStore;
use backend::outbound::persistence::{
    DbPool, DieselArticleRepository, DieselCategoryRepository, DieselUserRepository, PoolConfig,
    run_migrations,
};
use backend::settings::ServerSettings;

/// Diesel adapters when a database URL is configured, otherwise the
/// in-memory store.
///
/// # Errors
///
/// Fails when migrations cannot be applied or the pool cannot be built.
pub async fn build_http_state(settings: &ServerSettings) -> Result<HttpState> {
    let Some(database_url) = settings.database_url() else {
        warn!("no database configured; serving from a process-local in-memory store");
        return Ok(HttpState::from_store(Arc::new(InMemoryBlogStore::new())));
    };

    if settings.skip_migrations {
        info!("skipping database migrations");
    } else {
        run_migrations(&database_url)
            .await
            .wrap_err("apply database migrations")?;
    }

    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .wrap_err("create database pool")?;
    Ok(HttpState::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselCategoryRepository::new(pool.clone())),
        Arc::new(DieselArticleRepository::new(pool, Arc::new(DefaultClock))),
    ))
}
