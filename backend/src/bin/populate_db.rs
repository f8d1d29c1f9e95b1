//! Fill the configured database with synthetic users, categories and articles.
//!
//! # Examples
//! ```sh
//! DATABASE_URL=postgres://blog@localhost/blog cargo run --bin populate-db -- --users 3
//! ```

use std::env;
use std::sync::Arc;

use backend::domain::{DatabasePopulator, PopulationPorts, PopulationRequest};
use backend::outbound::persistence::{
    DbPool, DieselArticleRepository, DieselCategoryRepository, DieselUserRepository, PoolConfig,
    run_migrations,
};
use backend::settings::DATABASE_URL_ENV;
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use example_data::{FactoryConfig, entropy_rng};
use mockable::DefaultClock;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `populate-db` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "populate-db",
    about = "Populate the database with synthetic users, categories and articles",
    version
)]
struct CliArgs {
    /// Number of users to create or reuse.
    #[arg(long = "users", value_name = "count", default_value_t = 10)]
    users: usize,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(std::io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;

    println!("Started database population process...");
    match runtime.block_on(populate(args)) {
        Ok(()) => {
            println!("Successfully populated the database.");
            Ok(())
        }
        Err(report) => {
            println!("Failed to populate the database: {report}");
            Err(report)
        }
    }
}

async fn populate(args: CliArgs) -> Result<()> {
    let database_url =
        env::var(DATABASE_URL_ENV).map_err(|_| eyre!("{DATABASE_URL_ENV} must be set"))?;
    run_migrations(&database_url)
        .await
        .wrap_err("apply migrations")?;
    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(2))
        .await
        .wrap_err("create database pool")?;

    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let ports = PopulationPorts {
        users: users.clone(),
        user_records: users,
        categories: Arc::new(DieselCategoryRepository::new(pool.clone())),
        articles: Arc::new(DieselArticleRepository::new(pool, Arc::new(DefaultClock))),
    };
    let populator = DatabasePopulator::new(ports, FactoryConfig::default());
    let request = PopulationRequest {
        user_count: args.users,
        ..PopulationRequest::default()
    };

    populator
        .populate(&request, &mut entropy_rng())
        .await
        .wrap_err("populate database")?;
    Ok(())
}
