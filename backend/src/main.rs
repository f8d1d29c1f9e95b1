//! Backend entry-point: loads settings, selects the store and serves the API.

mod server;

use std::net::{IpAddr, SocketAddr};

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::settings::ServerSettings;
use server::{ServerConfig, build_http_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(|e| eyre!("load server settings: {e}"))?;
    let host: IpAddr = settings
        .host()
        .parse()
        .wrap_err_with(|| format!("invalid bind host {}", settings.host()))?;
    let bind_addr = SocketAddr::new(host, settings.port());

    let http_state = build_http_state(&settings).await?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(bind_addr, http_state))
        .wrap_err_with(|| format!("bind {bind_addr}"))?;

    info!(%bind_addr, "serving blog API");
    server.await.wrap_err("server terminated")
}
