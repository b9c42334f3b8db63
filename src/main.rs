use anyhow::{Context, Result};
use config::Config;
use context::create_app_router;

use dotenvy::dotenv;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod backend;
pub mod config;
pub mod context;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
    if let Err(e) = dotenv() {
        tracing::info!("not loading .env: {e}");
    }

    let config = Config::from_env().context("unable to load configuration")?;
    let app = create_app_router(&config)
        .await
        .context("unable to create app router")?;
    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("unable to bind to {}", config.addr))?;
    tracing::info!(
        "serving {} backend for player {} on {}",
        config.backend,
        config.backend_config.player,
        config.addr
    );
    axum::serve(listener, app)
        .await
        .context("unable to run server")?;

    Ok(())
}
