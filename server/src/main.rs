use clap::Parser;
use eyre::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use todo_server::config::ServerConfig;

fn setup_logging(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();
    setup_logging(&config.log_level)?;

    let store = config
        .open_store()
        .with_context(|| format!("Failed to open {:?} store", config.store))?;

    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, store = ?config.store, "listening");

    todo_server::run(listener, store).await.context("Server failed")
}
