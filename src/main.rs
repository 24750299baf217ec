mod api;
mod case;
mod config;
mod persistence;
mod report;
mod result;
mod run;

use crate::api::{build_api, AppState};
use crate::case::service::Catalog;
use crate::config::Config;
use crate::persistence::repo::Repository;
use crate::run::execution::SimulatedExecutor;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    info!(?config, "starting test runner");

    let app_state = AppState {
        repository: Arc::new(Repository::new(Catalog::seeded())),
        executor: Arc::new(SimulatedExecutor),
        config: Arc::new(config.clone()),
    };
    let router = build_api(app_state);

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown requested");
}
