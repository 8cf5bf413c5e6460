use std::sync::Arc;

use anyhow::Result;
use decision_engine::StructuralCertaintyEngine;
use market_data::{ChartExchangeConfig, ChartExchangeProvider};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod routes;

use routes::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::load()?;

    let provider = ChartExchangeProvider::new(ChartExchangeConfig {
        base_url: config.provider_base_url.clone(),
        api_key: config.api_key.clone(),
    });

    let state = Arc::new(AppState {
        engine: StructuralCertaintyEngine::with_policy(config.policy.clone()),
        provider: Arc::new(provider),
    });

    let app = routes::router(state).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "structural certainty gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down gracefully");
    }
}
