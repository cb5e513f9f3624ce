mod config;
mod deal_engine;
mod error;
mod render;
mod routes;
mod session;

use anyhow::{Context, Result};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::deal_engine::DealEngine;
use crate::routes::{deals::deal_routes, AppState};
use crate::session::store::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,deal_scraper=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let state = AppState {
        engine: DealEngine::new(config.engine()).context("Failed to build HTTP client")?,
        sessions: SessionStore::new(config.session_idle),
    };

    let app = deal_routes(Arc::new(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, base_url = %config.base_url, "deal scraper listening");
    axum::serve(listener, app).await?;

    Ok(())
}
