mod assessment;
mod chat;
mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;
mod web;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{CompletionClient, GeminiClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (a missing credential is not fatal)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting OHS Advisor v{}", env!("CARGO_PKG_VERSION"));

    // Initialize completion client, or run degraded without one
    let llm: Option<Arc<dyn CompletionClient>> = match &config.google_api_key {
        Some(key) => {
            info!("Completion client initialized (model: {})", config.model);
            Some(Arc::new(GeminiClient::new(
                key.clone(),
                &config.api_base,
                &config.model,
            )))
        }
        None => {
            warn!("GOOGLE_API_KEY not set; AI actions are disabled");
            None
        }
    };

    info!("Chat variant: {:?}", config.chat_variant);

    let state = AppState::new(config.clone(), llm);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
