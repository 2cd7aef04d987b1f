mod analysis;
mod config;
mod errors;
mod intake;
mod routes;
mod search;
mod session;
mod state;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::GeminiClient;
use crate::config::Config;
use crate::routes::build_router;
use crate::search::ApifyClient;
use crate::session::pipeline::Pipeline;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobscan API v{}", env!("CARGO_PKG_VERSION"));

    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; every analysis will fail until it is configured");
    }
    if config.apify_token.is_none() {
        warn!("APIFY_TOKEN is not set; job searches will be rejected by the search service");
    }

    let gemini = GeminiClient::new(
        config.gemini_api_key.clone(),
        &config.gemini_api_url,
        &config.gemini_model,
    )?;
    info!("Gemini client initialized (model: {})", gemini.model());

    let apify = ApifyClient::new(
        config.apify_token.clone(),
        &config.apify_api_url,
        &config.apify_actor,
    )?;
    info!("Job search client initialized (actor: {})", config.apify_actor);

    let state = AppState::new(Pipeline::new(Arc::new(gemini), Arc::new(apify)));

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
