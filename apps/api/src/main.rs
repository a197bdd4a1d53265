mod auth;
mod billing;
mod chat;
mod config;
mod errors;
mod llm_client;
mod resume;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::StaticTokenProvider;
use crate::billing::checkout::CheckoutClient;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::resume::store::SessionManager;
use crate::routes::build_router;
use crate::state::AppState;

/// How often the idle-session sweeper runs.
const SESSION_SWEEP_PERIOD_SECS: u64 = 60;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Studio API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_url.clone(),
        config.openai_api_key.clone(),
        config.openai_model.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    );
    info!(
        "LLM client initialized (model: {}, timeout: {}s)",
        config.openai_model, config.llm_timeout_secs
    );

    // Initialize checkout client
    let billing = CheckoutClient::new(
        config.stripe_api_url.clone(),
        config.stripe_secret_key.clone(),
    );
    info!("Checkout client initialized");

    // Initialize identity provider (static token table from SESSION_TOKENS)
    let identity = StaticTokenProvider::from_token_list(&config.session_tokens);
    if identity.is_empty() {
        warn!("SESSION_TOKENS is empty; every protected route will redirect to sign-in");
    } else {
        info!("Identity provider initialized ({} tokens)", identity.len());
    }

    // Build app state
    let state = AppState {
        sessions: SessionManager::new(),
        llm,
        billing,
        identity: Arc::new(identity),
        config: config.clone(),
    };

    // Reap editing sessions idle past the configured TTL
    let sweeper = state.sessions.clone();
    let idle_secs = config.session_idle_secs;
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_secs(SESSION_SWEEP_PERIOD_SECS));
        loop {
            tick.tick().await;
            let removed = sweeper.sweep_idle(idle_secs, Utc::now());
            if removed > 0 {
                info!("swept {removed} idle editing sessions");
            }
        }
    });

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
