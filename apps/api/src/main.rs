mod config;
mod errors;
mod hh_client;
mod models;
mod routes;
mod search;
mod session;
mod state;
mod store;
mod sync;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume-bridge v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Provider API: {} | store table: {}/{}",
        config.hh_api_url, config.airtable_base_id, config.airtable_table
    );
    info!(
        "Batch pacing: {:?} every {}ms, dedup timeout {}ms",
        config.batch_pacer,
        config.batch_delay.as_millis(),
        config.dedup_timeout.as_millis()
    );

    let state = AppState::from_config(config.clone());
    if state.sessions.current().await.is_some() {
        info!(
            "Found stored session at {}",
            config.tokens_file.display()
        );
    }

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
