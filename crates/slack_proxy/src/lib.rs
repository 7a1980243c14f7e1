//! Browser-facing relay for the Slack Web API.
//!
//! Front-ends cannot call `slack.com/api` directly (CORS, and the token must
//! not ship to the browser). The proxy exposes `/api/:method`, attaches the
//! server-side bearer token and relays Slack's answer verbatim.

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

mod error;
mod routes;
mod state;

pub use error::AppError;
pub use state::{ProxySettings, ProxyState, DEFAULT_TIMEOUT_SECS, SLACK_API_BASE};

pub fn build_router(state: ProxyState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .nest("/api", routes::build_api_router())
        .with_state(state)
        .layer(routes::cors_layer())
        .layer(TraceLayer::new_for_http())
}

pub async fn run_proxy_server(settings: ProxySettings) -> Result<()> {
    if settings.slack_token.trim().is_empty() {
        anyhow::bail!("the proxy needs a Slack token to forward requests");
    }
    let state = ProxyState::new(
        &settings.upstream_base,
        settings.slack_token.trim(),
        settings.timeout,
    )?;
    let app = build_router(state);

    info!(
        "Starting Slack proxy on {} -> {}",
        settings.bind, settings.upstream_base
    );
    let listener = tokio::net::TcpListener::bind(settings.bind)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind))?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("proxy server stopped unexpectedly")?;
    info!("Slack proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
