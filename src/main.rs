use axum::{routing::get, Router, response::Json};
use dotenv::dotenv;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod errors;
mod models;
mod routes;
mod services;
mod utils;
mod views;

use utils::config::{AppState, Config};

async fn root_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Nudge is running",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Nudge...");

    let config = Config::from_env();
    config.validate()?;

    if config.telegram_bot_token.is_none() {
        tracing::warn!("⚠️ TELEGRAM_BOT_TOKEN is not set, Telegram routes will fail");
    }
    if config.dashboard_email.is_none() || config.dashboard_password.is_none() {
        tracing::warn!("⚠️ Dashboard credentials are not set, every sign-in will be rejected");
    }

    let port = config.port;
    let app_state = AppState::new(config)?.with_status_poller();
    let status_poller = app_state.status_poller.clone();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .merge(routes::telegram::create_telegram_router())
        .merge(routes::auth::create_auth_router())
        .nest("/dashboard", routes::dashboard::create_dashboard_router())
        .layer(cors)
        .with_state(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("🌐 Nudge running on http://localhost:{}", port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(poller) = status_poller {
        poller.stop();
    }

    Ok(())
}
