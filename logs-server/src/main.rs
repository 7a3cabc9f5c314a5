//! VitalGuard Logs Server
//!
//! Companion service the monitor mirrors its cycle summaries to. Every
//! POST /log body becomes one timestamped line in an append-only text
//! file; the file doubles as the operator's plain-text audit trail.

mod config;
mod error;
mod handlers;
mod recorder;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::Mutex;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};
use recorder::Recorder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitalguard_logs=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("VitalGuard Logs Server starting...");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Log file: {}", config.log_file.display());

    let recorder = Recorder::new(&config.log_file)
        .with_context(|| format!("cannot open log file {}", config.log_file.display()))?;

    let state = AppState {
        recorder: Arc::new(Mutex::new(recorder)),
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recorder: Arc<Mutex<Recorder>>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/log", post(handlers::log::append))
        .route("/logs/recent", get(handlers::log::recent))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

// ============================================================================
// TESTS
// ============================================================================
