//! HTTP and WebSocket surface
//!
//! # Routes
//!
//! - `GET /` and `GET /ws`: WebSocket upgrade for the event protocol
//! - `GET /health`: liveness plus connection and session counts
//! - `POST /api/scrape`: request validation
//! - anything else: JSON 404

mod routes;
mod socket;

pub use routes::{ErrorBody, HealthResponse, ScrapeAccepted};

use crate::config::Config;
use crate::relay::Relay;
use crate::{ConfigError, ScoutError};
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub relay: Relay,
    pub connections: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(relay: Relay) -> Self {
        Self {
            relay,
            connections: Arc::new(AtomicUsize::new(0)),
        }
    }
}

/// Builds the application router
///
/// # Arguments
///
/// * `state` - Shared handler state
/// * `allowed_origins` - Origins accepted by the CORS layer; invalid entries are skipped
pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(socket::upgrade))
        .route("/ws", get(socket::upgrade))
        .route("/health", get(routes::health))
        .route("/api/scrape", post(routes::scrape))
        .fallback(routes::not_found)
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Binds the listener and serves until `shutdown` completes
///
/// Also runs the session sweeper for the lifetime of the server.
///
/// # Arguments
///
/// * `config` - Listener, CORS and session settings
/// * `relay` - Request handler shared by all connections
/// * `shutdown` - Future that resolves when the server should stop
pub async fn serve<F>(config: &Config, relay: Relay, shutdown: F) -> Result<(), ScoutError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = config.server.bind.parse().map_err(|e| {
        ConfigError::Validation(format!("Invalid bind address '{}': {}", config.server.bind, e))
    })?;

    let sweeper = relay
        .sessions()
        .spawn_sweeper(config.sessions.sweep_interval());

    let state = AppState::new(relay);
    let app = router(state, &config.server.allowed_origins);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    tracing::info!("WebSocket endpoint: ws://{}/ws", addr);
    tracing::info!("Health check: http://{}/health", addr);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;

    sweeper.abort();
    tracing::info!("Server stopped");
    result.map_err(ScoutError::from)
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl-C received, shutting down gracefully..."),
        _ = terminate => tracing::info!("SIGTERM received, shutting down gracefully..."),
    }
}
