//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{
    handler::{get_hostname, get_presence, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Bind address of the server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The host address to bind to (e.g., "0.0.0.0")
    pub host: String,
    /// The port number to bind to (e.g., 3000)
    pub port: u16,
}

/// Build the application router around shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/presence", get(get_presence))
        .route("/hostname", get(get_hostname))
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// WebRTC signaling and presence server
///
/// # Example
///
/// ```ignore
/// let state = AppState::in_memory(Arc::new(SystemClock), "host-1".to_string());
/// let config = ServerConfig { host: "0.0.0.0".to_string(), port: 3000 };
/// Server::new(state, config).run().await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    config: ServerConfig,
}

impl Server {
    pub fn new(state: AppState, config: ServerConfig) -> Self {
        Self {
            state: Arc::new(state),
            config,
        }
    }

    /// Run the signaling server until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address or
    /// if there's an error during server execution.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let app = build_router(self.state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "Signaling server listening on HTTP {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
