//! HTTP server for the mock chat completions endpoint.

mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::http::{Method, header};
use axum::routing::post;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

use crate::models::Config;
use crate::services::Providers;

pub use error::ApiError;
pub use handlers::{ChatReply, MODEL_VERSION_HEADER, REQUEST_ID_HEADER, respond};

/// Immutable per-server state shared by every request.
#[derive(Debug, Clone)]
pub struct ChatState {
    pub default_model: Arc<str>,
    pub model_version: Arc<str>,
    pub providers: Providers,
}

impl ChatState {
    pub fn new(default_model: &str, model_version: &str, providers: Providers) -> Self {
        Self {
            default_model: Arc::from(default_model),
            model_version: Arc::from(model_version),
            providers,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.chat.default_model,
            &config.chat.model_version,
            Providers::system(config.chat.min_latency_ms, config.chat.max_latency_ms),
        )
    }
}

pub fn build_router(state: ChatState, chat_path: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([REQUEST_ID_HEADER, MODEL_VERSION_HEADER]);

    Router::new()
        .route(chat_path, post(handlers::chat_completions))
        .layer(cors)
        .with_state(state)
}

/// Serve the chat API until Ctrl-C or SIGTERM.
pub async fn run_server(config: &Config) -> Result<(), std::io::Error> {
    let state = ChatState::from_config(config);
    let app = build_router(state, &config.server.chat_path);

    let addr: SocketAddr = config.server.bind_addr().parse().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid bind address {}: {e}", config.server.bind_addr()),
        )
    })?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        path = %config.server.chat_path,
        model = %config.chat.default_model,
        "mock chat API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("mock chat API stopped");
    Ok(())
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
