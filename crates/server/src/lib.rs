//! rdpgate Server - HTTP surface of the universe gateway
//!
//! Exposes token exchange, universe retrieval and cached search over axum:
//! - `GET|POST /api/GetNewToken`
//! - `GET|POST /api/GetESGUniverse`
//! - `GET /api/SearchUniverse`
//! - `GET /health`

pub mod config;
pub mod error;
pub mod handlers;
pub mod params;
pub mod state;
pub mod telemetry;

use std::time::Duration;

use axum::Router;
use axum::extract::Request;
use axum::response::Response;
use axum::routing::get;
use rdpgate_application::CancellationToken;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::trace::TraceLayer;
use tracing::{Span, info_span};
use uuid::Uuid;

pub use config::{GatewayConfig, ServerConfig};
pub use error::{ApiError, ServerError};
pub use state::AppState;

use handlers::{
    get_new_token, get_universe, health_check, post_new_token, post_universe, search_universe,
};

/// Builds the gateway router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/GetNewToken", get(get_new_token).post(post_new_token))
        .route("/api/GetESGUniverse", get(get_universe).post(post_universe))
        .route("/api/SearchUniverse", get(search_universe))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    let request_id = Uuid::now_v7();
                    // Only the path: query strings carry credentials and tokens.
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                })
                .on_request(|_request: &Request, _span: &Span| {
                    tracing::debug!("started processing request");
                })
                .on_response(|response: &Response, latency: Duration, _span: &Span| {
                    let status = response.status();
                    let latency_ms = latency.as_millis();

                    if status.is_server_error() {
                        tracing::error!(status = %status, latency_ms, "request failed with server error");
                    } else if status.is_client_error() {
                        tracing::warn!(status = %status, latency_ms, "request failed with client error");
                    } else {
                        tracing::info!(status = %status, latency_ms, "request completed");
                    }
                })
                .on_failure(|failure_class: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
                    tracing::error!(failure_class = ?failure_class, latency_ms = latency.as_millis(), "request failed");
                }),
        )
}

/// Runs the gateway until Ctrl-C.
///
/// In-flight platform requests are cancelled when shutdown begins.
///
/// # Errors
///
/// Returns an error if the adapters cannot be built or the listener fails.
pub async fn run_server(config: GatewayConfig) -> Result<(), ServerError> {
    let addr = config.socket_addr()?;
    let (shutdown, receiver) = CancellationToken::new();
    let app = build_router(AppState::from_config(&config, receiver)?);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(error) = tokio::signal::ctrl_c().await {
                tracing::error!(%error, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutting down");
            shutdown.cancel();
        })
        .await?;

    Ok(())
}
