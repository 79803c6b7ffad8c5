//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router that hands every request to the slice router
//! - Buffer request bodies up to the configured limit
//! - Wire up transport middleware (tracing, timeout)
//! - Serve until the shutdown coordinator fires
//!
//! # Design Decisions
//! - A single fallback handler; all routing happens in `routing::Router`
//! - Dispatch is synchronous and runs inline on the connection task

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Request as AxumRequest, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::request::Request;
use crate::lifecycle::shutdown::Shutdown;
use crate::routing::Router;

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<Router>,
    pub max_body_bytes: usize,
}

/// Build the Axum application around `router`.
#[allow(deprecated)]
pub fn app(router: Arc<Router>, config: &ServerConfig) -> axum::Router {
    let state = AppState {
        router,
        max_body_bytes: config.max_body_bytes,
    };

    axum::Router::new()
        .fallback(dispatch_handler)
        .with_state(state)
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(TraceLayer::new_for_http())
}

/// Serve `app` on `listener` until `shutdown` is triggered.
pub async fn serve(listener: TcpListener, app: axum::Router, shutdown: &Shutdown) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "HTTP server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.wait())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn dispatch_handler(State(state): State<AppState>, request: AxumRequest) -> Response {
    let (parts, body) = request.into_parts();
    let body = match buffer_body(body, state.max_body_bytes).await {
        Ok(body) => body,
        Err(status) => {
            let message = if status == StatusCode::PAYLOAD_TOO_LARGE {
                "Request body too large"
            } else {
                "Failed to read request body"
            };
            tracing::warn!(
                path = %parts.uri.path(),
                limit = state.max_body_bytes,
                status = status.as_u16(),
                "Request body rejected"
            );
            return (status, message).into_response();
        }
    };

    state
        .router
        .dispatch(Request::from_parts(parts, body))
        .into_http()
}

/// Buffer `body`; 413 when it exceeds `limit`, 400 when the stream fails.
async fn buffer_body(body: axum::body::Body, limit: usize) -> Result<Bytes, StatusCode> {
    axum::body::to_bytes(body, limit).await.map_err(|e| {
        tracing::debug!(error = %e, "Request body read failed");
        rejection_status(&e)
    })
}

fn rejection_status(error: &axum::Error) -> StatusCode {
    let mut source: Option<&(dyn std::error::Error + 'static)> = std::error::Error::source(error);
    while let Some(err) = source {
        if err.is::<LengthLimitError>() {
            return StatusCode::PAYLOAD_TOO_LARGE;
        }
        source = err.source();
    }
    StatusCode::BAD_REQUEST
}
