//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn a validated `AppConfig` into a compiled `Router`
//! - Start the metrics exporter when enabled
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Config-declared middleware are looked up by name, so repeated names
//!   share one `MiddlewareRef`
//! - Listener starts last (traffic only when ready)

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::schema::{AppConfig, MiddlewareConfig, SliceConfig};
use crate::config::validation::parse_method;
use crate::config::ConfigError;
use crate::http::server;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals;
use crate::middleware::{MiddlewareError, MiddlewareRegistry, MiddlewareStack};
use crate::observability::metrics;
use crate::routing::endpoint::Component;
use crate::routing::error::BuildError;
use crate::routing::resolver::ACTIONS_NAMESPACE;
use crate::routing::router::Router;
use crate::slice::action::StaticAction;
use crate::slice::container::ComponentRegistry;
use crate::slice::registry::Slice;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("Slice {slice} action {key:?} has an invalid status or content type")]
    InvalidAction { slice: String, key: String },

    #[error("Slice {slice} route {path} has unknown method {method:?}")]
    InvalidMethod {
        slice: String,
        path: String,
        method: String,
    },

    #[error("Invalid address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Metrics exporter failed: {0}")]
    Metrics(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MiddlewareError> for StartupError {
    fn from(e: MiddlewareError) -> Self {
        StartupError::Build(BuildError::Middleware(e))
    }
}

/// Build the router described by `config`.
pub fn build_router(config: &AppConfig, middleware: &MiddlewareRegistry) -> Result<Router, StartupError> {
    let mut builder = Router::builder();
    builder.lazy_endpoints(config.router.lazy_endpoints);
    register_middleware(builder.middleware_mut(), &config.middleware, middleware)?;

    for slice_config in &config.slices {
        let slice = build_slice(slice_config, middleware)?;
        builder.slice(slice).map_err(BuildError::from)?;
    }

    Ok(builder.build()?)
}

fn build_slice(config: &SliceConfig, middleware: &MiddlewareRegistry) -> Result<Slice, StartupError> {
    let mut container = ComponentRegistry::new();
    for action in &config.actions {
        let endpoint = StaticAction::from_config(action).ok_or_else(|| StartupError::InvalidAction {
            slice: config.name.clone(),
            key: action.key.clone(),
        })?;
        container.register(
            format!("{}.{}", ACTIONS_NAMESPACE, action.key),
            Component::callable(endpoint),
        );
    }

    let mut slice = Slice::new(config.name.clone(), &config.at, container);
    register_middleware(slice.middleware_mut(), &config.middleware, middleware)?;

    for route in &config.routes {
        let method = parse_method(&route.method).ok_or_else(|| StartupError::InvalidMethod {
            slice: config.name.clone(),
            path: route.path.clone(),
            method: route.method.clone(),
        })?;
        slice.route(method, &route.path, route.to.as_str());
    }

    tracing::info!(
        slice = %config.name,
        mount = %slice.mount(),
        actions = config.actions.len(),
        routes = config.routes.len(),
        "Slice configured"
    );
    Ok(slice)
}

fn register_middleware(
    stack: &mut MiddlewareStack,
    entries: &[MiddlewareConfig],
    registry: &MiddlewareRegistry,
) -> Result<(), MiddlewareError> {
    for entry in entries {
        let middleware = registry.get(&entry.name)?;
        stack.use_middleware(&middleware, entry.args.clone());
    }
    Ok(())
}

/// Serve `router` with the transport settings of `config` until a
/// shutdown signal arrives.
pub async fn run(config: AppConfig, router: Router) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = parse_address(&config.observability.metrics_address)?;
        metrics::init_metrics(addr).map_err(|e| StartupError::Metrics(e.to_string()))?;
    }

    let listener = TcpListener::bind(&config.server.bind_address).await?;

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_signal_listener(Arc::clone(&shutdown));

    let app = server::app(Arc::new(router), &config.server);
    server::serve(listener, app, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn parse_address(address: &str) -> Result<SocketAddr, StartupError> {
    address.parse().map_err(|e: std::net::AddrParseError| StartupError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })
}
