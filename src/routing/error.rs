//! Routing error taxonomy.

use thiserror::Error;

use crate::middleware::error::MiddlewareError;
use crate::routing::endpoint::Component;

#[derive(Debug, Error)]
pub enum RoutingError {
    /// A string endpoint was given for a path no slice owns.
    #[error("Missing slice for path {path} (endpoint {key:?})")]
    MissingSlice { path: String, key: String },

    /// The resolved component cannot handle requests.
    #[error("Endpoint is not callable: {endpoint:?}")]
    NotCallableEndpoint { endpoint: Component },

    /// The owning slice has no component under the composed key.
    #[error("Slice {slice} has no component {key}")]
    MissingAction { slice: String, key: String },

    /// The slice owning a path exists in the trie but not in the registry.
    #[error("Unknown slice: {0}")]
    UnknownSlice(String),

    #[error("Duplicate slice: {0}")]
    DuplicateSlice(String),

    #[error("Invalid route {method} {path}: {reason}")]
    InvalidRoute {
        method: String,
        path: String,
        reason: String,
    },
}

/// Anything that can abort building a router.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    Middleware(#[from] MiddlewareError),
}
