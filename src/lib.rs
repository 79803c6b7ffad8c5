//! Slice-based request routing library.
//!
//! Maps URL paths to the slice that owns them, resolves endpoint
//! identifiers against that slice's components, and wraps every request in
//! a prefix-scoped middleware chain before normalizing the response.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod middleware;
pub mod observability;
pub mod routing;
pub mod slice;

pub use config::schema::AppConfig;
pub use http::{NormalizedResponse, Reply, Request};
pub use lifecycle::Shutdown;
pub use middleware::{MiddlewareRef, MiddlewareRegistry, MiddlewareStack};
pub use routing::{EndpointResolver, EndpointSpec, PathTrie, Router, RouterBuilder};
pub use slice::{ComponentRegistry, Slice};
