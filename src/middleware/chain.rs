//! Compiled dispatch chain building blocks.
//!
//! # Responsibilities
//! - Define the `Handler` every middleware wraps and produces
//! - Route requests under a mounted prefix through that prefix's handler
//!
//! # Design Decisions
//! - Handlers are `Arc`'d closures: cheap to clone into wrappers, immutable
//!   once built, shareable across worker threads
//! - Prefix matching respects segment boundaries (`/admin` does not match
//!   `/administrator`); the longest mounted prefix wins

use std::sync::Arc;

use crate::http::request::Request;
use crate::http::response::Reply;

/// A compiled request handler.
pub type Handler = Arc<dyn Fn(Request) -> Reply + Send + Sync>;

/// Box a closure as a `Handler`.
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(Request) -> Reply + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Sends each request to the handler mounted at its longest matching
/// prefix, or to `fallback` when no prefix matches.
pub fn prefix_dispatch(mounts: Vec<(String, Handler)>, fallback: Handler) -> Handler {
    let mut mounts: Vec<(String, Handler)> = mounts
        .into_iter()
        .map(|(prefix, handler)| (normalize_prefix(&prefix), handler))
        .collect();
    mounts.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    Arc::new(move |request: Request| {
        let path = request.uri().path();
        match mounts
            .iter()
            .find(|(prefix, _)| prefix_matches(prefix, path))
        {
            Some((_, mounted)) => mounted(request),
            None => fallback(request),
        }
    })
}

/// Leading slash, no trailing slash; the root is `/`.
pub(crate) fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// True when `path` is `prefix` itself or lies beneath it.
pub(crate) fn prefix_matches(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
