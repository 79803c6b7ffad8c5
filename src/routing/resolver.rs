//! Endpoint resolution.
//!
//! # Responsibilities
//! - Map route paths to their owning slice through the `PathTrie`
//! - Turn an `EndpointSpec` into a concrete `Arc<dyn Endpoint>`
//! - Offer lazily bound endpoints that resolve on first request
//!
//! # Design Decisions
//! - Built through `EndpointResolverBuilder`; the resolver itself is immutable
//! - String keys are looked up as `actions.<key>` in the owning slice's
//!   container, so the same key binds differently per slice
//! - Callability is checked after every resolution strategy, not only for
//!   container lookups

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use axum::http::StatusCode;

use crate::http::request::Request;
use crate::http::response::Reply;
use crate::routing::endpoint::{Component, Endpoint, EndpointSpec};
use crate::routing::error::RoutingError;
use crate::routing::trie::PathTrie;
use crate::slice::registry::{Slice, SliceRegistry};

/// Container namespace string endpoints are looked up in.
pub const ACTIONS_NAMESPACE: &str = "actions";

/// Mutable boot-time form of the resolver.
#[derive(Debug, Default)]
pub struct EndpointResolverBuilder {
    slices: HashMap<String, Arc<Slice>>,
    trie: PathTrie<String>,
}

impl EndpointResolverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a slice and mount it at its own path.
    pub fn register_slice(&mut self, slice: Arc<Slice>) -> &mut Self {
        let name = slice.name().to_string();
        let mount = slice.mount().to_string();
        self.slices.insert(name.clone(), slice);
        self.register_slice_at_path(&name, &mount)
    }

    /// Mount an already known slice name at `path`. Later mounts at the same
    /// path replace earlier ones.
    pub fn register_slice_at_path(&mut self, slice: &str, path: &str) -> &mut Self {
        tracing::debug!(slice = %slice, path = %path, "Slice mounted");
        self.trie.add(path, slice.to_string());
        self
    }

    pub fn build(self) -> EndpointResolver {
        EndpointResolver {
            slices: self.slices,
            trie: self.trie,
        }
    }
}

/// Resolves endpoint specifiers against the frozen slice layout.
#[derive(Debug, Default)]
pub struct EndpointResolver {
    slices: HashMap<String, Arc<Slice>>,
    trie: PathTrie<String>,
}

impl EndpointResolver {
    pub fn builder() -> EndpointResolverBuilder {
        EndpointResolverBuilder::new()
    }

    /// Resolver over every slice of `registry`, mounted in registration order.
    pub fn from_registry(registry: &SliceRegistry) -> Self {
        let mut builder = Self::builder();
        for slice in registry.iter() {
            builder.register_slice(Arc::clone(slice));
        }
        builder.build()
    }

    /// Name of the slice owning `path`.
    pub fn slice_name_for(&self, path: &str) -> Option<&str> {
        self.trie.find(path).map(String::as_str)
    }

    /// The slice owning `path`.
    pub fn slice_for(&self, path: &str) -> Option<&Arc<Slice>> {
        self.slice_name_for(path)
            .and_then(|name| self.slices.get(name))
    }

    /// Resolve `spec` for a route at `path`.
    pub fn resolve(&self, path: &str, spec: &EndpointSpec) -> Result<Arc<dyn Endpoint>, RoutingError> {
        let component = match spec {
            EndpointSpec::Key(key) => self.lookup_action(path, key)?,
            EndpointSpec::Class(class) => class.instantiate(),
            EndpointSpec::Instance(component) => component.clone(),
        };

        component
            .into_endpoint()
            .map_err(|endpoint| RoutingError::NotCallableEndpoint { endpoint })
    }

    /// Like `resolve`, but string keys are bound to an endpoint that
    /// resolves on its first call instead of now.
    pub fn resolve_lazy(self: &Arc<Self>, path: &str, spec: &EndpointSpec) -> Result<Arc<dyn Endpoint>, RoutingError> {
        match spec {
            EndpointSpec::Key(key) => Ok(Arc::new(LazyEndpoint {
                resolver: Arc::clone(self),
                path: path.to_string(),
                spec: spec.clone(),
                name: key.clone(),
                resolved: OnceLock::new(),
            })),
            _ => self.resolve(path, spec),
        }
    }

    fn lookup_action(&self, path: &str, key: &str) -> Result<Component, RoutingError> {
        let slice_name = self
            .slice_name_for(path)
            .ok_or_else(|| RoutingError::MissingSlice {
                path: path.to_string(),
                key: key.to_string(),
            })?;
        let slice = self
            .slices
            .get(slice_name)
            .ok_or_else(|| RoutingError::UnknownSlice(slice_name.to_string()))?;

        let action_key = format!("{}.{}", ACTIONS_NAMESPACE, key);
        slice
            .container()
            .get(&action_key)
            .ok_or_else(|| RoutingError::MissingAction {
                slice: slice_name.to_string(),
                key: action_key,
            })
    }
}

/// Endpoint bound at boot, resolved on first use and memoized.
struct LazyEndpoint {
    resolver: Arc<EndpointResolver>,
    path: String,
    spec: EndpointSpec,
    name: String,
    resolved: OnceLock<Arc<dyn Endpoint>>,
}

impl LazyEndpoint {
    fn endpoint(&self) -> Result<Arc<dyn Endpoint>, RoutingError> {
        if let Some(endpoint) = self.resolved.get() {
            return Ok(Arc::clone(endpoint));
        }
        let endpoint = self.resolver.resolve(&self.path, &self.spec)?;
        Ok(Arc::clone(self.resolved.get_or_init(|| endpoint)))
    }
}

impl Endpoint for LazyEndpoint {
    fn call(&self, request: Request) -> Reply {
        match self.endpoint() {
            Ok(endpoint) => endpoint.call(request),
            Err(e) => {
                tracing::error!(
                    path = %self.path,
                    endpoint = %self.name,
                    error = %e,
                    "Endpoint resolution failed"
                );
                Reply::Text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
