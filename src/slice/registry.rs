//! Slice definitions and the boot-time slice registry.
//!
//! # Responsibilities
//! - Describe a slice: name, mount path, container, middleware, routes
//! - Collect slices during boot and reject duplicate names
//! - Freeze into an immutable registry shared by resolver and router
//!
//! # Design Decisions
//! - Two phases: `SliceRegistryBuilder` is mutable, `SliceRegistry` is not
//! - Registration order is preserved; later mounts at the same path win
//! - Slice routes are declared relative to the mount path

use std::sync::Arc;

use axum::http::Method;

use crate::middleware::stack::MiddlewareStack;
use crate::routing::endpoint::EndpointSpec;
use crate::routing::error::RoutingError;
use crate::routing::table::RouteDef;
use crate::slice::container::Container;

/// An independently configured sub-application.
pub struct Slice {
    name: String,
    mount: String,
    container: Arc<dyn Container>,
    middleware: MiddlewareStack,
    routes: Vec<RouteDef>,
}

impl Slice {
    pub fn new<C: Container + 'static>(name: impl Into<String>, mount: &str, container: C) -> Self {
        Self::with_container(name, mount, Arc::new(container))
    }

    pub fn with_container(name: impl Into<String>, mount: &str, container: Arc<dyn Container>) -> Self {
        Self {
            name: name.into(),
            mount: normalize_mount(mount),
            container,
            middleware: MiddlewareStack::new(),
            routes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path prefix this slice owns.
    pub fn mount(&self) -> &str {
        &self.mount
    }

    pub fn container(&self) -> &Arc<dyn Container> {
        &self.container
    }

    /// Middleware registered relative to the mount path.
    pub fn middleware(&self) -> &MiddlewareStack {
        &self.middleware
    }

    pub fn middleware_mut(&mut self) -> &mut MiddlewareStack {
        &mut self.middleware
    }

    /// Declare a route relative to the mount path.
    pub fn route(&mut self, method: Method, path: &str, endpoint: impl Into<EndpointSpec>) -> &mut Self {
        self.routes.push(RouteDef::new(method, path, endpoint));
        self
    }

    pub fn get(&mut self, path: &str, endpoint: impl Into<EndpointSpec>) -> &mut Self {
        self.route(Method::GET, path, endpoint)
    }

    pub fn post(&mut self, path: &str, endpoint: impl Into<EndpointSpec>) -> &mut Self {
        self.route(Method::POST, path, endpoint)
    }

    pub fn routes(&self) -> &[RouteDef] {
        &self.routes
    }

    /// Absolute path of a slice-relative route path.
    pub fn absolute_path(&self, path: &str) -> String {
        join_paths(&self.mount, path)
    }
}

impl std::fmt::Debug for Slice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slice")
            .field("name", &self.name)
            .field("mount", &self.mount)
            .field("routes", &self.routes.len())
            .finish()
    }
}

/// Mutable collection of slices used during boot.
#[derive(Debug, Default)]
pub struct SliceRegistryBuilder {
    slices: Vec<Slice>,
}

impl SliceRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, slice: Slice) -> Result<&mut Self, RoutingError> {
        if self.slices.iter().any(|s| s.name == slice.name) {
            return Err(RoutingError::DuplicateSlice(slice.name));
        }
        tracing::debug!(slice = %slice.name, mount = %slice.mount, "Slice registered");
        self.slices.push(slice);
        Ok(self)
    }

    pub fn build(self) -> SliceRegistry {
        SliceRegistry {
            slices: self.slices.into_iter().map(Arc::new).collect(),
        }
    }
}

/// Frozen slice registry.
#[derive(Debug, Clone, Default)]
pub struct SliceRegistry {
    slices: Vec<Arc<Slice>>,
}

impl SliceRegistry {
    pub fn builder() -> SliceRegistryBuilder {
        SliceRegistryBuilder::new()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Slice>> {
        self.slices.iter().find(|s| s.name == name)
    }

    /// Slices in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Slice>> {
        self.slices.iter()
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

/// `"/admin/"` → `"/admin"`, `""` → `"/"`.
pub fn normalize_mount(mount: &str) -> String {
    let trimmed = mount.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Join a mount path and a slice-relative path.
pub fn join_paths(mount: &str, path: &str) -> String {
    let base = mount.trim_end_matches('/');
    let rest = path.trim_start_matches('/');
    if !rest.is_empty() {
        format!("{}/{}", base, rest)
    } else if base.is_empty() {
        "/".to_string()
    } else {
        base.to_string()
    }
}
