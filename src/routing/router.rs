//! Router composition root.
//!
//! # Responsibilities
//! - Collect slices, application middleware and application routes at boot
//! - Resolve every route endpoint and fill the route table
//! - Compile application and slice middleware into one dispatch chain
//! - Dispatch requests and normalize whatever the chain returns
//!
//! # Design Decisions
//! - `RouterBuilder` is the only mutable phase; `Router` is immutable and
//!   shared across workers without locks
//! - Resolution errors abort `build` unless lazy endpoints are enabled
//! - Unmatched paths are 404, paths matched under another method are 405

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};

use crate::http::request::{Request, RequestContext};
use crate::http::response::{NormalizedResponse, Reply};
use crate::middleware::chain::{self, Handler};
use crate::middleware::stack::MiddlewareStack;
use crate::observability::metrics;
use crate::routing::endpoint::{Endpoint, EndpointSpec};
use crate::routing::error::{BuildError, RoutingError};
use crate::routing::resolver::EndpointResolver;
use crate::routing::table::{RouteDef, RouteMatch, RouteSummary, RouteTable};
use crate::slice::registry::{Slice, SliceRegistry, SliceRegistryBuilder};

/// Boot-time router configuration.
#[derive(Debug, Default)]
pub struct RouterBuilder {
    slices: SliceRegistryBuilder,
    middleware: MiddlewareStack,
    routes: Vec<RouteDef>,
    lazy_endpoints: bool,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a slice; its routes and middleware are mounted at `build`.
    pub fn slice(&mut self, slice: Slice) -> Result<&mut Self, RoutingError> {
        self.slices.register(slice)?;
        Ok(self)
    }

    /// Application-level middleware stack.
    pub fn middleware_mut(&mut self) -> &mut MiddlewareStack {
        &mut self.middleware
    }

    /// Declare an application route at an absolute path.
    pub fn route(&mut self, method: Method, path: &str, endpoint: impl Into<EndpointSpec>) -> &mut Self {
        self.routes.push(RouteDef::new(method, path, endpoint));
        self
    }

    pub fn get(&mut self, path: &str, endpoint: impl Into<EndpointSpec>) -> &mut Self {
        self.route(Method::GET, path, endpoint)
    }

    /// Defer string endpoint resolution to the first request.
    pub fn lazy_endpoints(&mut self, lazy: bool) -> &mut Self {
        self.lazy_endpoints = lazy;
        self
    }

    pub fn build(self) -> Result<Router, BuildError> {
        let RouterBuilder {
            slices,
            middleware: mut stack,
            routes,
            lazy_endpoints,
        } = self;

        let slices = slices.build();
        let resolver = Arc::new(EndpointResolver::from_registry(&slices));

        let mut table = RouteTable::new();
        for route in &routes {
            let endpoint = resolve_endpoint(&resolver, lazy_endpoints, route.path(), route.endpoint())?;
            table.insert(route.method().clone(), route.path(), endpoint)?;
        }

        for slice in slices.iter() {
            for route in slice.routes() {
                let path = slice.absolute_path(route.path());
                let endpoint = resolve_endpoint(&resolver, lazy_endpoints, &path, route.endpoint())?;
                table.insert(route.method().clone(), &path, endpoint)?;
            }
            stack.update(&slice.middleware().rebased(slice.mount()));
        }

        let table = Arc::new(table);
        let chain = stack.to_dispatch_chain(route_handler(Arc::clone(&table)))?;

        tracing::info!(
            slices = slices.len(),
            routes = table.len(),
            lazy_endpoints,
            "Router built"
        );

        Ok(Router {
            chain,
            table,
            resolver,
            slices,
        })
    }
}

fn resolve_endpoint(
    resolver: &Arc<EndpointResolver>,
    lazy: bool,
    path: &str,
    spec: &EndpointSpec,
) -> Result<Arc<dyn Endpoint>, RoutingError> {
    if lazy {
        resolver.resolve_lazy(path, spec)
    } else {
        resolver.resolve(path, spec)
    }
}

/// Final handler: route table lookup and endpoint call.
fn route_handler(table: Arc<RouteTable>) -> Handler {
    chain::handler(move |mut request: Request| {
        match table.lookup(request.method(), request.uri().path()) {
            RouteMatch::Found {
                endpoint,
                pattern,
                params,
            } => {
                tracing::debug!(
                    method = %request.method(),
                    pattern = %pattern,
                    endpoint = %endpoint.name(),
                    "Route matched"
                );
                request.extensions_mut().insert(params);
                endpoint.call(request)
            }
            RouteMatch::MethodNotAllowed(allowed) => {
                tracing::warn!(
                    method = %request.method(),
                    path = %request.uri().path(),
                    "Method not allowed"
                );
                method_not_allowed(&allowed)
            }
            RouteMatch::NotFound => {
                tracing::warn!(
                    method = %request.method(),
                    path = %request.uri().path(),
                    "No route matched"
                );
                Reply::Text(StatusCode::NOT_FOUND, "Not Found".to_string())
            }
        }
    })
}

fn method_not_allowed(allowed: &[Method]) -> Reply {
    let allow = allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    if let Ok(value) = HeaderValue::from_str(&allow) {
        headers.insert(header::ALLOW, value);
    }
    Reply::Parts(
        StatusCode::METHOD_NOT_ALLOWED,
        headers,
        Bytes::from_static(b"Method Not Allowed"),
    )
}

/// Immutable, compiled router.
pub struct Router {
    chain: Handler,
    table: Arc<RouteTable>,
    resolver: Arc<EndpointResolver>,
    slices: SliceRegistry,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Run `request` through the dispatch chain.
    pub fn dispatch(&self, request: Request) -> NormalizedResponse {
        let start = Instant::now();
        let context = RequestContext::from_request(&request);

        let response = (self.chain)(request).normalize(&context);

        let slice = self.resolver.slice_name_for(&context.path).unwrap_or("none");
        metrics::record_dispatch(slice, response.status(), start);
        tracing::debug!(
            method = %context.method,
            path = %context.path,
            slice = %slice,
            status = response.status().as_u16(),
            "Request dispatched"
        );
        response
    }

    /// Registered routes in registration order.
    pub fn routes(&self) -> &[RouteSummary] {
        self.table.routes()
    }

    pub fn slices(&self) -> &SliceRegistry {
        &self.slices
    }

    pub fn resolver(&self) -> &EndpointResolver {
        &self.resolver
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("slices", &self.slices.len())
            .field("routes", &self.table.len())
            .finish()
    }
}
