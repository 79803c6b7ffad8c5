//! Method + pattern route table.
//!
//! # Responsibilities
//! - Hold resolved endpoints keyed by HTTP method and path pattern
//! - Match an incoming (method, path) pair, capturing parameters
//! - Distinguish "no such path" from "path exists under another method"
//!
//! # Design Decisions
//! - One `matchit` tree per method; patterns use `{param}` / `{*rest}`
//! - HEAD falls back to the GET route when no HEAD route is declared
//! - Built at boot, read-only afterwards

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::Method;

use crate::http::request::RouteParams;
use crate::routing::endpoint::{Endpoint, EndpointSpec};
use crate::routing::error::RoutingError;

/// A declared route before its endpoint is resolved.
#[derive(Debug, Clone)]
pub struct RouteDef {
    method: Method,
    path: String,
    endpoint: EndpointSpec,
}

impl RouteDef {
    pub fn new(method: Method, path: &str, endpoint: impl Into<EndpointSpec>) -> Self {
        Self {
            method,
            path: path.to_string(),
            endpoint: endpoint.into(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn endpoint(&self) -> &EndpointSpec {
        &self.endpoint
    }
}

/// Summary of a registered route, for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSummary {
    pub method: Method,
    pub path: String,
    pub endpoint: String,
}

struct RouteTarget {
    pattern: String,
    endpoint: Arc<dyn Endpoint>,
}

/// Outcome of a table lookup.
pub enum RouteMatch<'a> {
    Found {
        endpoint: &'a Arc<dyn Endpoint>,
        pattern: &'a str,
        params: RouteParams,
    },
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

#[derive(Default)]
pub struct RouteTable {
    by_method: HashMap<Method, matchit::Router<RouteTarget>>,
    summaries: Vec<RouteSummary>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, method: Method, pattern: &str, endpoint: Arc<dyn Endpoint>) -> Result<(), RoutingError> {
        let summary = RouteSummary {
            method: method.clone(),
            path: pattern.to_string(),
            endpoint: endpoint.name().to_string(),
        };
        let target = RouteTarget {
            pattern: pattern.to_string(),
            endpoint,
        };

        self.by_method
            .entry(method.clone())
            .or_insert_with(matchit::Router::new)
            .insert(pattern, target)
            .map_err(|e| RoutingError::InvalidRoute {
                method: method.to_string(),
                path: pattern.to_string(),
                reason: e.to_string(),
            })?;

        self.summaries.push(summary);
        Ok(())
    }

    pub fn lookup(&self, method: &Method, path: &str) -> RouteMatch<'_> {
        if let Some(found) = self.find(method, path) {
            return found;
        }
        if *method == Method::HEAD {
            if let Some(found) = self.find(&Method::GET, path) {
                return found;
            }
        }

        let mut allowed: Vec<Method> = self
            .by_method
            .iter()
            .filter(|(m, router)| *m != method && router.at(path).is_ok())
            .map(|(m, _)| m.clone())
            .collect();

        if allowed.is_empty() {
            RouteMatch::NotFound
        } else {
            allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
            RouteMatch::MethodNotAllowed(allowed)
        }
    }

    fn find(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        let router = self.by_method.get(method)?;
        let matched = router.at(path).ok()?;
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Some(RouteMatch::Found {
            endpoint: &matched.value.endpoint,
            pattern: &matched.value.pattern,
            params: RouteParams::new(params),
        })
    }

    /// Registered routes in insertion order.
    pub fn routes(&self) -> &[RouteSummary] {
        &self.summaries
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}
