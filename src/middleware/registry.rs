//! Name → middleware lookup for configuration-declared middleware.
//!
//! Looking up the same name twice yields the same `MiddlewareRef`, so
//! config-declared registrations take part in anchoring and dedup exactly
//! like ones made in code.

use std::collections::HashMap;

use crate::middleware::access_log::AccessLog;
use crate::middleware::error::MiddlewareError;
use crate::middleware::headers::SetHeaders;
use crate::middleware::request_id::RequestId;
use crate::middleware::stack::MiddlewareRef;

#[derive(Debug, Clone, Default)]
pub struct MiddlewareRegistry {
    by_name: HashMap<String, MiddlewareRef>,
}

impl MiddlewareRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with `request_id`, `access_log` and `set_headers`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(MiddlewareRef::new(RequestId));
        registry.register(MiddlewareRef::new(AccessLog));
        registry.register(MiddlewareRef::new(SetHeaders));
        registry
    }

    /// Register under the middleware's own name, replacing any previous one.
    pub fn register(&mut self, middleware: MiddlewareRef) -> MiddlewareRef {
        self.by_name
            .insert(middleware.name().to_string(), middleware.clone());
        middleware
    }

    pub fn get(&self, name: &str) -> Result<MiddlewareRef, MiddlewareError> {
        self.by_name
            .get(name)
            .cloned()
            .ok_or_else(|| MiddlewareError::Unknown(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
