//! Per-slice component container.
//!
//! # Responsibilities
//! - Map string keys (`actions.users.index`) to components
//! - Instantiate factory-registered components on first use and memoize them
//!
//! # Design Decisions
//! - Registration needs `&mut self` (boot only); lookups take `&self`
//! - Memoized instances live in a `DashMap` so concurrent first lookups
//!   don't serialize behind a global lock

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::routing::endpoint::Component;

/// Read access to a slice's components.
pub trait Container: Send + Sync {
    /// Fetch the component registered under `key`.
    fn get(&self, key: &str) -> Option<Component>;

    /// True when `key` is registered (instantiated or not).
    fn has(&self, key: &str) -> bool;
}

type Factory = Arc<dyn Fn() -> Component + Send + Sync>;

/// Default `Container` implementation.
#[derive(Default)]
pub struct ComponentRegistry {
    factories: HashMap<String, Factory>,
    instances: DashMap<String, Component>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a ready-made component.
    pub fn register(&mut self, key: impl Into<String>, component: Component) -> &mut Self {
        let key = key.into();
        self.factories.remove(&key);
        self.instances.insert(key, component);
        self
    }

    /// Register a component built on first lookup.
    pub fn register_factory<F>(&mut self, key: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Component + Send + Sync + 'static,
    {
        let key = key.into();
        self.instances.remove(&key);
        self.factories.insert(key, Arc::new(factory));
        self
    }

    /// All registered keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .factories
            .keys()
            .cloned()
            .chain(self.instances.iter().map(|r| r.key().clone()))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty() && self.instances.is_empty()
    }
}

impl Container for ComponentRegistry {
    fn get(&self, key: &str) -> Option<Component> {
        if let Some(instance) = self.instances.get(key) {
            return Some(instance.value().clone());
        }

        // Built outside the shard lock so factories may read the container.
        // Racing callers each build one; the first insert wins.
        let built = (self.factories.get(key)?)();
        match self.instances.entry(key.to_string()) {
            Entry::Occupied(existing) => Some(existing.get().clone()),
            Entry::Vacant(slot) => {
                tracing::debug!(key = %key, "Component instantiated");
                Some(slot.insert(built).value().clone())
            }
        }
    }

    fn has(&self, key: &str) -> bool {
        self.factories.contains_key(key) || self.instances.contains_key(key)
    }
}
