//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Transport settings.
    pub server: ServerConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,

    /// Router behavior.
    pub router: RouterConfig,

    /// Application middleware, registered under `/` in order.
    pub middleware: Vec<MiddlewareConfig>,

    /// Slices, mounted in declaration order.
    pub slices: Vec<SliceConfig>,
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:2300").
    pub bind_address: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,

    /// Maximum buffered request body size.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:2300".to_string(),
            request_timeout_secs: 30,
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Resolve string endpoints on first request instead of at boot.
    pub lazy_endpoints: bool,
}

/// A middleware registration by name.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MiddlewareConfig {
    /// Registry name (e.g., "request_id").
    pub name: String,

    /// Construction arguments.
    #[serde(default)]
    pub args: Vec<Value>,
}

/// A slice and everything it declares.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SliceConfig {
    /// Unique slice name.
    pub name: String,

    /// Mount path (e.g., "/admin").
    pub at: String,

    /// Slice middleware, relative to the mount path.
    #[serde(default)]
    pub middleware: Vec<MiddlewareConfig>,

    /// Static actions, registered as `actions.<key>`.
    #[serde(default)]
    pub actions: Vec<ActionConfig>,

    /// Routes, relative to the mount path.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// An action replying with a fixed response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ActionConfig {
    /// Action key (e.g., "users.index").
    pub key: String,

    #[serde(default = "default_status")]
    pub status: u16,

    #[serde(default)]
    pub body: String,

    #[serde(default = "default_content_type")]
    pub content_type: String,
}

fn default_status() -> u16 {
    200
}

fn default_content_type() -> String {
    "text/plain; charset=utf-8".to_string()
}

/// A route inside a slice.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// HTTP method (default: GET).
    #[serde(default = "default_method")]
    pub method: String,

    /// Path pattern relative to the slice mount (`/users/{id}`).
    pub path: String,

    /// Action key this route dispatches to.
    pub to: String,
}

fn default_method() -> String {
    "GET".to_string()
}
