//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Router dispatch and middleware produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (dispatch counters and latency histogram)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every event once `request_id` is installed
//! - Metrics are cheap (atomic increments) and no-ops without an exporter

pub mod logging;
pub mod metrics;
