//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_dispatch_total` (counter): dispatched requests by slice, status
//! - `router_dispatch_duration_seconds` (histogram): dispatch latency by slice
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - The Prometheus exporter serves its own HTTP listener

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::StatusCode;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one dispatched request.
pub fn record_dispatch(slice: &str, status: StatusCode, start: Instant) {
    metrics::counter!(
        "router_dispatch_total",
        "slice" => slice.to_string(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);
    metrics::histogram!("router_dispatch_duration_seconds", "slice" => slice.to_string())
        .record(start.elapsed().as_secs_f64());
}
