//! Per-request access log line.

use std::time::Instant;

use serde_json::Value;

use crate::http::request::RequestContext;
use crate::middleware::chain::{self, Handler};
use crate::middleware::error::MiddlewareError;
use crate::middleware::stack::{Middleware, Options};

/// Emits one `tracing` event per request with status and latency.
///
/// Takes an optional single string argument used as the log target label.
#[derive(Debug, Default)]
pub struct AccessLog;

impl Middleware for AccessLog {
    fn name(&self) -> &str {
        "access_log"
    }

    fn build(&self, next: Handler, args: &[Value], _options: &Options) -> Result<Handler, MiddlewareError> {
        let label = match args {
            [] => "access".to_string(),
            [Value::String(label)] => label.clone(),
            _ => {
                return Err(MiddlewareError::invalid_arguments(
                    self.name(),
                    "expects at most one string label",
                ))
            }
        };

        Ok(chain::handler(move |request| {
            let started = Instant::now();
            let context = RequestContext::from_request(&request);
            let reply = next(request);

            tracing::info!(
                log = %label,
                method = %context.method,
                path = %context.path,
                request_id = context.request_id.as_deref().unwrap_or("-"),
                status = reply.status().as_u16(),
                elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
                "Request handled"
            );
            reply
        }))
    }
}
