//! Request ID assignment.
//!
//! Assigns a UUID v4 to every request that arrives without an
//! `x-request-id` header and echoes the ID back on the response.

use axum::http::HeaderValue;
use serde_json::Value;
use uuid::Uuid;

use crate::http::request::{RequestContext, X_REQUEST_ID};
use crate::http::response::Reply;
use crate::middleware::chain::{self, Handler};
use crate::middleware::error::MiddlewareError;
use crate::middleware::stack::{Middleware, Options};

#[derive(Debug, Default)]
pub struct RequestId;

impl Middleware for RequestId {
    fn name(&self) -> &str {
        "request_id"
    }

    fn build(&self, next: Handler, args: &[Value], _options: &Options) -> Result<Handler, MiddlewareError> {
        if !args.is_empty() {
            return Err(MiddlewareError::invalid_arguments(
                self.name(),
                "takes no arguments",
            ));
        }

        Ok(chain::handler(move |mut request| {
            let id = match request.headers().get(X_REQUEST_ID) {
                Some(existing) => existing.clone(),
                None => {
                    let generated = HeaderValue::from_str(&Uuid::new_v4().to_string())
                        .unwrap_or_else(|_| HeaderValue::from_static("unknown"));
                    request.headers_mut().insert(X_REQUEST_ID, generated.clone());
                    generated
                }
            };

            let context = RequestContext::from_request(&request);
            let mut response = next(request).normalize(&context);
            response.headers_mut().insert(X_REQUEST_ID, id);
            Reply::Normalized(response)
        }))
    }
}
