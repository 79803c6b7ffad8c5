//! Static response headers.

use axum::http::{HeaderName, HeaderValue};
use serde_json::Value;

use crate::http::request::RequestContext;
use crate::http::response::Reply;
use crate::middleware::chain::{self, Handler};
use crate::middleware::error::MiddlewareError;
use crate::middleware::stack::{Middleware, Options};

/// Sets headers on every response passing through.
///
/// Arguments are JSON objects mapping header names to string values; a
/// configuration block may add more under the same keys. Headers already
/// set by the inner handler are left alone.
#[derive(Debug, Default)]
pub struct SetHeaders;

impl SetHeaders {
    fn parse(&self, object: &serde_json::Map<String, Value>, into: &mut Vec<(HeaderName, HeaderValue)>) -> Result<(), MiddlewareError> {
        for (name, value) in object {
            let value = value.as_str().ok_or_else(|| {
                MiddlewareError::invalid_arguments(self.name(), format!("header {} must be a string", name))
            })?;
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| MiddlewareError::invalid_arguments(self.name(), e.to_string()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| MiddlewareError::invalid_arguments(self.name(), e.to_string()))?;
            into.push((name, value));
        }
        Ok(())
    }
}

impl Middleware for SetHeaders {
    fn name(&self) -> &str {
        "set_headers"
    }

    fn build(&self, next: Handler, args: &[Value], options: &Options) -> Result<Handler, MiddlewareError> {
        let mut headers = Vec::new();
        for arg in args {
            let object = arg.as_object().ok_or_else(|| {
                MiddlewareError::invalid_arguments(self.name(), "arguments must be header tables")
            })?;
            self.parse(object, &mut headers)?;
        }
        self.parse(options, &mut headers)?;

        if headers.is_empty() {
            return Err(MiddlewareError::Build {
                middleware: self.name().to_string(),
                reason: "no headers configured".to_string(),
            });
        }

        Ok(chain::handler(move |request| {
            let context = RequestContext::from_request(&request);
            let mut response = next(request).normalize(&context);
            for (name, value) in &headers {
                if !response.headers().contains_key(name) {
                    response.headers_mut().insert(name.clone(), value.clone());
                }
            }
            Reply::Normalized(response)
        }))
    }
}
