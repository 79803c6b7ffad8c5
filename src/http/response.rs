//! Handler output and the normalized response envelope.
//!
//! # Responsibilities
//! - Accept the loose shapes endpoints like to return (status, text, JSON,
//!   raw parts) as a single `Reply` type
//! - Coerce any `Reply` into a `NormalizedResponse` bound to its request
//! - Convert the envelope into an `http` response for the transport
//!
//! # Design Decisions
//! - An already-normalized reply passes through untouched
//! - Text bodies default to `text/plain; charset=utf-8` unless a
//!   content type was set explicitly

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};

use crate::http::request::RequestContext;

/// Whatever a handler or middleware hands back.
#[derive(Debug, Clone)]
pub enum Reply {
    Normalized(NormalizedResponse),
    Status(StatusCode),
    Text(StatusCode, String),
    Json(StatusCode, serde_json::Value),
    Parts(StatusCode, HeaderMap, Bytes),
}

impl Reply {
    /// Wrap this reply into a response envelope for `context`.
    pub fn normalize(self, context: &RequestContext) -> NormalizedResponse {
        match self {
            Reply::Normalized(response) => response,
            Reply::Status(status) => NormalizedResponse::new(
                status,
                HeaderMap::new(),
                Bytes::new(),
                context.clone(),
            ),
            Reply::Text(status, text) => {
                let mut headers = HeaderMap::new();
                headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("text/plain; charset=utf-8"),
                );
                NormalizedResponse::new(status, headers, Bytes::from(text), context.clone())
            }
            Reply::Json(status, value) => {
                let mut headers = HeaderMap::new();
                headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
                let body = Bytes::from(value.to_string());
                NormalizedResponse::new(status, headers, body, context.clone())
            }
            Reply::Parts(status, headers, body) => {
                NormalizedResponse::new(status, headers, body, context.clone())
            }
        }
    }

    /// Status code this reply will carry once normalized.
    pub fn status(&self) -> StatusCode {
        match self {
            Reply::Normalized(response) => response.status(),
            Reply::Status(status)
            | Reply::Text(status, _)
            | Reply::Json(status, _)
            | Reply::Parts(status, _, _) => *status,
        }
    }
}

impl From<NormalizedResponse> for Reply {
    fn from(response: NormalizedResponse) -> Self {
        Reply::Normalized(response)
    }
}

impl From<StatusCode> for Reply {
    fn from(status: StatusCode) -> Self {
        Reply::Status(status)
    }
}

impl From<&'static str> for Reply {
    fn from(text: &'static str) -> Self {
        Reply::Text(StatusCode::OK, text.to_string())
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Reply::Text(StatusCode::OK, text)
    }
}

impl From<(StatusCode, &'static str)> for Reply {
    fn from((status, text): (StatusCode, &'static str)) -> Self {
        Reply::Text(status, text.to_string())
    }
}

impl From<(StatusCode, String)> for Reply {
    fn from((status, text): (StatusCode, String)) -> Self {
        Reply::Text(status, text)
    }
}

impl From<serde_json::Value> for Reply {
    fn from(value: serde_json::Value) -> Self {
        Reply::Json(StatusCode::OK, value)
    }
}

impl From<(StatusCode, HeaderMap, Bytes)> for Reply {
    fn from((status, headers, body): (StatusCode, HeaderMap, Bytes)) -> Self {
        Reply::Parts(status, headers, body)
    }
}

/// Uniform response shape produced by the router regardless of which slice
/// or middleware generated it.
#[derive(Debug, Clone)]
pub struct NormalizedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    context: RequestContext,
}

impl NormalizedResponse {
    pub fn new(
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
        context: RequestContext,
    ) -> Self {
        Self {
            status,
            headers,
            body,
            context,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The request this response answers.
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Convert into a transport response.
    pub fn into_http(self) -> axum::http::Response<Body> {
        let mut response = axum::http::Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
