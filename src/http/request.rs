//! Request representation handed through the dispatch chain.
//!
//! # Responsibilities
//! - Fix the in-process request type (buffered body, `http` parts)
//! - Carry captured route parameters in request extensions
//! - Snapshot the request context a response is normalized against
//!
//! # Design Decisions
//! - Bodies are buffered by the transport before dispatch; the core never
//!   awaits I/O
//! - Request ID travels as the `x-request-id` header so every layer sees it

use axum::body::Bytes;
use axum::http::Method;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// A fully buffered request.
pub type Request = axum::http::Request<Bytes>;

/// Parameters captured by the route pattern, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(Vec<(String, String)>);

impl RouteParams {
    pub fn new(params: Vec<(String, String)>) -> Self {
        Self(params)
    }

    /// Value of the named parameter, if captured.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Extension methods for reading routing data off a request.
pub trait RequestExt {
    /// Route parameters captured for this request (empty before routing).
    fn route_params(&self) -> RouteParams;

    /// The correlation ID, if one has been assigned.
    fn request_id(&self) -> Option<&str>;
}

impl RequestExt for Request {
    fn route_params(&self) -> RouteParams {
        self.extensions()
            .get::<RouteParams>()
            .cloned()
            .unwrap_or_default()
    }

    fn request_id(&self) -> Option<&str> {
        self.headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
    }
}

/// The parts of the originating request a normalized response keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub request_id: Option<String>,
}

impl RequestContext {
    pub fn from_request(request: &Request) -> Self {
        Self {
            method: request.method().clone(),
            path: request.uri().path().to_string(),
            request_id: request.request_id().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_params_lookup() {
        let params = RouteParams::new(vec![
            ("id".to_string(), "42".to_string()),
            ("format".to_string(), "json".to_string()),
        ]);
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.get("format"), Some("json"));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn test_context_captures_request_id() {
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("http://example.com/admin/users?page=2")
            .header(X_REQUEST_ID, "abc-123")
            .body(Bytes::new())
            .unwrap();

        let ctx = RequestContext::from_request(&request);
        assert_eq!(ctx.method, Method::POST);
        assert_eq!(ctx.path, "/admin/users");
        assert_eq!(ctx.request_id.as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_params_default_to_empty() {
        let request = axum::http::Request::builder().uri("/").body(Bytes::new()).unwrap();
        assert!(request.route_params().is_empty());
        assert_eq!(request.request_id(), None);
    }
}
