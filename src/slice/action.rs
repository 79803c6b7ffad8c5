//! Actions declared in configuration.
//!
//! These reply with a fixed status, body and content type, which is enough
//! for the binary to serve a configured application without compiled-in
//! handlers.

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};

use crate::config::schema::ActionConfig;
use crate::http::request::Request;
use crate::http::response::Reply;
use crate::routing::endpoint::Endpoint;

/// Endpoint replying with a canned response.
#[derive(Debug, Clone)]
pub struct StaticAction {
    name: String,
    status: StatusCode,
    content_type: HeaderValue,
    body: Bytes,
}

impl StaticAction {
    pub fn new(
        name: impl Into<String>,
        status: StatusCode,
        content_type: HeaderValue,
        body: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            content_type,
            body: body.into(),
        }
    }

    /// Build from a config entry; `None` if the status or content type is invalid.
    pub fn from_config(config: &ActionConfig) -> Option<Self> {
        let status = StatusCode::from_u16(config.status).ok()?;
        let content_type = HeaderValue::from_str(&config.content_type).ok()?;
        Some(Self::new(
            config.key.clone(),
            status,
            content_type,
            config.body.clone(),
        ))
    }
}

impl Endpoint for StaticAction {
    fn call(&self, _request: Request) -> Reply {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, self.content_type.clone());
        Reply::Parts(self.status, headers, self.body.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
