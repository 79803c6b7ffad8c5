//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace + timeout layers, body buffering)
//!     → request.rs (buffered request, route params, request context)
//!     → routing::Router dispatch
//!     → response.rs (Reply normalized into NormalizedResponse)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{Request, RequestContext, RequestExt, RouteParams, X_REQUEST_ID};
pub use response::{NormalizedResponse, Reply};
