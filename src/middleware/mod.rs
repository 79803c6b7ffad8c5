//! Middleware subsystem.
//!
//! # Data Flow
//! ```text
//! Boot:
//!     app config + each slice
//!     → stack.rs (use / use_before / use_after, scoped by prefix)
//!     → slice stacks rebased under their mount path, merged via update()
//!     → to_dispatch_chain(final handler)
//!     → chain.rs (nested Handler, prefix sub-dispatch)
//!
//! Request:
//!     root middleware (first registered = outermost)
//!     → prefix middleware for the longest matching mount, if any
//!     → final handler (route table + endpoint)
//! ```
//!
//! # Design Decisions
//! - The chain is built once and never mutated afterwards
//! - Build errors abort boot; nothing is caught here

pub mod access_log;
pub mod chain;
pub mod error;
pub mod headers;
pub mod registry;
pub mod request_id;
pub mod stack;

pub use chain::{handler, Handler};
pub use error::MiddlewareError;
pub use registry::MiddlewareRegistry;
pub use stack::{
    ConfigBlock, Middleware, MiddlewareEntry, MiddlewareRef, MiddlewareStack, Options, Placement,
    ROOT_PREFIX,
};
