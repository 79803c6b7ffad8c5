//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Boot:
//!     slices registered in order
//!     → trie.rs (mount path → slice name)
//!     → resolver.rs (EndpointSpec → Arc<dyn Endpoint>, per owning slice)
//!     → table.rs (method + pattern → endpoint)
//!     → router.rs (table + compiled middleware chain, frozen)
//!
//! Request:
//!     router.rs dispatch
//!     → middleware chain
//!     → table lookup (404 / 405 / endpoint)
//!     → Reply normalized against the originating request
//! ```
//!
//! # Design Decisions
//! - Everything here is built once and read-only afterwards
//! - Trie lookups never fail; absence becomes an error only in the resolver
//! - Nothing in this module awaits; the transport owns all I/O

pub mod endpoint;
pub mod error;
pub mod resolver;
pub mod router;
pub mod table;
pub mod trie;

pub use endpoint::{Component, Endpoint, EndpointClass, EndpointSpec};
pub use error::{BuildError, RoutingError};
pub use resolver::{EndpointResolver, EndpointResolverBuilder};
pub use router::{Router, RouterBuilder};
pub use table::{RouteDef, RouteSummary};
pub use trie::PathTrie;
