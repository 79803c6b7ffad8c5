//! Slices: independently configured sub-applications.
//!
//! # Data Flow
//! ```text
//! Boot:
//!     Slice (name, mount, container, middleware, routes)
//!     → registry.rs (SliceRegistryBuilder, duplicate names rejected)
//!     → SliceRegistry (frozen, shared by resolver and router)
//!
//! Resolution:
//!     "users.index" at /admin/users
//!     → owning slice's container.rs lookup of "actions.users.index"
//! ```

pub mod action;
pub mod container;
pub mod registry;

pub use action::StaticAction;
pub use container::{ComponentRegistry, Container};
pub use registry::{Slice, SliceRegistry, SliceRegistryBuilder};
