//! Endpoints and the shapes they can be specified in.
//!
//! A route names its endpoint in one of three ways: a string key resolved
//! through the owning slice's container, a "class" that is either directly
//! callable or constructed on demand, or a ready-made component. All three
//! end up as an `Arc<dyn Endpoint>` once resolved.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::http::request::Request;
use crate::http::response::Reply;

/// A concrete request handler.
pub trait Endpoint: Send + Sync {
    /// Handle one request.
    fn call(&self, request: Request) -> Reply;

    /// Name used in logs and diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> Endpoint for F
where
    F: Fn(Request) -> Reply + Send + Sync,
{
    fn call(&self, request: Request) -> Reply {
        self(request)
    }
}

/// A value stored in a slice container or handed to a route directly.
///
/// Only the `Callable` variant satisfies the endpoint contract; anything
/// else is rejected at resolution time.
#[derive(Clone)]
pub enum Component {
    Callable(Arc<dyn Endpoint>),
    Opaque {
        type_name: &'static str,
        value: Arc<dyn Any + Send + Sync>,
    },
}

impl Component {
    pub fn callable<E: Endpoint + 'static>(endpoint: E) -> Self {
        Component::Callable(Arc::new(endpoint))
    }

    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Component::Opaque {
            type_name: std::any::type_name::<T>(),
            value: Arc::new(value),
        }
    }

    /// The endpoint, when this component is invocable.
    pub fn into_endpoint(self) -> Result<Arc<dyn Endpoint>, Component> {
        match self {
            Component::Callable(endpoint) => Ok(endpoint),
            other => Err(other),
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Component::Callable(_))
    }

    /// Downcast an opaque component's value.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Component::Opaque { value, .. } => value.downcast_ref::<T>(),
            Component::Callable(_) => None,
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Callable(endpoint) => {
                f.debug_tuple("Callable").field(&endpoint.name()).finish()
            }
            Component::Opaque { type_name, .. } => {
                f.debug_tuple("Opaque").field(type_name).finish()
            }
        }
    }
}

type Constructor = Arc<dyn Fn() -> Component + Send + Sync>;

/// A type-like endpoint specifier.
///
/// A class either answers calls itself, in which case it is used as-is, or
/// must be instantiated with no arguments to obtain the component.
#[derive(Clone)]
pub struct EndpointClass {
    name: String,
    kind: ClassKind,
}

#[derive(Clone)]
enum ClassKind {
    Callable(Arc<dyn Endpoint>),
    Constructible(Constructor),
}

impl EndpointClass {
    /// A class that is itself invocable.
    pub fn callable<E: Endpoint + 'static>(name: impl Into<String>, endpoint: E) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Callable(Arc::new(endpoint)),
        }
    }

    /// A class instantiated through a zero-argument constructor.
    pub fn constructible<F>(name: impl Into<String>, new: F) -> Self
    where
        F: Fn() -> Component + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind: ClassKind::Constructible(Arc::new(new)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_directly_callable(&self) -> bool {
        matches!(self.kind, ClassKind::Callable(_))
    }

    /// The class itself if callable, otherwise a fresh instance.
    pub fn instantiate(&self) -> Component {
        match &self.kind {
            ClassKind::Callable(endpoint) => Component::Callable(Arc::clone(endpoint)),
            ClassKind::Constructible(new) => new(),
        }
    }
}

impl fmt::Debug for EndpointClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointClass")
            .field("name", &self.name)
            .field("directly_callable", &self.is_directly_callable())
            .finish()
    }
}

/// How a route names its endpoint.
#[derive(Debug, Clone)]
pub enum EndpointSpec {
    /// `"controller.action"` key, looked up as `actions.<key>` in the owning slice.
    Key(String),
    Class(EndpointClass),
    Instance(Component),
}

impl EndpointSpec {
    pub fn key(key: impl Into<String>) -> Self {
        EndpointSpec::Key(key.into())
    }

    pub fn instance<E: Endpoint + 'static>(endpoint: E) -> Self {
        EndpointSpec::Instance(Component::callable(endpoint))
    }
}

impl From<&str> for EndpointSpec {
    fn from(key: &str) -> Self {
        EndpointSpec::Key(key.to_string())
    }
}

impl From<String> for EndpointSpec {
    fn from(key: String) -> Self {
        EndpointSpec::Key(key)
    }
}

impl From<EndpointClass> for EndpointSpec {
    fn from(class: EndpointClass) -> Self {
        EndpointSpec::Class(class)
    }
}

impl From<Component> for EndpointSpec {
    fn from(component: Component) -> Self {
        EndpointSpec::Instance(component)
    }
}
