//! Ordered, prefix-scoped middleware stack.
//!
//! # Responsibilities
//! - Record middleware registrations per path prefix, in order
//! - Splice entries before/after an existing middleware on request
//! - Merge stacks contributed by several slices
//! - Compile everything into one nested `Handler`
//!
//! # Design Decisions
//! - Middleware are compared by reference (`MiddlewareRef` pointer identity),
//!   never by value
//! - Duplicate registrations (same middleware, same arguments, same block)
//!   are dropped inside `insert`; `update` concatenates without dedup
//! - An `After` anchor that is not present lands the entry at the front of
//!   the prefix's list; a missing `Before` anchor appends
//! - The prefix cursor is only ever changed through `with`, which restores
//!   it on every exit path, unwinding included

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use serde_json::Value;

use crate::middleware::chain::{self, Handler};
use crate::middleware::error::MiddlewareError;

/// Prefix every stack starts out registering under.
pub const ROOT_PREFIX: &str = "/";

/// Options a configuration block may fill in before a middleware is built.
pub type Options = serde_json::Map<String, Value>;

/// A request/response wrapping layer.
pub trait Middleware: Send + Sync {
    /// Stable name, used in logs and config.
    fn name(&self) -> &str;

    /// Wrap `next`, producing the handler that runs this middleware.
    fn build(&self, next: Handler, args: &[Value], options: &Options) -> Result<Handler, MiddlewareError>;
}

/// Shared handle to a middleware, compared by identity.
#[derive(Clone)]
pub struct MiddlewareRef(Arc<dyn Middleware>);

impl MiddlewareRef {
    pub fn new<M: Middleware + 'static>(middleware: M) -> Self {
        Self(Arc::new(middleware))
    }

    /// Middleware from a closure receiving the request and the next handler.
    pub fn from_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(crate::http::request::Request, &Handler) -> crate::http::response::Reply
            + Send
            + Sync
            + 'static,
    {
        Self::new(FnMiddleware {
            name: name.into(),
            f: Arc::new(f),
        })
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    fn build(&self, next: Handler, args: &[Value], options: &Options) -> Result<Handler, MiddlewareError> {
        self.0.build(next, args, options)
    }
}

impl PartialEq for MiddlewareRef {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl Eq for MiddlewareRef {}

impl fmt::Debug for MiddlewareRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MiddlewareRef").field(&self.name()).finish()
    }
}

type FnMiddlewareBody =
    Arc<dyn Fn(crate::http::request::Request, &Handler) -> crate::http::response::Reply + Send + Sync>;

struct FnMiddleware {
    name: String,
    f: FnMiddlewareBody,
}

impl Middleware for FnMiddleware {
    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, next: Handler, _args: &[Value], _options: &Options) -> Result<Handler, MiddlewareError> {
        let f = Arc::clone(&self.f);
        Ok(chain::handler(move |request| f(request, &next)))
    }
}

/// Configuration block attached to a registration, compared by identity.
#[derive(Clone)]
pub struct ConfigBlock(Arc<dyn Fn(&mut Options) + Send + Sync>);

impl ConfigBlock {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Options) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    fn apply(&self, options: &mut Options) {
        (self.0)(options)
    }
}

impl PartialEq for ConfigBlock {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl fmt::Debug for ConfigBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConfigBlock(..)")
    }
}

/// One registration: middleware, construction arguments and optional block.
#[derive(Debug, Clone)]
pub struct MiddlewareEntry {
    middleware: MiddlewareRef,
    arguments: Vec<Value>,
    block: Option<ConfigBlock>,
}

impl MiddlewareEntry {
    pub fn new(middleware: MiddlewareRef, arguments: Vec<Value>) -> Self {
        Self {
            middleware,
            arguments,
            block: None,
        }
    }

    pub fn with_block(mut self, block: ConfigBlock) -> Self {
        self.block = Some(block);
        self
    }

    pub fn middleware(&self) -> &MiddlewareRef {
        &self.middleware
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    pub fn block(&self) -> Option<&ConfigBlock> {
        self.block.as_ref()
    }

    /// Same middleware, equal arguments and the same block (or none on both).
    fn duplicates(&self, other: &MiddlewareEntry) -> bool {
        self.middleware == other.middleware
            && self.arguments == other.arguments
            && self.block == other.block
    }

    fn build(&self, next: Handler) -> Result<Handler, MiddlewareError> {
        let mut options = Options::new();
        if let Some(block) = &self.block {
            block.apply(&mut options);
        }
        self.middleware.build(next, &self.arguments, &options)
    }
}

/// Where `insert` places a new entry.
#[derive(Debug, Clone, Default)]
pub enum Placement {
    #[default]
    Append,
    Before(MiddlewareRef),
    After(MiddlewareRef),
}

/// Middleware registrations grouped by path prefix.
#[derive(Debug, Clone)]
pub struct MiddlewareStack {
    stacks: Vec<(String, Vec<MiddlewareEntry>)>,
    prefix: String,
}

impl Default for MiddlewareStack {
    fn default() -> Self {
        Self {
            stacks: Vec::new(),
            prefix: ROOT_PREFIX.to_string(),
        }
    }
}

impl MiddlewareStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix new registrations currently go to.
    pub fn current_prefix(&self) -> &str {
        &self.prefix
    }

    /// Append `middleware` under the current prefix.
    pub fn use_middleware(&mut self, middleware: &MiddlewareRef, args: Vec<Value>) -> &mut Self {
        self.insert(MiddlewareEntry::new(middleware.clone(), args), Placement::Append)
    }

    /// Insert `middleware` immediately before `anchor`.
    pub fn use_before(&mut self, middleware: &MiddlewareRef, args: Vec<Value>, anchor: &MiddlewareRef) -> &mut Self {
        self.insert(
            MiddlewareEntry::new(middleware.clone(), args),
            Placement::Before(anchor.clone()),
        )
    }

    /// Insert `middleware` immediately after `anchor`.
    pub fn use_after(&mut self, middleware: &MiddlewareRef, args: Vec<Value>, anchor: &MiddlewareRef) -> &mut Self {
        self.insert(
            MiddlewareEntry::new(middleware.clone(), args),
            Placement::After(anchor.clone()),
        )
    }

    /// Register `entry` under the current prefix.
    pub fn insert(&mut self, entry: MiddlewareEntry, placement: Placement) -> &mut Self {
        let prefix = self.prefix.clone();
        let entries = self.entries_mut(&prefix);

        if entries.iter().any(|existing| existing.duplicates(&entry)) {
            tracing::debug!(
                middleware = %entry.middleware.name(),
                prefix = %prefix,
                "Skipping duplicate middleware registration"
            );
            return self;
        }

        let index = match &placement {
            Placement::Append => entries.len(),
            Placement::Before(anchor) => match index_of(entries, anchor) {
                Some(i) => i,
                None => {
                    tracing::warn!(
                        middleware = %entry.middleware.name(),
                        anchor = %anchor.name(),
                        prefix = %prefix,
                        "Anchor middleware not found, appending"
                    );
                    entries.len()
                }
            },
            // Missing anchor reads as index -1, so the entry goes to the front.
            Placement::After(anchor) => index_of(entries, anchor).map_or(0, |i| i + 1),
        };

        entries.insert(index, entry);
        self
    }

    /// Run `f` with registrations directed at `prefix`, restoring the
    /// previous prefix afterwards.
    pub fn with<F, R>(&mut self, prefix: impl Into<String>, f: F) -> R
    where
        F: FnOnce(&mut MiddlewareStack) -> R,
    {
        let mut scope = PrefixScope::enter(self, chain::normalize_prefix(&prefix.into()));
        f(&mut *scope)
    }

    /// Append every prefix list of `other` onto this stack's list for the
    /// same prefix.
    pub fn update(&mut self, other: &MiddlewareStack) -> &mut Self {
        for (prefix, entries) in &other.stacks {
            self.entries_mut(prefix).extend(entries.iter().cloned());
        }
        self
    }

    /// Copy of this stack with every prefix re-rooted under `base`.
    pub fn rebased(&self, base: &str) -> MiddlewareStack {
        let mut rebased = MiddlewareStack::new();
        for (prefix, entries) in &self.stacks {
            let joined = join_prefix(base, prefix);
            rebased.entries_mut(&joined).extend(entries.iter().cloned());
        }
        rebased
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.iter().all(|(_, entries)| entries.is_empty())
    }

    /// Entries registered under `prefix`.
    pub fn entries(&self, prefix: &str) -> &[MiddlewareEntry] {
        let prefix = chain::normalize_prefix(prefix);
        self.stacks
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, entries)| entries.as_slice())
            .unwrap_or(&[])
    }

    /// Prefixes and their entries, in order of first registration.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MiddlewareEntry])> {
        self.stacks
            .iter()
            .map(|(prefix, entries)| (prefix.as_str(), entries.as_slice()))
    }

    /// Compile into a single handler around `final_handler`.
    ///
    /// Root middleware wrap everything, first registered outermost. Each
    /// other prefix wraps `final_handler` only for requests beneath it.
    pub fn to_dispatch_chain(&self, final_handler: Handler) -> Result<Handler, MiddlewareError> {
        let mut mounts = Vec::new();
        for (prefix, entries) in &self.stacks {
            if prefix == ROOT_PREFIX || entries.is_empty() {
                continue;
            }
            let mounted = wrap(entries, Arc::clone(&final_handler))?;
            mounts.push((prefix.clone(), mounted));
        }

        let inner = if mounts.is_empty() {
            final_handler
        } else {
            chain::prefix_dispatch(mounts, final_handler)
        };

        let chain = wrap(self.entries(ROOT_PREFIX), inner)?;
        tracing::debug!(
            prefixes = self.stacks.len(),
            "Middleware dispatch chain compiled"
        );
        Ok(chain)
    }

    fn entries_mut(&mut self, prefix: &str) -> &mut Vec<MiddlewareEntry> {
        let prefix = chain::normalize_prefix(prefix);
        let position = match self.stacks.iter().position(|(p, _)| *p == prefix) {
            Some(position) => position,
            None => {
                self.stacks.push((prefix, Vec::new()));
                self.stacks.len() - 1
            }
        };
        &mut self.stacks[position].1
    }
}

fn index_of(entries: &[MiddlewareEntry], anchor: &MiddlewareRef) -> Option<usize> {
    entries.iter().position(|entry| &entry.middleware == anchor)
}

fn wrap(entries: &[MiddlewareEntry], inner: Handler) -> Result<Handler, MiddlewareError> {
    entries
        .iter()
        .rev()
        .try_fold(inner, |next, entry| entry.build(next))
}

fn join_prefix(base: &str, prefix: &str) -> String {
    let base = base.trim_end_matches('/');
    let prefix = prefix.trim_start_matches('/');
    match (base.is_empty(), prefix.is_empty()) {
        (true, true) => ROOT_PREFIX.to_string(),
        (true, false) => format!("/{}", prefix),
        (false, true) => base.to_string(),
        (false, false) => format!("{}/{}", base, prefix),
    }
}

/// Restores the stack's prefix when dropped.
struct PrefixScope<'a> {
    stack: &'a mut MiddlewareStack,
    previous: Option<String>,
}

impl<'a> PrefixScope<'a> {
    fn enter(stack: &'a mut MiddlewareStack, prefix: String) -> Self {
        let previous = std::mem::replace(&mut stack.prefix, prefix);
        Self {
            stack,
            previous: Some(previous),
        }
    }
}

impl Deref for PrefixScope<'_> {
    type Target = MiddlewareStack;

    fn deref(&self) -> &MiddlewareStack {
        self.stack
    }
}

impl DerefMut for PrefixScope<'_> {
    fn deref_mut(&mut self) -> &mut MiddlewareStack {
        self.stack
    }
}

impl Drop for PrefixScope<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.stack.prefix = previous;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::Request;
    use crate::http::response::Reply;
    use axum::body::Bytes;
    use axum::http::{HeaderValue, StatusCode};
    use serde_json::json;
    use std::sync::Mutex;

    fn marker(name: &'static str) -> MiddlewareRef {
        MiddlewareRef::from_fn(name, |request, next| next(request))
    }

    fn names(stack: &MiddlewareStack, prefix: &str) -> Vec<String> {
        stack
            .entries(prefix)
            .iter()
            .map(|e| e.middleware().name().to_string())
            .collect()
    }

    /// Middleware appending its name to an `x-trace` header on the way in.
    fn tracer(name: &'static str) -> MiddlewareRef {
        MiddlewareRef::from_fn(name, move |mut request: Request, next| {
            let trace = request
                .headers()
                .get("x-trace")
                .and_then(|v| v.to_str().ok())
                .map(|v| format!("{},{}", v, name))
                .unwrap_or_else(|| name.to_string());
            if let Ok(value) = HeaderValue::from_str(&trace) {
                request.headers_mut().insert("x-trace", value);
            }
            next(request)
        })
    }

    fn echo_trace() -> Handler {
        chain::handler(|request: Request| {
            let trace = request
                .headers()
                .get("x-trace")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            Reply::Text(StatusCode::OK, trace)
        })
    }

    fn body(reply: Reply) -> String {
        match reply {
            Reply::Text(_, body) => body,
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    fn request(path: &str) -> Request {
        axum::http::Request::builder().uri(path).body(Bytes::new()).unwrap()
    }

    #[test]
    fn test_append_preserves_order() {
        let logger = marker("logger");
        let auth = marker("auth");
        let mut stack = MiddlewareStack::new();
        stack.use_middleware(&logger, vec![]).use_middleware(&auth, vec![]);

        assert_eq!(names(&stack, ROOT_PREFIX), vec!["logger", "auth"]);
    }

    #[test]
    fn test_use_before_anchor() {
        let logger = marker("logger");
        let auth = marker("auth");
        let mut stack = MiddlewareStack::new();
        stack.use_middleware(&logger, vec![]);
        stack.use_before(&auth, vec![], &logger);

        assert_eq!(names(&stack, ROOT_PREFIX), vec!["auth", "logger"]);
    }

    #[test]
    fn test_use_before_middle_anchor() {
        let (a, b, c) = (marker("a"), marker("b"), marker("c"));
        let mut stack = MiddlewareStack::new();
        stack.use_middleware(&a, vec![]).use_middleware(&b, vec![]);
        stack.use_before(&c, vec![], &b);

        assert_eq!(names(&stack, ROOT_PREFIX), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_use_after_anchor() {
        let (a, b, c) = (marker("a"), marker("b"), marker("c"));
        let mut stack = MiddlewareStack::new();
        stack.use_middleware(&a, vec![]).use_middleware(&b, vec![]);
        stack.use_after(&c, vec![], &a);

        assert_eq!(names(&stack, ROOT_PREFIX), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_use_after_missing_anchor_goes_first() {
        let (a, b, missing) = (marker("a"), marker("b"), marker("missing"));
        let mut stack = MiddlewareStack::new();
        stack.use_middleware(&a, vec![]);
        stack.use_after(&b, vec![], &missing);

        assert_eq!(names(&stack, ROOT_PREFIX), vec!["b", "a"]);
    }

    #[test]
    fn test_use_before_missing_anchor_appends() {
        let (a, b, missing) = (marker("a"), marker("b"), marker("missing"));
        let mut stack = MiddlewareStack::new();
        stack.use_middleware(&a, vec![]);
        stack.use_before(&b, vec![], &missing);

        assert_eq!(names(&stack, ROOT_PREFIX), vec!["a", "b"]);
    }

    #[test]
    fn test_anchor_matches_by_identity_not_name() {
        let first = marker("same");
        let second = marker("same");
        let inserted = marker("inserted");
        let mut stack = MiddlewareStack::new();
        stack.use_middleware(&first, vec![]).use_middleware(&second, vec![]);
        stack.use_after(&inserted, vec![], &second);

        let entries = stack.entries(ROOT_PREFIX);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].middleware(), &second);
        assert_eq!(entries[2].middleware(), &inserted);
    }

    #[test]
    fn test_duplicate_registration_is_skipped() {
        let logger = marker("logger");
        let block = ConfigBlock::new(|_| {});
        let mut stack = MiddlewareStack::new();

        stack.use_middleware(&logger, vec![json!("a")]);
        stack.use_middleware(&logger, vec![json!("a")]);
        assert_eq!(stack.entries(ROOT_PREFIX).len(), 1);

        // Different arguments are a separate registration.
        stack.use_middleware(&logger, vec![json!("b")]);
        assert_eq!(stack.entries(ROOT_PREFIX).len(), 2);

        let with_block = MiddlewareEntry::new(logger.clone(), vec![]).with_block(block.clone());
        stack.insert(with_block.clone(), Placement::Append);
        stack.insert(with_block, Placement::Append);
        assert_eq!(stack.entries(ROOT_PREFIX).len(), 3);

        // Same arguments but a different block reference.
        let other_block = MiddlewareEntry::new(logger.clone(), vec![]).with_block(ConfigBlock::new(|_| {}));
        stack.insert(other_block, Placement::Append);
        assert_eq!(stack.entries(ROOT_PREFIX).len(), 4);
    }

    #[test]
    fn test_with_scopes_prefix() {
        let (a, b) = (marker("a"), marker("b"));
        let mut stack = MiddlewareStack::new();

        stack.with("/admin", |s| {
            assert_eq!(s.current_prefix(), "/admin");
            s.use_middleware(&a, vec![]);
        });
        stack.use_middleware(&b, vec![]);

        assert_eq!(stack.current_prefix(), ROOT_PREFIX);
        assert_eq!(names(&stack, "/admin"), vec!["a"]);
        assert_eq!(names(&stack, ROOT_PREFIX), vec!["b"]);
    }

    #[test]
    fn test_with_restores_prefix_after_panic() {
        let stack = Mutex::new(MiddlewareStack::new());
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut guard = stack.lock().unwrap();
            guard.with("/admin", |_| panic!("boom"));
        }));
        assert!(result.is_err());

        let stack = stack.into_inner().unwrap_or_else(|e| e.into_inner());
        assert_eq!(stack.current_prefix(), ROOT_PREFIX);
    }

    #[test]
    fn test_update_concatenates_per_prefix() {
        let (a, b, c, d) = (marker("a"), marker("b"), marker("c"), marker("d"));
        let mut base = MiddlewareStack::new();
        base.use_middleware(&a, vec![]);
        base.with("/admin", |s| {
            s.use_middleware(&b, vec![]);
        });

        let mut other = MiddlewareStack::new();
        other.use_middleware(&c, vec![]).use_middleware(&a, vec![]);
        other.with("/api", |s| {
            s.use_middleware(&d, vec![]);
        });

        base.update(&other);
        assert_eq!(names(&base, ROOT_PREFIX), vec!["a", "c", "a"]);
        assert_eq!(names(&base, "/admin"), vec!["b"]);
        assert_eq!(names(&base, "/api"), vec!["d"]);
    }

    #[test]
    fn test_prefix_spellings_share_one_list() {
        let (a, b, c) = (tracer("a"), tracer("b"), tracer("c"));
        let mut stack = MiddlewareStack::new();
        stack.with("/admin/", |s| {
            assert_eq!(s.current_prefix(), "/admin");
            s.use_middleware(&a, vec![]);
        });
        stack.with("admin", |s| {
            s.use_middleware(&b, vec![]);
        });

        let mut slice = MiddlewareStack::new();
        slice.use_middleware(&c, vec![]);
        stack.update(&slice.rebased("/admin"));

        assert_eq!(names(&stack, "/admin"), vec!["a", "b", "c"]);
        assert_eq!(names(&stack, "/admin/"), vec!["a", "b", "c"]);
        assert_eq!(stack.iter().count(), 1);

        let chain = stack.to_dispatch_chain(echo_trace()).unwrap();
        assert_eq!(body(chain(request("/admin/users"))), "a,b,c");
    }

    #[test]
    fn test_rebased_moves_root_under_mount() {
        let (a, b) = (marker("a"), marker("b"));
        let mut slice = MiddlewareStack::new();
        slice.use_middleware(&a, vec![]);
        slice.with("/reports", |s| {
            s.use_middleware(&b, vec![]);
        });

        let rebased = slice.rebased("/admin");
        assert_eq!(names(&rebased, "/admin"), vec!["a"]);
        assert_eq!(names(&rebased, "/admin/reports"), vec!["b"]);
        assert!(rebased.entries(ROOT_PREFIX).is_empty());

        let at_root = slice.rebased("/");
        assert_eq!(names(&at_root, ROOT_PREFIX), vec!["a"]);
    }

    #[test]
    fn test_is_empty() {
        let mut stack = MiddlewareStack::new();
        assert!(stack.is_empty());
        stack.use_middleware(&marker("a"), vec![]);
        assert!(!stack.is_empty());
    }

    #[test]
    fn test_chain_order_first_is_outermost() {
        let mut stack = MiddlewareStack::new();
        stack
            .use_middleware(&tracer("outer"), vec![])
            .use_middleware(&tracer("inner"), vec![]);

        let chain = stack.to_dispatch_chain(echo_trace()).unwrap();
        assert_eq!(body(chain(request("/"))), "outer,inner");
    }

    #[test]
    fn test_prefixed_middleware_only_applies_beneath_prefix() {
        let mut stack = MiddlewareStack::new();
        stack.use_middleware(&tracer("root"), vec![]);
        stack.with("/admin", |s| {
            s.use_middleware(&tracer("admin"), vec![]);
        });

        let chain = stack.to_dispatch_chain(echo_trace()).unwrap();
        assert_eq!(body(chain(request("/admin/users"))), "root,admin");
        assert_eq!(body(chain(request("/blog"))), "root");
        assert_eq!(body(chain(request("/administrator"))), "root");
    }

    #[test]
    fn test_empty_stack_is_final_handler() {
        let stack = MiddlewareStack::new();
        let chain = stack.to_dispatch_chain(echo_trace()).unwrap();
        assert_eq!(body(chain(request("/anything"))), "");
    }

    #[test]
    fn test_block_options_reach_build() {
        struct Tag;

        impl Middleware for Tag {
            fn name(&self) -> &str {
                "tag"
            }

            fn build(&self, _next: Handler, args: &[Value], options: &Options) -> Result<Handler, MiddlewareError> {
                let tag = options
                    .get("tag")
                    .and_then(Value::as_str)
                    .ok_or_else(|| MiddlewareError::invalid_arguments("tag", "missing tag option"))?
                    .to_string();
                let count = args.len();
                Ok(chain::handler(move |_| Reply::Text(StatusCode::OK, format!("{}:{}", tag, count))))
            }
        }

        let tag = MiddlewareRef::new(Tag);
        let mut stack = MiddlewareStack::new();
        stack.insert(
            MiddlewareEntry::new(tag.clone(), vec![json!(1), json!(2)])
                .with_block(ConfigBlock::new(|options| {
                    options.insert("tag".to_string(), json!("hello"));
                })),
            Placement::Append,
        );
        let chain = stack.to_dispatch_chain(echo_trace()).unwrap();
        assert_eq!(body(chain(request("/"))), "hello:2");

        let mut unconfigured = MiddlewareStack::new();
        unconfigured.use_middleware(&tag, vec![]);
        assert!(matches!(
            unconfigured.to_dispatch_chain(echo_trace()),
            Err(MiddlewareError::InvalidArguments { .. })
        ));
    }
}
