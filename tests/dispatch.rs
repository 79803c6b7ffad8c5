//! Router-level dispatch scenarios, no network involved.

use axum::http::{header, Method, StatusCode};
use serde_json::json;

use slice_router::http::{Reply, Request};
use slice_router::middleware::{ConfigBlock, MiddlewareEntry, Placement};
use slice_router::routing::{BuildError, Component, EndpointClass, EndpointSpec, Router, RoutingError};
use slice_router::slice::{ComponentRegistry, Slice};
use slice_router::MiddlewareRegistry;

mod common;

use common::{echo_trace, request, text, tracer, two_slice_router};

#[test]
fn test_same_key_binds_per_slice() {
    let router = two_slice_router();

    let admin = router.dispatch(request(Method::GET, "/admin/users"));
    assert_eq!(admin.body().as_ref(), b"admin users");

    let main = router.dispatch(request(Method::GET, "/users"));
    assert_eq!(main.body().as_ref(), b"main users");

    let home = router.dispatch(request(Method::GET, "/"));
    assert_eq!(home.body().as_ref(), b"home");
}

#[test]
fn test_route_params_reach_endpoint() {
    let router = two_slice_router();
    let response = router.dispatch(request(Method::GET, "/admin/users/42"));
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body().as_ref(), b"42");
}

#[test]
fn test_head_served_by_get_route() {
    let router = two_slice_router();
    let response = router.dispatch(request(Method::HEAD, "/admin/users"));
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn test_unmatched_requests() {
    let router = two_slice_router();

    let missing = router.dispatch(request(Method::GET, "/admin/reports"));
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(missing.context().path, "/admin/reports");

    let wrong_method = router.dispatch(request(Method::POST, "/users"));
    assert_eq!(wrong_method.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(wrong_method.headers()[header::ALLOW], "GET");
}

#[test]
fn test_middleware_order_and_scoping() {
    let mut container = ComponentRegistry::new();
    container.register("actions.trace", echo_trace());
    let mut admin = Slice::new("admin", "/admin", container);
    admin.get("/trace", "trace");
    admin.middleware_mut().use_middleware(&tracer("admin"), vec![]);

    let mut main = ComponentRegistry::new();
    main.register("actions.trace", echo_trace());
    let mut main = Slice::new("main", "/", main);
    main.get("/trace", "trace");

    let mut builder = Router::builder();
    let outer = tracer("outer");
    let auth = tracer("auth");
    builder
        .middleware_mut()
        .use_middleware(&outer, vec![])
        .use_before(&auth, vec![], &outer);
    builder.slice(main).unwrap().slice(admin).unwrap();
    let router = builder.build().unwrap();

    let admin = router.dispatch(request(Method::GET, "/admin/trace"));
    assert_eq!(admin.body().as_ref(), b"auth,outer,admin");

    let main = router.dispatch(request(Method::GET, "/trace"));
    assert_eq!(main.body().as_ref(), b"auth,outer");
}

#[test]
fn test_nested_slice_prefix_middleware() {
    let mut container = ComponentRegistry::new();
    container
        .register("actions.trace", echo_trace())
        .register("actions.report", echo_trace());
    let mut admin = Slice::new("admin", "/admin", container);
    admin.get("/trace", "trace").get("/reports/q1", "report");

    let reports = tracer("reports");
    admin.middleware_mut().with("/reports", |stack| {
        stack.use_middleware(&reports, vec![]);
    });

    let mut builder = Router::builder();
    builder.slice(admin).unwrap();
    let router = builder.build().unwrap();

    let report = router.dispatch(request(Method::GET, "/admin/reports/q1"));
    assert_eq!(report.body().as_ref(), b"reports");

    let other = router.dispatch(request(Method::GET, "/admin/trace"));
    assert_eq!(other.body().as_ref(), b"");
}

#[test]
fn test_app_prefix_with_trailing_slash_merges_with_slice_mount() {
    let mut container = ComponentRegistry::new();
    container.register("actions.trace", echo_trace());
    let mut admin = Slice::new("admin", "/admin", container);
    admin.get("/trace", "trace");
    admin.middleware_mut().use_middleware(&tracer("slice"), vec![]);

    let app = tracer("app");
    let mut builder = Router::builder();
    builder.middleware_mut().with("/admin/", |stack| {
        stack.use_middleware(&app, vec![]);
    });
    builder.slice(admin).unwrap();
    let router = builder.build().unwrap();

    let response = router.dispatch(request(Method::GET, "/admin/trace"));
    assert_eq!(response.body().as_ref(), b"app,slice");
}

#[test]
fn test_deeper_mount_owns_its_subtree() {
    let mut admin = ComponentRegistry::new();
    admin.register("actions.settings", text("admin settings"));
    let mut admin = Slice::new("admin", "/admin", admin);
    admin.get("/settings", "settings");

    let mut reports = ComponentRegistry::new();
    reports.register("actions.q1", text("q1 report"));
    let mut reports = Slice::new("reports", "/admin/reports", reports);
    reports.get("/q1", "q1");

    let mut builder = Router::builder();
    builder.slice(admin).unwrap().slice(reports).unwrap();
    let router = builder.build().unwrap();

    assert_eq!(router.resolver().slice_name_for("/admin/reports/q1"), Some("reports"));
    assert_eq!(router.resolver().slice_name_for("/admin/settings"), Some("admin"));

    let q1 = router.dispatch(request(Method::GET, "/admin/reports/q1"));
    assert_eq!(q1.body().as_ref(), b"q1 report");
}

#[test]
fn test_class_and_instance_endpoints() {
    let mut builder = Router::builder();
    builder
        .get(
            "/health",
            EndpointClass::callable("Health", |_req: Request| Reply::from(StatusCode::NO_CONTENT)),
        )
        .get(
            "/status",
            EndpointClass::constructible("Status", || {
                Component::callable(|_req: Request| Reply::from(json!({ "status": "ok" })))
            }),
        )
        .get("/ping", EndpointSpec::instance(|_req: Request| Reply::from("pong")));
    let router = builder.build().unwrap();

    let health = router.dispatch(request(Method::GET, "/health"));
    assert_eq!(health.status(), StatusCode::NO_CONTENT);

    let status = router.dispatch(request(Method::GET, "/status"));
    assert_eq!(status.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(status.body().as_ref(), br#"{"status":"ok"}"#);

    let ping = router.dispatch(request(Method::GET, "/ping"));
    assert_eq!(ping.body().as_ref(), b"pong");
}

#[test]
fn test_non_callable_component_aborts_build() {
    let mut container = ComponentRegistry::new();
    container.register("actions.config", Component::opaque(String::from("settings")));
    let mut slice = Slice::new("main", "/", container);
    slice.get("/config", "config");

    let mut builder = Router::builder();
    builder.slice(slice).unwrap();
    let err = builder.build().unwrap_err();

    match err {
        BuildError::Routing(RoutingError::NotCallableEndpoint { endpoint }) => {
            assert_eq!(endpoint.downcast_ref::<String>().map(String::as_str), Some("settings"));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_duplicate_registrations_collapse() {
    let registry = MiddlewareRegistry::with_builtins();
    let headers = registry.get("set_headers").unwrap();
    let block = ConfigBlock::new(|options| {
        options.insert("x-extra".to_string(), json!("1"));
    });

    let mut builder = Router::builder();
    builder.get("/", EndpointSpec::instance(|_req: Request| Reply::from("ok")));
    let stack = builder.middleware_mut();
    stack.use_middleware(&headers, vec![json!({ "x-frame-options": "DENY" })]);
    stack.use_middleware(&headers, vec![json!({ "x-frame-options": "DENY" })]);
    let entry = MiddlewareEntry::new(headers.clone(), vec![]).with_block(block);
    stack.insert(entry.clone(), Placement::Append);
    stack.insert(entry, Placement::Append);
    assert_eq!(stack.entries("/").len(), 2);

    let router = builder.build().unwrap();
    let response = router.dispatch(request(Method::GET, "/"));
    assert_eq!(response.headers()["x-frame-options"], "DENY");
    assert_eq!(response.headers()["x-extra"], "1");
}
