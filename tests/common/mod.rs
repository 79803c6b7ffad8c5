//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderValue, Method};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use slice_router::http::{Reply, Request, RequestExt};
use slice_router::routing::{Component, Router};
use slice_router::slice::{ComponentRegistry, Slice};
use slice_router::MiddlewareRef;

/// Build a buffered request.
pub fn request(method: Method, path: &str) -> Request {
    axum::http::Request::builder()
        .method(method)
        .uri(path)
        .body(Bytes::new())
        .unwrap()
}

/// Component replying with fixed text.
pub fn text(body: &'static str) -> Component {
    Component::callable(move |_req: Request| Reply::from(body))
}

/// Component echoing the named route parameter.
pub fn echo_param(name: &'static str) -> Component {
    Component::callable(move |req: Request| {
        let value = req.route_params().get(name).unwrap_or("").to_string();
        Reply::from(value)
    })
}

/// Middleware appending `name` to the `x-trace` request header.
pub fn tracer(name: &'static str) -> MiddlewareRef {
    MiddlewareRef::from_fn(name, move |mut request: Request, next| {
        let trace = match request.headers().get("x-trace").and_then(|v| v.to_str().ok()) {
            Some(existing) => format!("{},{}", existing, name),
            None => name.to_string(),
        };
        request
            .headers_mut()
            .insert("x-trace", HeaderValue::from_str(&trace).unwrap());
        next(request)
    })
}

/// Component replying with the `x-trace` header it received.
pub fn echo_trace() -> Component {
    Component::callable(|req: Request| {
        let trace = req
            .headers()
            .get("x-trace")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        Reply::from(trace)
    })
}

/// `main` at `/` and `admin` at `/admin`, both answering `users.index`.
pub fn two_slice_router() -> Router {
    let mut main = ComponentRegistry::new();
    main.register("actions.home", text("home"))
        .register("actions.users.index", text("main users"));
    let mut main = Slice::new("main", "/", main);
    main.get("/", "home").get("/users", "users.index");

    let mut admin = ComponentRegistry::new();
    admin
        .register("actions.users.index", text("admin users"))
        .register("actions.users.show", echo_param("id"));
    let mut admin = Slice::new("admin", "/admin", admin);
    admin
        .get("/users", "users.index")
        .get("/users/{id}", "users.show");

    let mut builder = Router::builder();
    builder.slice(main).unwrap().slice(admin).unwrap();
    builder.build().unwrap()
}

/// Send a raw HTTP/1.1 request and return the full response text.
pub async fn raw_request(addr: SocketAddr, method: &str, path: &str) -> String {
    let mut stream = tokio::time::timeout(Duration::from_secs(2), TcpStream::connect(addr))
        .await
        .expect("connect timed out")
        .expect("connect failed");

    let request = format!(
        "{} {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        method, path, addr
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    tokio::time::timeout(Duration::from_secs(2), stream.read_to_end(&mut response))
        .await
        .expect("read timed out")
        .unwrap();
    String::from_utf8_lossy(&response).into_owned()
}
