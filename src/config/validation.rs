//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (routes reference actions of the slice
//!   that owns their full path, middleware names exist in the registry)
//! - Validate value ranges (timeouts > 0, mount paths absolute)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use axum::http::Method;
use thiserror::Error;

use crate::config::schema::{AppConfig, MiddlewareConfig};
use crate::routing::trie::PathTrie;
use crate::slice::registry::{join_paths, normalize_mount};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("server.request_timeout_secs must be greater than 0")]
    ZeroTimeout,

    #[error("server.max_body_bytes must be greater than 0")]
    ZeroBodyLimit,

    #[error("Duplicate slice name: {0}")]
    DuplicateSlice(String),

    #[error("Slice {slice} mount path {at:?} must start with '/'")]
    InvalidMount { slice: String, at: String },

    #[error("Slice {slice} route path {path:?} must start with '/'")]
    InvalidRoutePath { slice: String, path: String },

    #[error("Slice {slice} route {path} has unknown method {method:?}")]
    UnknownMethod {
        slice: String,
        path: String,
        method: String,
    },

    #[error("Slice {slice} route {path} has an empty endpoint key")]
    EmptyEndpoint { slice: String, path: String },

    #[error("Slice {slice} route {path} is owned by slice {owner}, which does not declare action {key:?}")]
    UndeclaredAction {
        slice: String,
        owner: String,
        path: String,
        key: String,
    },

    #[error("Slice {slice} route {path} is not owned by any slice mount")]
    MissingSlice { slice: String, path: String },

    #[error("Slice {slice} declares action {key:?} twice")]
    DuplicateAction { slice: String, key: String },

    #[error("Slice {slice} action {key:?} has invalid status {status}")]
    InvalidStatus { slice: String, key: String, status: u16 },

    #[error("Unknown middleware {name:?} in {scope}")]
    UnknownMiddleware { scope: String, name: String },
}

/// Validate `config`, checking middleware names against `known_middleware`.
pub fn validate_config(config: &AppConfig, known_middleware: &[&str]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.server.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    check_middleware(&config.middleware, "application", known_middleware, &mut errors);

    // Route keys resolve against the slice owning the joined path, which
    // may be a deeper mount than the declaring slice.
    let mut mounts = PathTrie::new();
    for (index, slice) in config.slices.iter().enumerate() {
        mounts.add(&normalize_mount(&slice.at), index);
    }
    let declared: Vec<HashSet<&str>> = config
        .slices
        .iter()
        .map(|slice| slice.actions.iter().map(|a| a.key.as_str()).collect())
        .collect();

    let mut slice_names = HashSet::new();
    for slice in &config.slices {
        if !slice_names.insert(slice.name.as_str()) {
            errors.push(ValidationError::DuplicateSlice(slice.name.clone()));
        }
        if !slice.at.starts_with('/') {
            errors.push(ValidationError::InvalidMount {
                slice: slice.name.clone(),
                at: slice.at.clone(),
            });
        }

        let scope = format!("slice {}", slice.name);
        check_middleware(&slice.middleware, &scope, known_middleware, &mut errors);

        let mut seen = HashSet::new();
        for action in &slice.actions {
            if !seen.insert(action.key.as_str()) {
                errors.push(ValidationError::DuplicateAction {
                    slice: slice.name.clone(),
                    key: action.key.clone(),
                });
            }
            if !(100..=999).contains(&action.status) {
                errors.push(ValidationError::InvalidStatus {
                    slice: slice.name.clone(),
                    key: action.key.clone(),
                    status: action.status,
                });
            }
        }

        for route in &slice.routes {
            if !route.path.starts_with('/') {
                errors.push(ValidationError::InvalidRoutePath {
                    slice: slice.name.clone(),
                    path: route.path.clone(),
                });
            }
            if parse_method(&route.method).is_none() {
                errors.push(ValidationError::UnknownMethod {
                    slice: slice.name.clone(),
                    path: route.path.clone(),
                    method: route.method.clone(),
                });
            }
            if route.to.trim().is_empty() {
                errors.push(ValidationError::EmptyEndpoint {
                    slice: slice.name.clone(),
                    path: route.path.clone(),
                });
            } else {
                let path = join_paths(&normalize_mount(&slice.at), &route.path);
                match mounts.find(&path) {
                    Some(&owner) if declared[owner].contains(route.to.as_str()) => {}
                    Some(&owner) => errors.push(ValidationError::UndeclaredAction {
                        slice: slice.name.clone(),
                        owner: config.slices[owner].name.clone(),
                        path,
                        key: route.to.clone(),
                    }),
                    None => errors.push(ValidationError::MissingSlice {
                        slice: slice.name.clone(),
                        path,
                    }),
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Standard HTTP method from its (case-insensitive) name.
pub fn parse_method(method: &str) -> Option<Method> {
    match method.to_ascii_uppercase().as_str() {
        "GET" => Some(Method::GET),
        "HEAD" => Some(Method::HEAD),
        "POST" => Some(Method::POST),
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        "OPTIONS" => Some(Method::OPTIONS),
        _ => None,
    }
}

fn check_middleware(
    middleware: &[MiddlewareConfig],
    scope: &str,
    known: &[&str],
    errors: &mut Vec<ValidationError>,
) {
    for entry in middleware {
        if !known.contains(&entry.name.as_str()) {
            errors.push(ValidationError::UnknownMiddleware {
                scope: scope.to_string(),
                name: entry.name.clone(),
            });
        }
    }
}
