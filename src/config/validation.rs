//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, status codes, addresses)
//! - Detect conflicting routes
//! - Check listing columns and colors against what the renderer supports
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::StatusCode;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::ServerConfig;
use crate::listing::{ColumnRegistry, SortOrder};
use crate::routing::{parse_method, PathError, PathSet};
use crate::style::StyleError;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address is not a socket address: {0:?}")]
    BindAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("observability.log_level is not a valid filter: {0:?}")]
    LogLevel(String),

    #[error("routes[{index}]: invalid method {method:?}")]
    Method { index: usize, method: String },

    #[error("routes[{index}]: invalid path template {path:?}")]
    Path { index: usize, path: String },

    #[error("routes[{index}]: {path:?} overlaps the earlier path {with:?}")]
    PathConflict {
        index: usize,
        path: String,
        with: String,
    },

    #[error("routes[{index}]: invalid status code {status}")]
    Status { index: usize, status: u16 },

    #[error("routes[{index}]: {method} {path} conflicts with an earlier route")]
    DuplicateRoute {
        index: usize,
        method: String,
        path: String,
    },

    #[error("listing.columns: unknown column {0:?}")]
    UnknownColumn(String),

    #[error("listing.columns: {0:?} listed more than once")]
    DuplicateColumn(String),

    #[error("listing.sort: unknown column {0:?}")]
    SortColumn(String),

    #[error("listing.colors.{role}: {source}")]
    Color {
        role: &'static str,
        #[source]
        source: StyleError,
    },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    validate_routes(config, &mut errors);
    validate_listing(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_routes(config: &ServerConfig, errors: &mut Vec<ValidationError>) {
    // (method, path) pairs seen so far; "*" conflicts with every method
    let mut seen: Vec<(String, &str)> = Vec::new();
    let mut paths = PathSet::new();

    for (index, route) in config.routes.iter().enumerate() {
        let method = parse_method(&route.method);
        if method.is_none() {
            errors.push(ValidationError::Method {
                index,
                method: route.method.clone(),
            });
        }
        match paths.insert(&route.path) {
            Ok(()) => {}
            Err(PathError::Invalid { path, .. }) => {
                errors.push(ValidationError::Path { index, path });
            }
            Err(PathError::Conflict { path, with }) => {
                errors.push(ValidationError::PathConflict { index, path, with });
            }
        }
        if StatusCode::from_u16(route.status).is_err() {
            errors.push(ValidationError::Status {
                index,
                status: route.status,
            });
        }

        let Some(method) = method else { continue };
        let method = method.as_str().to_string();
        let conflict = seen
            .iter()
            .any(|(m, p)| *p == route.path && (*m == method || m == "*" || method == "*"));
        if conflict {
            errors.push(ValidationError::DuplicateRoute {
                index,
                method,
                path: route.path.clone(),
            });
        } else {
            seen.push((method, route.path.as_str()));
        }
    }
}

fn validate_listing(config: &ServerConfig, errors: &mut Vec<ValidationError>) {
    let listing = &config.listing;
    let registry = ColumnRegistry::builtin();

    if let Some(columns) = &listing.columns {
        let mut seen = HashSet::new();
        for key in columns {
            if !registry.contains(key) {
                errors.push(ValidationError::UnknownColumn(key.clone()));
            } else if !seen.insert(key.as_str()) {
                errors.push(ValidationError::DuplicateColumn(key.clone()));
            }
        }
    }

    if let Some(sort) = &listing.sort {
        let order = SortOrder::from(sort.as_str());
        if !registry.contains(&order.column) {
            errors.push(ValidationError::SortColumn(order.column));
        }
    }

    for (role, source) in listing.resolved_theme().check() {
        errors.push(ValidationError::Color { role, source });
    }
}
