//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route registration (config file or HttpServer::route):
//!     Route { method, path, settings }
//!     → table.rs (append, reject duplicate method+path)
//!     → published as a new immutable snapshot
//!
//! Readers (listing engine, router builder):
//!     RouteSource::routes() → Arc<Vec<Route>>
//! ```
//!
//! # Design Decisions
//! - Routes are descriptors only; request handling lives in the HTTP layer
//! - Readers always see a consistent snapshot, never a half-updated table
//! - Table order is registration order
//! - Path templates are checked with axum's matcher (paths.rs) before
//!   they reach a `Router`

pub mod paths;
pub mod route;
pub mod table;

pub use paths::{PathError, PathSet};
pub use route::{parse_method, AccessRule, AuthMode, AuthSettings, Route, RouteSettings, ScopeRule};
pub use table::{RouteSource, RouteTable};
