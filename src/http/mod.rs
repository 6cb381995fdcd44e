//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! ServerConfig.routes / HttpServer::route
//!     → RouteTable (descriptor, listed by plugins)
//!     → MethodRouter per path (axum handler)
//!     → server.rs (Router + middleware)
//!     → TCP listener
//! ```
//!
//! # Design Decisions
//! - The route table and the axum router are fed from the same call, so
//!   what is listed is what is served
//! - A path registered for several methods shares one `MethodRouter`

pub mod server;

pub use server::{HttpServer, ServerError, X_REQUEST_ID};
