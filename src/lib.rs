//! Route table listing for an axum host server.
//!
//! A server built from [`config::ServerConfig`] keeps a [`routing::RouteTable`];
//! the [`plugin::RoutesList`] plugin renders it through [`listing::RouteLister`]
//! with the colors of a [`style::Theme`] once the server has started.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod listing;
pub mod observability;
pub mod plugin;
pub mod routing;
pub mod style;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use listing::RouteLister;
pub use plugin::RoutesList;
