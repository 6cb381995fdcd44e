//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Own the route table and the axum handler behind each route
//! - Register plugins and keep what they expose
//! - Wire up middleware (tracing, timeout, request ID)
//! - Fire lifecycle events around serving
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::{
    handler::Handler,
    http::{HeaderName, Method, StatusCode},
    routing::{any, on, MethodFilter, MethodRouter},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::lifecycle::events::{ServerEvent, ServerEvents};
use crate::plugin::{ExposedValues, Plugin, PluginError, PluginMetadata, PluginRealm};
use crate::routing::{PathError, PathSet, Route, RouteTable};

/// Header carrying the request correlation id.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Errors raised while assembling or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("route {method} {path} conflicts with a registered route")]
    DuplicateRoute { method: String, path: String },

    #[error("invalid route path {0:?}")]
    InvalidPath(String),

    #[error("method {0} cannot be routed")]
    UnsupportedMethod(String),

    #[error("invalid status code {status} for {path}")]
    InvalidStatus { path: String, status: u16 },

    #[error("plugin {0} is already registered")]
    RegistrationConflict(String),

    #[error("plugin {plugin} failed to register: {source}")]
    Plugin {
        plugin: String,
        #[source]
        source: PluginError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The host server: route table, handlers, plugins and lifecycle.
pub struct HttpServer {
    config: ServerConfig,
    table: RouteTable,
    paths: PathSet,
    handlers: Vec<(String, MethodRouter)>,
    events: Arc<ServerEvents>,
    exposed: ExposedValues,
    plugins: Vec<PluginMetadata>,
}

impl HttpServer {
    /// Create an empty server with the given configuration. Routes listed
    /// in the configuration are not added; see [`HttpServer::from_config`].
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            table: RouteTable::new(),
            paths: PathSet::new(),
            handlers: Vec::new(),
            events: Arc::new(ServerEvents::new()),
            exposed: ExposedValues::default(),
            plugins: Vec::new(),
        }
    }

    /// Create a server serving every configured route with its static
    /// status and body.
    pub fn from_config(config: ServerConfig) -> Result<Self, ServerError> {
        let routes = config.routes.clone();
        let mut server = Self::new(config);

        for route_config in routes {
            let route = route_config
                .route()
                .ok_or_else(|| ServerError::UnsupportedMethod(route_config.method.clone()))?;
            let status = StatusCode::from_u16(route_config.status).map_err(|_| {
                ServerError::InvalidStatus {
                    path: route_config.path.clone(),
                    status: route_config.status,
                }
            })?;
            let body = route_config.body;
            server.route(route, move || async move { (status, body) })?;
        }

        Ok(server)
    }

    /// Add a route to the table and serve it with `handler`.
    pub fn route<H, T>(&mut self, route: Route, handler: H) -> Result<(), ServerError>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        let method_router = if route.is_any_method() {
            any(handler)
        } else {
            on(method_filter(&route.method)?, handler)
        };

        let method = route.method.to_string();
        let path = route.path.clone();
        // a path the matcher refuses would panic in `router()`
        self.paths.insert(&path).map_err(|err| match err {
            PathError::Invalid { path, .. } => ServerError::InvalidPath(path),
            PathError::Conflict { path, .. } => ServerError::DuplicateRoute {
                method: method.clone(),
                path,
            },
        })?;
        if !self.table.insert(route) {
            return Err(ServerError::DuplicateRoute { method, path });
        }

        match self.handlers.iter().position(|(p, _)| *p == path) {
            Some(i) => {
                let (path, existing) = self.handlers.remove(i);
                self.handlers.insert(i, (path, existing.merge(method_router)));
            }
            None => self.handlers.push((path.clone(), method_router)),
        }

        tracing::debug!(method = %method, path = %path, "Route added");
        Ok(())
    }

    /// Register a plugin with its options.
    pub fn register<P: Plugin>(&mut self, plugin: P, options: P::Options) -> Result<(), ServerError> {
        let metadata = plugin.metadata();
        if !plugin.multiple() && self.plugins.iter().any(|p| p.name == metadata.name) {
            return Err(ServerError::RegistrationConflict(metadata.name));
        }

        let mut realm = PluginRealm::new(
            metadata.name.clone(),
            self.table.clone(),
            self.events.clone(),
            &mut self.exposed,
        );
        plugin
            .register(&mut realm, options)
            .map_err(|source| ServerError::Plugin {
                plugin: metadata.name.clone(),
                source,
            })?;

        tracing::info!(plugin = %metadata.name, version = %metadata.version, "Plugin registered");
        self.plugins.push(metadata);
        Ok(())
    }

    /// A value a plugin exposed, if it exists and has type `T`.
    pub fn exposed<T: std::any::Any + Send + Sync>(&self, plugin: &str, key: &str) -> Option<Arc<T>> {
        self.exposed.get(plugin, key)
    }

    pub fn plugins(&self) -> &[PluginMetadata] {
        &self.plugins
    }

    pub fn table(&self) -> RouteTable {
        self.table.clone()
    }

    pub fn events(&self) -> Arc<ServerEvents> {
        self.events.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn router(&self) -> Router {
        let router = self
            .handlers
            .iter()
            .fold(Router::new(), |router, (path, handler)| {
                router.route(path, handler.clone())
            });

        router
            .layer(TimeoutLayer::new(Duration::from_secs(self.config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until `shutdown` fires.
    ///
    /// `Start` is emitted once the listener is bound, before the first
    /// connection is accepted; `Stop` once serving has finished.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        let app = self.router();

        tracing::info!(
            address = %addr,
            routes = self.table.len(),
            plugins = self.plugins.len(),
            "HTTP server starting"
        );
        self.events.emit(ServerEvent::Start);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        self.events.emit(ServerEvent::Stop);
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

impl Default for HttpServer {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

fn method_filter(method: &Method) -> Result<MethodFilter, ServerError> {
    MethodFilter::try_from(method.clone())
        .map_err(|_| ServerError::UnsupportedMethod(method.to_string()))
}
