//! The route listing plugin.
//!
//! Builds a [`RouteLister`] over the server's route table at registration,
//! exposes it as `list_routes` and prints the table once when the server
//! starts.

use std::sync::Arc;

use crate::config::ListingConfig;
use crate::http::HttpServer;
use crate::listing::{ColumnRegistry, OutputSink, RouteLister, SortOrder};
use crate::plugin::{Plugin, PluginError, PluginMetadata, PluginRealm};
use crate::style::Theme;

pub const PLUGIN_NAME: &str = "routes-list";
pub const LIST_ROUTES: &str = "list_routes";

/// Registration options. Everything unset falls back to the lister's
/// defaults: stdout, all columns, default theme, table order.
#[derive(Default)]
pub struct ListOptions {
    out: Option<OutputSink>,
    columns: Option<Vec<String>>,
    theme: Option<Theme>,
    sort: Option<SortOrder>,
    registry: Option<ColumnRegistry>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ListingConfig) -> Self {
        Self {
            out: None,
            columns: config.columns.clone(),
            theme: Some(config.resolved_theme()),
            sort: config.sort.as_deref().map(SortOrder::from),
            registry: None,
        }
    }

    pub fn out(mut self, out: OutputSink) -> Self {
        self.out = Some(out);
        self
    }

    pub fn columns<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn sort(mut self, order: impl Into<SortOrder>) -> Self {
        self.sort = Some(order.into());
        self
    }

    /// Column set to select from, for hosts that add their own columns.
    pub fn registry(mut self, registry: ColumnRegistry) -> Self {
        self.registry = Some(registry);
        self
    }
}

/// Prints the route table when the server starts.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoutesList;

impl RoutesList {
    /// The lister a registered instance exposed on `server`.
    pub fn lister(server: &HttpServer) -> Option<Arc<RouteLister>> {
        server.exposed::<RouteLister>(PLUGIN_NAME, LIST_ROUTES)
    }
}

impl Plugin for RoutesList {
    type Options = ListOptions;

    fn metadata(&self) -> PluginMetadata {
        PluginMetadata {
            name: PLUGIN_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn register(&self, realm: &mut PluginRealm<'_>, options: ListOptions) -> Result<(), PluginError> {
        let mut builder = RouteLister::builder(Arc::new(realm.table()));
        if let Some(registry) = options.registry {
            builder = builder.registry(registry);
        }
        if let Some(columns) = options.columns {
            builder = builder.columns(columns);
        }
        if let Some(theme) = options.theme {
            builder = builder.theme(theme);
        }
        if let Some(sort) = options.sort {
            builder = builder.sort(sort);
        }
        if let Some(out) = options.out {
            builder = builder.out(out);
        }
        let lister = Arc::new(builder.build()?);

        tracing::debug!(lister = ?lister, "Route lister built");
        realm.expose(LIST_ROUTES, lister.clone());
        realm.on_start(move || {
            if let Err(err) = lister.list_routes() {
                tracing::error!(error = %err, "Failed to list routes");
            }
        });
        Ok(())
    }
}
