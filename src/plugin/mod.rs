//! Plugin subsystem.
//!
//! # Data Flow
//! ```text
//! HttpServer::register(plugin, options)
//!     → multiple() check against already registered plugins
//!     → Plugin::register(realm, options)
//!         → realm.table()    (live route table handle)
//!         → realm.on_start() (lifecycle subscription)
//!         → realm.expose()   (publish values by key)
//!     → HttpServer::exposed::<T>(plugin, key)
//! ```
//!
//! # Design Decisions
//! - Registration is synchronous and runs before the server is started
//! - Exposed values are type-erased and recovered by downcast
//! - A realm is scoped to one plugin; it cannot see other plugins' values

pub mod routes_list;

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::lifecycle::events::ServerEvents;
use crate::listing::ListError;
use crate::routing::RouteTable;

pub use routes_list::{ListOptions, RoutesList, LIST_ROUTES, PLUGIN_NAME};

/// Errors a plugin can return from `register`.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error(transparent)]
    Listing(#[from] ListError),
}

/// Name and version a plugin registers under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginMetadata {
    pub name: String,
    pub version: String,
}

/// A capability that attaches itself to an [`HttpServer`](crate::http::HttpServer).
pub trait Plugin: Send + Sync {
    type Options;

    fn metadata(&self) -> PluginMetadata;

    /// Whether the plugin may be registered more than once on one server.
    fn multiple(&self) -> bool {
        false
    }

    fn register(&self, realm: &mut PluginRealm<'_>, options: Self::Options) -> Result<(), PluginError>;
}

type Exposed = Arc<dyn Any + Send + Sync>;

/// Values published by plugins, keyed by plugin name and key.
#[derive(Default)]
pub struct ExposedValues {
    values: HashMap<(String, String), Exposed>,
}

impl ExposedValues {
    pub fn get<T: Any + Send + Sync>(&self, plugin: &str, key: &str) -> Option<Arc<T>> {
        let value = self.values.get(&(plugin.to_string(), key.to_string()))?;
        Arc::clone(value).downcast::<T>().ok()
    }

    fn insert(&mut self, plugin: &str, key: &str, value: Exposed) {
        self.values.insert((plugin.to_string(), key.to_string()), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for ExposedValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("ExposedValues").field("keys", &keys).finish()
    }
}

/// What a plugin sees of the server while it registers.
pub struct PluginRealm<'a> {
    plugin: String,
    table: RouteTable,
    events: Arc<ServerEvents>,
    exposed: &'a mut ExposedValues,
}

impl<'a> PluginRealm<'a> {
    pub(crate) fn new(
        plugin: String,
        table: RouteTable,
        events: Arc<ServerEvents>,
        exposed: &'a mut ExposedValues,
    ) -> Self {
        Self {
            plugin,
            table,
            events,
            exposed,
        }
    }

    /// Name of the plugin being registered.
    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    /// Handle to the server's live route table.
    pub fn table(&self) -> RouteTable {
        self.table.clone()
    }

    pub fn events(&self) -> Arc<ServerEvents> {
        self.events.clone()
    }

    /// Run `handler` once when the server starts.
    pub fn on_start<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.events.on_start(handler);
    }

    /// Publish `value` under this plugin's name. A later call with the same
    /// key replaces the value.
    pub fn expose<T: Any + Send + Sync>(&mut self, key: &str, value: Arc<T>) {
        tracing::debug!(plugin = %self.plugin, key, "Value exposed");
        self.exposed.insert(&self.plugin, key, value);
    }
}
