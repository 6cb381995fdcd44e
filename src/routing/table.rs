//! The server's route table.
//!
//! # Responsibilities
//! - Store registered routes in registration order
//! - Hand out immutable snapshots to readers
//! - Reject a second route for the same method and path
//!
//! # Design Decisions
//! - Copy-on-write via `ArcSwap`: writers publish a new vector, readers
//!   keep whatever snapshot they loaded
//! - Registration order is table order; nothing here sorts

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::routing::route::Route;

/// Anything that can produce the current set of routes.
pub trait RouteSource: Send + Sync {
    /// A snapshot of the routes, in table order.
    fn routes(&self) -> Arc<Vec<Route>>;
}

/// Shared handle to the live route table.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Arc<ArcSwap<Vec<Route>>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self {
            routes: Arc::new(ArcSwap::from_pointee(Vec::new())),
        }
    }

    /// Append a route. Returns false if it conflicts with a registered one.
    pub fn insert(&self, route: Route) -> bool {
        let mut inserted = false;
        // the check runs inside rcu, so a retried update sees the writer
        // that beat it
        self.routes.rcu(|current| {
            inserted = !conflicts(current, &route);
            let mut next = Vec::clone(current);
            if inserted {
                next.push(route.clone());
            }
            next
        });
        inserted
    }

    /// True if a registered route serves the same path for an overlapping
    /// method. `*` overlaps every method.
    pub fn contains(&self, route: &Route) -> bool {
        conflicts(&self.routes.load(), route)
    }

    pub fn snapshot(&self) -> Arc<Vec<Route>> {
        self.routes.load_full()
    }

    pub fn len(&self) -> usize {
        self.routes.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn conflicts(routes: &[Route], route: &Route) -> bool {
    routes.iter().any(|r| {
        r.path == route.path
            && (r.method == route.method || r.is_any_method() || route.is_any_method())
    })
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteSource for RouteTable {
    fn routes(&self) -> Arc<Vec<Route>> {
        self.snapshot()
    }
}

impl RouteSource for Vec<Route> {
    fn routes(&self) -> Arc<Vec<Route>> {
        Arc::new(self.clone())
    }
}
