//! Server lifecycle events.
//!
//! # Responsibilities
//! - Let plugins subscribe to `Start` and `Stop`
//! - Fire each event at most once per server
//!
//! # Design Decisions
//! - Handlers are plain synchronous callbacks run on the emitting task
//! - The handler list is copied before dispatch, so a handler may
//!   subscribe further handlers without deadlocking

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

type Handler = Arc<dyn Fn() + Send + Sync>;

/// Points in the server lifecycle plugins can hook into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerEvent {
    /// Listener bound, about to serve.
    Start,
    /// Serving finished after shutdown.
    Stop,
}

/// One-shot event dispatcher shared between the server and its plugins.
#[derive(Default)]
pub struct ServerEvents {
    handlers: Mutex<Vec<(ServerEvent, Handler)>>,
    fired: Mutex<HashSet<ServerEvent>>,
}

impl ServerEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to `event`.
    pub fn on<F>(&self, event: ServerEvent, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((event, Arc::new(handler)));
    }

    pub fn on_start<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on(ServerEvent::Start, handler);
    }

    /// Run the handlers of `event`. Returns how many ran; zero if the event
    /// already fired.
    pub fn emit(&self, event: ServerEvent) -> usize {
        if !self
            .fired
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(event)
        {
            tracing::debug!(?event, "Lifecycle event already emitted");
            return 0;
        }

        let handlers: Vec<Handler> = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(e, _)| *e == event)
            .map(|(_, h)| h.clone())
            .collect();

        tracing::debug!(?event, handlers = handlers.len(), "Emitting lifecycle event");
        for handler in &handlers {
            handler();
        }
        handlers.len()
    }

    pub fn has_fired(&self, event: ServerEvent) -> bool {
        self.fired
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&event)
    }
}

impl std::fmt::Debug for ServerEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self
            .handlers
            .lock()
            .map(|h| h.len())
            .unwrap_or_default();
        f.debug_struct("ServerEvents")
            .field("handlers", &handlers)
            .finish_non_exhaustive()
    }
}
