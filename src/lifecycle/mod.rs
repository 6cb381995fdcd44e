//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → Routes → Plugins → Bind listener → Start event
//!
//! Shutdown (shutdown.rs):
//!     Trigger → Stop accepting → Drain connections → Stop event
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then routes and plugins, then listener
//! - Lifecycle events fire at most once per server (events.rs)

pub mod events;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use events::{ServerEvent, ServerEvents};
pub use shutdown::Shutdown;
pub use startup::{build_server, serve};
