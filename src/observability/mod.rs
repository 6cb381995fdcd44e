//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → TraceLayer spans per HTTP request (request id attached)
//!
//! Consumers:
//!     → logging.rs (fmt layer on stderr, EnvFilter)
//! ```

pub mod logging;
