//! Route listing subsystem.
//!
//! # Data Flow
//! ```text
//! RouteSource::routes() (snapshot)
//!     → engine.rs (order routes, one row per route)
//!     → columns.rs (extract → render with Theme, per active column)
//!     → table.rs (align rows into one block)
//!     → OutputSink (single write)
//! ```
//!
//! # Design Decisions
//! - Columns are data, not trait objects: key, header and three functions
//! - Cell values are a closed enum (scalar, group, groups)
//! - Sort keys exist per column; the listing only uses them when asked

pub mod columns;
pub mod engine;
pub mod table;
pub mod value;

use thiserror::Error;

use crate::style::StyleError;

pub use columns::{Column, ColumnRegistry};
pub use engine::{stdout_sink, writer_sink, OutputSink, RenderedRow, RouteLister, RouteListerBuilder, SortOrder};
pub use table::{AlignedTable, TableRenderer};
pub use value::{SortKey, Value};

/// Errors raised while building or running a listing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    /// A cell could not be colorized.
    #[error(transparent)]
    Style(#[from] StyleError),

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("column selected more than once: {0}")]
    DuplicateColumn(String),
}
