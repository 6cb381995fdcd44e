//! Terminal styling subsystem.
//!
//! # Data Flow
//! ```text
//! Theme (role → ColorSpec)
//!     → color.rs (resolve spec into a Painter)
//!     → Painter::paint(cell text)
//!     → colorized cell text handed to the table renderer
//! ```
//!
//! # Design Decisions
//! - Themes are plain data, resolution happens per cell
//! - Unknown color names fail at render time, not at theme construction
//! - Painting an empty string never emits escape codes

pub mod color;
pub mod theme;

use thiserror::Error;

pub use color::{resolve, ColorSpec, Painter};
pub use theme::{Theme, ThemeOverrides, ThemePreset};

/// Errors raised while turning a color specification into a painter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    /// The keyword is not a color the styling backend knows.
    #[error("unknown color name: {0}")]
    UnknownColorName(String),

    /// A `#`-prefixed literal that is not 3 or 6 hex digits.
    #[error("invalid hex color: {0}")]
    InvalidHexColor(String),
}
