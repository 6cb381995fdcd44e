//! Color specifications and their resolution into painters.
//!
//! # Responsibilities
//! - Model the four ways a theme role can name a color
//! - Resolve a specification into a `&str -> String` transform
//!
//! # Design Decisions
//! - Resolution is deterministic and cache-free (cheap enough per cell)
//! - Named colors go through `colored`'s own parser, so the accepted
//!   vocabulary is exactly what the backend can draw
//! - `gray`/`grey` are accepted as aliases for `bright black`

use std::fmt;
use std::sync::Arc;

use colored::{Color, Colorize};
use serde::Deserialize;

use crate::style::StyleError;

type PaintFn = dyn Fn(&str) -> String + Send + Sync;

/// A resolved string transform that applies terminal styling.
#[derive(Clone)]
pub struct Painter(Arc<PaintFn>);

impl Painter {
    /// Wrap an arbitrary styling function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// A painter that returns its input unchanged.
    pub fn identity() -> Self {
        Self::new(|text| text.to_string())
    }

    /// A painter that applies a foreground color.
    pub fn foreground(color: Color) -> Self {
        Self::new(move |text| text.color(color).to_string())
    }

    /// Apply the styling. Empty input stays empty.
    pub fn paint(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        (self.0)(text)
    }
}

impl fmt::Debug for Painter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Painter(..)")
    }
}

/// How a theme role names its color.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "String")]
pub enum ColorSpec {
    /// No styling at all.
    Default,
    /// `#rgb` or `#rrggbb` truecolor literal, kept verbatim until resolved.
    Hex(String),
    /// A keyword such as `blue` or `bright green`.
    Named(String),
    /// A pre-built transform, used as is.
    Style(Painter),
}

impl ColorSpec {
    /// Build a spec from a styling closure.
    pub fn style<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        ColorSpec::Style(Painter::new(f))
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ColorSpec::Default)
    }
}

impl From<&str> for ColorSpec {
    fn from(value: &str) -> Self {
        if value == "default" {
            ColorSpec::Default
        } else if value.starts_with('#') {
            ColorSpec::Hex(value.to_string())
        } else {
            ColorSpec::Named(value.to_string())
        }
    }
}

impl From<String> for ColorSpec {
    fn from(value: String) -> Self {
        ColorSpec::from(value.as_str())
    }
}

impl From<Painter> for ColorSpec {
    fn from(painter: Painter) -> Self {
        ColorSpec::Style(painter)
    }
}

/// Turn a color specification into a painter.
pub fn resolve(spec: &ColorSpec) -> Result<Painter, StyleError> {
    match spec {
        ColorSpec::Default => Ok(Painter::identity()),
        ColorSpec::Hex(literal) => parse_hex(literal).map(Painter::foreground),
        ColorSpec::Named(name) => parse_named(name).map(Painter::foreground),
        ColorSpec::Style(painter) => Ok(painter.clone()),
    }
}

fn parse_named(name: &str) -> Result<Color, StyleError> {
    let normalized = name.trim().to_lowercase().replace(['_', '-'], " ");
    let normalized = match normalized.as_str() {
        "gray" | "grey" => "bright black",
        other => other,
    };
    normalized
        .parse::<Color>()
        .map_err(|_| StyleError::UnknownColorName(name.to_string()))
}

fn parse_hex(literal: &str) -> Result<Color, StyleError> {
    let invalid = || StyleError::InvalidHexColor(literal.to_string());
    let digits = literal.strip_prefix('#').ok_or_else(invalid)?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    let (r, g, b) = match digits.len() {
        3 => {
            // #f80 is shorthand for #ff8800
            let expand = |i: usize| channel(&digits[i..=i].repeat(2));
            (expand(0)?, expand(1)?, expand(2)?)
        }
        6 => (channel(&digits[0..2])?, channel(&digits[2..4])?, channel(&digits[4..6])?),
        _ => return Err(invalid()),
    };

    Ok(Color::TrueColor { r, g, b })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let painter = resolve(&ColorSpec::Default).unwrap();
        assert_eq!(painter.paint("GET"), "GET");
    }

    #[test]
    fn test_string_classification() {
        assert!(matches!(ColorSpec::from("default"), ColorSpec::Default));
        assert!(matches!(ColorSpec::from("#ff8600"), ColorSpec::Hex(_)));
        assert!(matches!(ColorSpec::from("blue"), ColorSpec::Named(_)));
    }

    #[test]
    fn test_named_color() {
        colored::control::set_override(true);
        let painter = resolve(&ColorSpec::from("blue")).unwrap();
        assert_eq!(painter.paint("POST"), "POST".blue().to_string());

        let painter = resolve(&ColorSpec::from("bright_green")).unwrap();
        assert_eq!(painter.paint("ok"), "ok".bright_green().to_string());

        let painter = resolve(&ColorSpec::from("gray")).unwrap();
        assert_eq!(painter.paint("ok"), "ok".bright_black().to_string());
    }

    #[test]
    fn test_unknown_color_name() {
        let err = resolve(&ColorSpec::from("chartreuse-ish")).unwrap_err();
        assert_eq!(err, StyleError::UnknownColorName("chartreuse-ish".into()));
    }

    #[test]
    fn test_hex_color() {
        colored::control::set_override(true);
        let painter = resolve(&ColorSpec::from("#ff8600")).unwrap();
        assert_eq!(painter.paint("/path"), "/path".truecolor(0xff, 0x86, 0x00).to_string());

        let short = resolve(&ColorSpec::from("#f80")).unwrap();
        assert_eq!(short.paint("/path"), "/path".truecolor(0xff, 0x88, 0x00).to_string());
    }

    #[test]
    fn test_invalid_hex() {
        for literal in ["#12", "#ggg", "#12345", "#ff86001"] {
            let err = resolve(&ColorSpec::from(literal)).unwrap_err();
            assert_eq!(err, StyleError::InvalidHexColor(literal.into()));
        }
    }

    #[test]
    fn test_prebuilt_style_is_used_unchanged() {
        let spec = ColorSpec::style(|s| format!("<{s}>"));
        assert_eq!(resolve(&spec).unwrap().paint("x"), "<x>");
    }

    #[test]
    fn test_empty_text_stays_empty() {
        colored::control::set_override(true);
        let painter = resolve(&ColorSpec::from("red")).unwrap();
        assert_eq!(painter.paint(""), "");
    }
}
