//! Plain-text table layout for rendered rows.

use unicode_width::UnicodeWidthStr;

use crate::listing::engine::RenderedRow;

/// Turns rows of pre-colorized cells into one printable block.
pub trait TableRenderer: Send + Sync {
    fn render(&self, headers: &[&str], rows: &[RenderedRow]) -> String;
}

/// Left-aligned columns separated by a fixed gutter, with a header and a
/// dashed rule underneath it.
///
/// Width is measured on the visible text, so ANSI escapes in colored
/// cells do not skew the alignment.
#[derive(Debug, Clone)]
pub struct AlignedTable {
    gutter: String,
}

impl AlignedTable {
    pub fn new() -> Self {
        Self {
            gutter: "  ".to_string(),
        }
    }

    pub fn with_gutter(gutter: impl Into<String>) -> Self {
        Self {
            gutter: gutter.into(),
        }
    }

    fn line(&self, cells: &[&str], widths: &[usize]) -> String {
        let mut line = String::new();
        for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
            if i > 0 {
                line.push_str(&self.gutter);
            }
            line.push_str(cell);
            let pad = width.saturating_sub(visible_width(cell));
            line.extend(std::iter::repeat(' ').take(pad));
        }
        line.trim_end().to_string()
    }
}

impl Default for AlignedTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer for AlignedTable {
    fn render(&self, headers: &[&str], rows: &[RenderedRow]) -> String {
        let grid: Vec<Vec<&str>> = rows
            .iter()
            .map(|row| headers.iter().map(|h| row.get(h).unwrap_or("")).collect())
            .collect();

        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                grid.iter()
                    .map(|cells| visible_width(cells[i]))
                    .chain(std::iter::once(visible_width(header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let rules: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let rules: Vec<&str> = rules.iter().map(String::as_str).collect();

        let mut lines = Vec::with_capacity(grid.len() + 2);
        lines.push(self.line(headers, &widths));
        lines.push(self.line(&rules, &widths));
        for cells in &grid {
            lines.push(self.line(cells, &widths));
        }
        lines.join("\n")
    }
}

/// Display width of `text` ignoring ANSI CSI sequences (`ESC [ ... final`).
pub fn visible_width(text: &str) -> usize {
    if !text.contains('\x1b') {
        return UnicodeWidthStr::width(text);
    }

    let mut plain = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
        } else {
            plain.push(c);
        }
    }
    UnicodeWidthStr::width(plain.as_str())
}
