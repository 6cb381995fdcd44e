//! The listing engine: route table in, one printed table out.
//!
//! # Responsibilities
//! - Snapshot the route table on every call
//! - Render every active column for every route
//! - Hand the grid to the table renderer and write the block once
//!
//! # Design Decisions
//! - Theme, columns, renderer and sink are fixed at construction
//! - Table order is kept unless a sort column is configured
//! - The first cell that fails to render aborts the listing

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use crate::listing::columns::{Column, ColumnRegistry};
use crate::listing::table::{AlignedTable, TableRenderer};
use crate::listing::value::SortKey;
use crate::listing::ListError;
use crate::routing::{Route, RouteSource};
use crate::style::Theme;

/// Where a finished table goes.
pub type OutputSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Sink that prints the block as one line on stdout.
pub fn stdout_sink() -> OutputSink {
    writer_sink(|| std::io::stdout().lock())
}

/// Sink writing each block plus a newline to a fresh writer from `open`.
///
/// Write errors (a closed pipe, say) are logged and dropped.
pub fn writer_sink<W, F>(open: F) -> OutputSink
where
    W: Write,
    F: Fn() -> W + Send + Sync + 'static,
{
    Arc::new(move |block: &str| {
        let mut writer = open();
        if let Err(err) = writeln!(writer, "{block}").and_then(|()| writer.flush()) {
            tracing::warn!(error = %err, "Failed to write route table");
        }
    })
}

/// Colorized cells of one route, keyed by column header, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedRow {
    cells: Vec<(&'static str, String)>,
}

impl RenderedRow {
    pub fn push(&mut self, header: &'static str, text: String) {
        self.cells.push((header, text));
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(h, _)| *h == header)
            .map(|(_, text)| text.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.cells.iter().map(|(h, _)| *h)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.cells.iter().map(|(h, text)| (*h, text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Sort requested by column key; a leading `-` means descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub column: String,
    pub descending: bool,
}

impl From<&str> for SortOrder {
    fn from(spec: &str) -> Self {
        match spec.trim().strip_prefix('-') {
            Some(column) => Self {
                column: column.to_string(),
                descending: true,
            },
            None => Self {
                column: spec.trim().to_string(),
                descending: false,
            },
        }
    }
}

/// Renders the route table of a [`RouteSource`] and writes it to a sink.
pub struct RouteLister {
    source: Arc<dyn RouteSource>,
    columns: Vec<Column>,
    sort: Option<(Column, bool)>,
    theme: Theme,
    renderer: Box<dyn TableRenderer>,
    out: OutputSink,
}

impl RouteLister {
    pub fn builder(source: Arc<dyn RouteSource>) -> RouteListerBuilder {
        RouteListerBuilder::new(source)
    }

    /// Render the current table and write it to the sink in one call.
    pub fn list_routes(&self) -> Result<(), ListError> {
        let block = self.render_table()?;
        (self.out)(&block);
        Ok(())
    }

    /// The formatted block, without writing it anywhere.
    pub fn render_table(&self) -> Result<String, ListError> {
        let rows = self.render_rows()?;
        Ok(self.renderer.render(&self.headers(), &rows))
    }

    /// One row per route, in table order (or sort order if configured).
    pub fn render_rows(&self) -> Result<Vec<RenderedRow>, ListError> {
        let routes = self.source.routes();
        let ordered = self.order(&routes);

        let mut rows = Vec::with_capacity(ordered.len());
        for route in ordered {
            let mut row = RenderedRow::default();
            for column in &self.columns {
                row.push(column.header, column.render(route, &self.theme)?);
            }
            rows.push(row);
        }

        tracing::debug!(
            routes = rows.len(),
            columns = self.columns.len(),
            "Route table rendered"
        );
        Ok(rows)
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.header).collect()
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.key)
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    fn order<'a>(&self, routes: &'a [Route]) -> Vec<&'a Route> {
        let Some((column, descending)) = &self.sort else {
            return routes.iter().collect();
        };

        let mut keyed: Vec<(SortKey, &Route)> =
            routes.iter().map(|r| (column.sort_key(r), r)).collect();
        // stable, so equal keys keep table order in both directions
        if *descending {
            keyed.sort_by(|a, b| b.0.cmp(&a.0));
        } else {
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
        }
        keyed.into_iter().map(|(_, r)| r).collect()
    }
}

impl fmt::Debug for RouteLister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteLister")
            .field("columns", &self.columns().collect::<Vec<_>>())
            .field("sort", &self.sort.as_ref().map(|(c, desc)| (c.key, *desc)))
            .finish_non_exhaustive()
    }
}

/// Assembles a [`RouteLister`]; every part has a default.
pub struct RouteListerBuilder {
    source: Arc<dyn RouteSource>,
    registry: ColumnRegistry,
    columns: Option<Vec<String>>,
    sort: Option<SortOrder>,
    theme: Theme,
    renderer: Box<dyn TableRenderer>,
    out: OutputSink,
}

impl RouteListerBuilder {
    fn new(source: Arc<dyn RouteSource>) -> Self {
        Self {
            source,
            registry: ColumnRegistry::builtin(),
            columns: None,
            sort: None,
            theme: Theme::default(),
            renderer: Box::new(AlignedTable::new()),
            out: stdout_sink(),
        }
    }

    pub fn registry(mut self, registry: ColumnRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Restrict and order the active columns. Defaults to all of them.
    pub fn columns<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn sort(mut self, order: SortOrder) -> Self {
        self.sort = Some(order);
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn renderer<R: TableRenderer + 'static>(mut self, renderer: R) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn out(mut self, out: OutputSink) -> Self {
        self.out = out;
        self
    }

    pub fn build(self) -> Result<RouteLister, ListError> {
        let columns = match &self.columns {
            Some(keys) => self.registry.select(keys)?,
            None => self.registry.all(),
        };

        let sort = match self.sort {
            Some(order) => {
                let column = self
                    .registry
                    .get(&order.column)
                    .ok_or_else(|| ListError::UnknownColumn(order.column.clone()))?;
                Some((*column, order.descending))
            }
            None => None,
        };

        Ok(RouteLister {
            source: self.source,
            columns,
            sort,
            theme: self.theme,
            renderer: self.renderer,
            out: self.out,
        })
    }
}
