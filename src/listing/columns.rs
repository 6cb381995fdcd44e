//! Column descriptors and the built-in column registry.
//!
//! # Responsibilities
//! - Define how each column extracts, sorts and renders a route
//! - Keep columns in display order
//! - Resolve a caller's column selection against the registry
//!
//! # Design Decisions
//! - A column is a plain record of three function pointers, so it is
//!   `Copy`, has no hidden state, and rendering stays pure in
//!   `(route, theme)`
//! - Extraction is total: absent auth, mode, rules or scope groups all
//!   come out as the empty value

use crate::listing::value::{SortKey, Value};
use crate::listing::ListError;
use crate::routing::{AuthMode, AuthSettings, Route};
use crate::style::{resolve, ColorSpec, StyleError, Theme};

pub type ExtractFn = fn(&Route) -> Value;
pub type SortKeyFn = fn(&Route, &Value) -> SortKey;
pub type RenderFn = fn(&Route, &Value, &Theme) -> Result<String, StyleError>;

/// How one piece of route data becomes a table cell.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    /// Registry key used in configuration.
    pub key: &'static str,
    /// Display label.
    pub header: &'static str,
    extract: ExtractFn,
    sort_key: SortKeyFn,
    render: RenderFn,
}

impl Column {
    pub const fn new(
        key: &'static str,
        header: &'static str,
        extract: ExtractFn,
        sort_key: SortKeyFn,
        render: RenderFn,
    ) -> Self {
        Self {
            key,
            header,
            extract,
            sort_key,
            render,
        }
    }

    pub fn extract(&self, route: &Route) -> Value {
        (self.extract)(route)
    }

    pub fn sort_key(&self, route: &Route) -> SortKey {
        let value = self.extract(route);
        (self.sort_key)(route, &value)
    }

    /// Colorized, display-ready cell text.
    pub fn render(&self, route: &Route, theme: &Theme) -> Result<String, StyleError> {
        let value = self.extract(route);
        (self.render)(route, &value, theme)
    }
}

/// Ordered set of columns; order is display order.
#[derive(Debug, Clone)]
pub struct ColumnRegistry {
    columns: Vec<Column>,
}

impl ColumnRegistry {
    /// Method, path, strategy, mode, scopes, description, tags.
    pub fn builtin() -> Self {
        Self {
            columns: vec![
                Column::new("method", "Method", extract_method, text_key, render_method),
                Column::new("path", "Path", extract_path, text_key, render_path),
                Column::new("strategy", "Strategy", extract_strategy, text_key, render_strategy),
                Column::new("mode", "Mode", extract_mode, text_key, render_mode),
                Column::new("scopes", "Scopes", extract_scopes, text_key, render_scopes),
                Column::new(
                    "description",
                    "Description",
                    extract_description,
                    text_key,
                    render_description,
                ),
                Column::new("tags", "Tags", extract_tags, text_key, render_tags),
            ],
        }
    }

    /// Add a column, or replace the column registered under the same key
    /// while keeping its position.
    pub fn with_column(mut self, column: Column) -> Self {
        match self.columns.iter_mut().find(|c| c.key == column.key) {
            Some(slot) => *slot = column,
            None => self.columns.push(column),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The columns named by `keys`, in the order given.
    pub fn select<S: AsRef<str>>(&self, keys: &[S]) -> Result<Vec<Column>, ListError> {
        let mut selected: Vec<Column> = Vec::with_capacity(keys.len());
        for key in keys {
            let key = key.as_ref();
            let column = self
                .get(key)
                .ok_or_else(|| ListError::UnknownColumn(key.to_string()))?;
            if selected.iter().any(|c| c.key == column.key) {
                return Err(ListError::DuplicateColumn(key.to_string()));
            }
            selected.push(*column);
        }
        Ok(selected)
    }

    pub fn all(&self) -> Vec<Column> {
        self.columns.clone()
    }
}

impl Default for ColumnRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn auth(route: &Route) -> Option<&AuthSettings> {
    route.settings.auth.as_ref()
}

fn paint(spec: &ColorSpec, text: &str) -> Result<String, StyleError> {
    Ok(resolve(spec)?.paint(text))
}

fn text_key(_: &Route, value: &Value) -> SortKey {
    SortKey::from(value)
}

fn extract_method(route: &Route) -> Value {
    Value::Scalar(route.method.as_str().to_uppercase())
}

fn render_method(_: &Route, value: &Value, theme: &Theme) -> Result<String, StyleError> {
    paint(&theme.method, &value.joined())
}

fn extract_path(route: &Route) -> Value {
    Value::Scalar(route.path.clone())
}

fn render_path(_: &Route, value: &Value, theme: &Theme) -> Result<String, StyleError> {
    paint(&theme.path, &value.joined())
}

fn extract_strategy(route: &Route) -> Value {
    match auth(route) {
        Some(auth) => Value::Group(auth.strategies.clone()),
        None => Value::empty(),
    }
}

fn render_strategy(_: &Route, value: &Value, theme: &Theme) -> Result<String, StyleError> {
    paint(&theme.strategy, &value.joined())
}

fn extract_mode(route: &Route) -> Value {
    auth(route)
        .and_then(|auth| auth.mode)
        .map(|mode| Value::from(mode.as_str()))
        .unwrap_or_else(Value::empty)
}

fn render_mode(route: &Route, value: &Value, theme: &Theme) -> Result<String, StyleError> {
    let spec = match auth(route).and_then(|auth| auth.mode) {
        Some(AuthMode::Required) => &theme.mode.required,
        Some(AuthMode::Optional) => &theme.mode.optional,
        Some(AuthMode::Try) => &theme.mode.r#try,
        None => return Ok(String::new()),
    };
    paint(spec, &value.joined())
}

fn extract_scopes(route: &Route) -> Value {
    let Some(auth) = auth(route) else {
        return Value::empty();
    };
    if auth.access.is_empty() {
        return Value::empty();
    }
    Value::Groups(
        auth.access
            .iter()
            .map(|rule| rule.scope.as_ref().map(|s| s.tokens()).unwrap_or_default())
            .collect(),
    )
}

fn render_scopes(_: &Route, value: &Value, theme: &Theme) -> Result<String, StyleError> {
    if value.is_empty() {
        return Ok(String::new());
    }

    let mut groups = Vec::new();
    for group in value.clone().into_groups() {
        let mut painted = Vec::with_capacity(group.len());
        for token in &group {
            let spec = if token.starts_with('+') {
                &theme.scopes.required
            } else if token.starts_with('!') {
                &theme.scopes.forbidden
            } else {
                &theme.scopes.selection
            };
            painted.push(paint(spec, token)?);
        }
        groups.push(painted.join(", "));
    }

    // A single rule reads as a flat list; several rules are alternatives.
    if groups.len() == 1 {
        return Ok(groups.swap_remove(0));
    }
    Ok(groups
        .iter()
        .map(|group| format!("[{group}]"))
        .collect::<Vec<_>>()
        .join(", "))
}

fn extract_description(route: &Route) -> Value {
    route
        .settings
        .description
        .as_deref()
        .map(Value::from)
        .unwrap_or_else(Value::empty)
}

fn render_description(_: &Route, value: &Value, theme: &Theme) -> Result<String, StyleError> {
    paint(&theme.description, &value.joined())
}

fn extract_tags(route: &Route) -> Value {
    Value::Group(route.settings.tags.clone())
}

fn render_tags(_: &Route, value: &Value, theme: &Theme) -> Result<String, StyleError> {
    let painter = resolve(&theme.tags)?;
    let tags: Vec<String> = match value {
        Value::Group(tags) => tags.iter().map(|t| painter.paint(t)).collect(),
        other => vec![painter.paint(&other.joined())],
    };
    Ok(tags.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{AccessRule, ScopeRule};
    use axum::http::Method;
    use colored::Colorize;

    fn render(key: &str, route: &Route, theme: &Theme) -> String {
        ColumnRegistry::builtin()
            .get(key)
            .unwrap()
            .render(route, theme)
            .unwrap()
    }

    fn scoped_route() -> Route {
        Route::new(Method::GET, "/third/path").auth(
            AuthSettings::strategy("session")
                .mode(AuthMode::Optional)
                .scope(["admin", "+req", "!not"]),
        )
    }

    #[test]
    fn test_registry_order() {
        let keys: Vec<_> = ColumnRegistry::builtin().keys().collect();
        assert_eq!(
            keys,
            vec!["method", "path", "strategy", "mode", "scopes", "description", "tags"]
        );
    }

    #[test]
    fn test_no_auth_renders_empty() {
        colored::control::set_override(true);
        let route = Route::new(Method::POST, "/first/path/{id}");
        for theme in [Theme::colored(), Theme::rainbow(), Theme::plain()] {
            for key in ["strategy", "mode", "scopes", "description", "tags"] {
                assert_eq!(render(key, &route, &theme), "", "column {key}");
            }
        }
    }

    #[test]
    fn test_partial_auth_renders_empty() {
        let route = Route::new(Method::GET, "/").auth(AuthSettings {
            access: vec![AccessRule::default()],
            ..Default::default()
        });
        let theme = Theme::plain();
        assert_eq!(render("strategy", &route, &theme), "");
        assert_eq!(render("mode", &route, &theme), "");
        assert_eq!(render("scopes", &route, &theme), "");
    }

    #[test]
    fn test_method_uppercased() {
        colored::control::set_override(true);
        let route = Route::new(Method::from_bytes(b"patch").unwrap(), "/second");
        assert_eq!(render("method", &route, &Theme::plain()), "PATCH");
        assert_eq!(render("method", &route, &Theme::colored()), "PATCH".blue().to_string());
    }

    #[test]
    fn test_single_rule_scopes() {
        colored::control::set_override(true);
        let route = scoped_route();
        assert_eq!(render("scopes", &route, &Theme::plain()), "!not, +req, admin");

        let expected = format!(
            "{}, {}, {}",
            "!not".red(),
            "+req".magenta(),
            "admin".green()
        );
        assert_eq!(render("scopes", &route, &Theme::colored()), expected);
    }

    #[test]
    fn test_forbidden_scope_paint_is_used() {
        let mut theme = Theme::plain();
        theme.scopes.forbidden = ColorSpec::style(|s| format!("<{s}>"));
        assert_eq!(render("scopes", &scoped_route(), &theme), "<!not>, +req, admin");
    }

    #[test]
    fn test_multiple_rules_are_bracketed() {
        let route = Route::new(Method::GET, "/multi").auth(
            AuthSettings::strategy("session")
                .scope(["admin", "!banned"])
                .scope(["+owner"]),
        );
        assert_eq!(
            render("scopes", &route, &Theme::plain()),
            "[!banned, admin], [+owner]"
        );

        colored::control::set_override(true);
        assert_eq!(
            render("scopes", &route, &Theme::colored()),
            format!("[{}, {}], [{}]", "!banned".red(), "admin".green(), "+owner".magenta())
        );
    }

    #[test]
    fn test_rule_without_scope_is_empty_group() {
        let route = Route::new(Method::GET, "/multi").auth(AuthSettings {
            access: vec![AccessRule::default(), AccessRule::scope(ScopeRule::parse(["a"]))],
            ..Default::default()
        });
        assert_eq!(render("scopes", &route, &Theme::plain()), "[], [a]");
    }

    #[test]
    fn test_strategy_and_mode() {
        colored::control::set_override(true);
        let route = Route::new(Method::GET, "/").auth(AuthSettings {
            strategies: vec!["session".into(), "token".into()],
            mode: Some(AuthMode::Required),
            access: Vec::new(),
        });
        assert_eq!(render("strategy", &route, &Theme::plain()), "session, token");
        assert_eq!(
            render("strategy", &route, &Theme::colored()),
            "session, token".green().to_string()
        );
        assert_eq!(render("mode", &route, &Theme::plain()), "required");
        assert_eq!(
            render("mode", &route, &Theme::colored()),
            "required".bright_green().to_string()
        );
    }

    #[test]
    fn test_plain_theme_equals_extracted_text() {
        let route = scoped_route().description("third route").tags(["api", "v1"]);
        let registry = ColumnRegistry::builtin();
        for column in registry.iter() {
            let rendered = column.render(&route, &Theme::plain()).unwrap();
            assert_eq!(rendered, column.extract(&route).joined(), "column {}", column.key);
        }
    }

    #[test]
    fn test_sort_keys() {
        let registry = ColumnRegistry::builtin();
        let route = scoped_route();
        let key = |k: &str| registry.get(k).unwrap().sort_key(&route);
        assert_eq!(key("method"), SortKey::Text("GET".into()));
        assert_eq!(key("strategy"), SortKey::Text("session".into()));
        assert_eq!(key("scopes"), SortKey::Text("!not, +req, admin".into()));
    }

    #[test]
    fn test_unknown_color_surfaces_on_render() {
        let mut theme = Theme::plain();
        theme.method = ColorSpec::from("no-such-color");
        let column = *ColumnRegistry::builtin().get("method").unwrap();
        let err = column.render(&Route::new(Method::GET, "/"), &theme).unwrap_err();
        assert_eq!(err, StyleError::UnknownColorName("no-such-color".into()));
    }

    #[test]
    fn test_select() {
        let registry = ColumnRegistry::builtin();
        let selected = registry.select(&["path", "method"]).unwrap();
        let keys: Vec<_> = selected.iter().map(|c| c.key).collect();
        assert_eq!(keys, vec!["path", "method"]);

        assert!(matches!(
            registry.select(&["method", "nope"]),
            Err(ListError::UnknownColumn(ref k)) if k == "nope"
        ));
        assert!(matches!(
            registry.select(&["method", "method"]),
            Err(ListError::DuplicateColumn(_))
        ));
    }

    #[test]
    fn test_custom_column() {
        fn extract(route: &Route) -> Value {
            Value::from(route.path.split('/').filter(|s| !s.is_empty()).count().to_string())
        }
        fn sort(route: &Route, _: &Value) -> SortKey {
            SortKey::Number(route.path.split('/').filter(|s| !s.is_empty()).count() as i64)
        }
        fn render(_: &Route, value: &Value, theme: &Theme) -> Result<String, StyleError> {
            paint(&theme.path, &value.joined())
        }

        let registry =
            ColumnRegistry::builtin().with_column(Column::new("depth", "Depth", extract, sort, render));
        assert_eq!(registry.keys().last(), Some("depth"));

        let column = registry.get("depth").unwrap();
        let route = Route::new(Method::GET, "/a/b/c");
        assert_eq!(column.sort_key(&route), SortKey::Number(3));
        assert_eq!(column.render(&route, &Theme::plain()).unwrap(), "3");
    }
}
