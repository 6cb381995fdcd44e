//! Route descriptors as held by the server's route table.
//!
//! # Design Decisions
//! - Every auth sub-field is optional or an empty collection, so readers
//!   never have to distinguish "absent" from "empty"
//! - Scope rules keep the three kinds apart; prefix notation
//!   (`+required`, `!forbidden`) is only a parsing and display concern

use axum::http::Method;
use serde::{Deserialize, Serialize};

/// Whether authentication is enforced for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    Required,
    Optional,
    /// Attempted but not enforced.
    Try,
}

impl AuthMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::Required => "required",
            AuthMode::Optional => "optional",
            AuthMode::Try => "try",
        }
    }
}

impl std::fmt::Display for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scope constraints of one access rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeRule {
    /// Any of these.
    pub selection: Vec<String>,
    /// All of these.
    pub required: Vec<String>,
    /// None of these.
    pub forbidden: Vec<String>,
}

impl ScopeRule {
    /// Build a rule from prefix notation: `+name` is required, `!name` is
    /// forbidden, anything else is a selection.
    pub fn parse<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rule = ScopeRule::default();
        for token in tokens {
            let token = token.as_ref();
            if let Some(name) = token.strip_prefix('+') {
                rule.required.push(name.to_string());
            } else if let Some(name) = token.strip_prefix('!') {
                rule.forbidden.push(name.to_string());
            } else {
                rule.selection.push(token.to_string());
            }
        }
        rule
    }

    /// Prefixed tokens, forbidden first, then required, then selection.
    pub fn tokens(&self) -> Vec<String> {
        self.forbidden
            .iter()
            .map(|s| format!("!{s}"))
            .chain(self.required.iter().map(|s| format!("+{s}")))
            .chain(self.selection.iter().cloned())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_empty() && self.required.is_empty() && self.forbidden.is_empty()
    }
}

/// One alternative a request may satisfy; rules on a route are OR-ed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessRule {
    pub scope: Option<ScopeRule>,
}

impl AccessRule {
    pub fn scope(rule: ScopeRule) -> Self {
        Self { scope: Some(rule) }
    }
}

/// Authentication configuration of a route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSettings {
    pub strategies: Vec<String>,
    pub mode: Option<AuthMode>,
    pub access: Vec<AccessRule>,
}

impl AuthSettings {
    pub fn strategy(name: impl Into<String>) -> Self {
        Self {
            strategies: vec![name.into()],
            ..Default::default()
        }
    }

    pub fn mode(mut self, mode: AuthMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Append an access rule given in prefix notation.
    pub fn scope<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.access.push(AccessRule::scope(ScopeRule::parse(tokens)));
        self
    }
}

/// Per-route settings beyond method and path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteSettings {
    pub auth: Option<AuthSettings>,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

/// A registered route: method, path template and settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: Method,
    pub path: String,
    pub settings: RouteSettings,
}

impl Route {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            settings: RouteSettings::default(),
        }
    }

    pub fn auth(mut self, auth: AuthSettings) -> Self {
        self.settings.auth = Some(auth);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.settings.description = Some(description.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// True for the `*` catch-all method.
    pub fn is_any_method(&self) -> bool {
        self.method.as_str() == "*"
    }
}

/// Parse a method name case-insensitively; `*` means any method.
pub fn parse_method(name: &str) -> Option<Method> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Method::from_bytes(name.to_ascii_uppercase().as_bytes()).ok()
}
