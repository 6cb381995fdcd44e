//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::Deserialize;

use crate::routing::{parse_method, AccessRule, AuthMode, AuthSettings, Route, ScopeRule};
use crate::style::{Theme, ThemeOverrides, ThemePreset};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,

    /// Route table listing settings.
    pub listing: ListingConfig,

    /// Statically configured routes, in table order.
    pub routes: Vec<RouteConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive (e.g. "info", "routes_list=debug").
    /// `RUST_LOG` takes precedence when set.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Route listing configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Register the listing plugin at startup.
    pub enabled: bool,

    /// Base theme.
    pub theme: ThemePreset,

    /// Per-role color overrides layered over `theme`.
    pub colors: ThemeOverrides,

    /// Active columns in display order. All columns when unset.
    pub columns: Option<Vec<String>>,

    /// Sort column key, `-` prefix for descending. Table order when unset.
    pub sort: Option<String>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            theme: ThemePreset::Default,
            colors: ThemeOverrides::default(),
            columns: None,
            sort: None,
        }
    }
}

impl ListingConfig {
    /// The preset with overrides applied.
    pub fn resolved_theme(&self) -> Theme {
        self.theme.theme().with_overrides(&self.colors)
    }
}

/// A statically configured route answering with a fixed response.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    /// HTTP method, any case; `*` matches every method.
    pub method: String,

    /// Path template, e.g. "/users/{id}".
    pub path: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub auth: Option<RouteAuthConfig>,

    /// Response status code.
    #[serde(default = "default_status")]
    pub status: u16,

    /// Response body.
    #[serde(default)]
    pub body: String,
}

fn default_status() -> u16 {
    200
}

impl RouteConfig {
    /// The route descriptor, or `None` if the method does not parse.
    pub fn route(&self) -> Option<Route> {
        let method = parse_method(&self.method)?;
        let mut route = Route::new(method, self.path.clone()).tags(self.tags.iter().cloned());
        route.settings.description = self.description.clone();
        route.settings.auth = self.auth.as_ref().map(RouteAuthConfig::settings);
        Some(route)
    }
}

/// Route authentication as written in config.
///
/// `strategy` and `strategies` are concatenated. `scope` is shorthand for
/// one access rule and comes before the rules listed in `access`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouteAuthConfig {
    pub strategy: Option<String>,
    pub strategies: Vec<String>,
    pub mode: Option<AuthMode>,
    pub scope: Vec<String>,
    pub access: Vec<AccessConfig>,
}

impl RouteAuthConfig {
    pub fn settings(&self) -> AuthSettings {
        let strategies = self
            .strategy
            .iter()
            .chain(self.strategies.iter())
            .cloned()
            .collect();

        let mut access = Vec::new();
        if !self.scope.is_empty() {
            access.push(AccessRule::scope(ScopeRule::parse(&self.scope)));
        }
        access.extend(self.access.iter().map(AccessConfig::rule));

        AuthSettings {
            strategies,
            mode: self.mode,
            access,
        }
    }
}

/// One access rule as written in config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessConfig {
    pub scope: Option<ScopeConfig>,
}

impl AccessConfig {
    pub fn rule(&self) -> AccessRule {
        AccessRule {
            scope: self.scope.as_ref().map(ScopeConfig::rule),
        }
    }
}

/// Scopes either in prefix notation or split by kind.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScopeConfig {
    /// `["admin", "+owner", "!banned"]`
    Tokens(Vec<String>),
    /// `{ selection = [...], required = [...], forbidden = [...] }`
    Kinds {
        #[serde(default)]
        selection: Vec<String>,
        #[serde(default)]
        required: Vec<String>,
        #[serde(default)]
        forbidden: Vec<String>,
    },
}

impl ScopeConfig {
    pub fn rule(&self) -> ScopeRule {
        match self {
            ScopeConfig::Tokens(tokens) => ScopeRule::parse(tokens),
            ScopeConfig::Kinds {
                selection,
                required,
                forbidden,
            } => ScopeRule {
                selection: selection.clone(),
                required: required.clone(),
                forbidden: forbidden.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    #[test]
    fn test_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:8080");
        assert_eq!(config.timeouts.request_secs, 30);
        assert!(config.listing.enabled);
        assert_eq!(config.listing.theme, ThemePreset::Default);
        assert!(config.listing.columns.is_none());
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_route_auth_forms() {
        let config: ServerConfig = toml::from_str(
            r#"
            [[routes]]
            method = "patch"
            path = "/second"
            auth = { strategy = "session", mode = "required", scope = ["admin"] }

            [[routes]]
            method = "GET"
            path = "/multi"
            status = 204

            [routes.auth]
            strategies = ["session", "token"]
            mode = "try"
            access = [
                { scope = ["admin", "!banned"] },
                { scope = { required = ["owner"], selection = ["a", "b"] } },
                {},
            ]
            "#,
        )
        .unwrap();

        let second = config.routes[0].route().unwrap();
        assert_eq!(second.method, Method::PATCH);
        let auth = second.settings.auth.unwrap();
        assert_eq!(auth.strategies, vec!["session"]);
        assert_eq!(auth.mode, Some(AuthMode::Required));
        assert_eq!(auth.access, vec![AccessRule::scope(ScopeRule::parse(["admin"]))]);

        assert_eq!(config.routes[1].status, 204);
        let auth = config.routes[1].route().unwrap().settings.auth.unwrap();
        assert_eq!(auth.strategies, vec!["session", "token"]);
        assert_eq!(auth.mode, Some(AuthMode::Try));
        assert_eq!(auth.access.len(), 3);
        assert_eq!(auth.access[0].scope.as_ref().unwrap().forbidden, vec!["banned"]);
        let kinds = auth.access[1].scope.as_ref().unwrap();
        assert_eq!(kinds.required, vec!["owner"]);
        assert_eq!(kinds.selection, vec!["a", "b"]);
        assert!(auth.access[2].scope.is_none());
    }

    #[test]
    fn test_bad_method_yields_no_route() {
        let config: ServerConfig = toml::from_str(
            r#"
            [[routes]]
            method = "NOT VALID"
            path = "/"
            "#,
        )
        .unwrap();
        assert!(config.routes[0].route().is_none());
    }

    #[test]
    fn test_unknown_route_field_rejected() {
        let result: Result<ServerConfig, _> = toml::from_str(
            r#"
            [[routes]]
            method = "GET"
            path = "/"
            handler = "nope"
            "#,
        );
        assert!(result.is_err());
    }
}
