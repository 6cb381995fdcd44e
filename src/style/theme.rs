//! Theme presets and per-role overrides.

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::style::color::{resolve, ColorSpec};
use crate::style::StyleError;

/// Colors for each authentication mode.
#[derive(Debug, Clone)]
pub struct ModeColors {
    pub optional: ColorSpec,
    pub required: ColorSpec,
    pub r#try: ColorSpec,
}

/// Colors for each kind of access scope.
#[derive(Debug, Clone)]
pub struct ScopeColors {
    /// Any-of scopes (no prefix).
    pub selection: ColorSpec,
    /// Must-have scopes (`+` prefix).
    pub required: ColorSpec,
    /// Must-not-have scopes (`!` prefix).
    pub forbidden: ColorSpec,
}

/// Mapping from semantic display roles to colors.
///
/// Every role is always populated; "no color" is expressed with
/// [`ColorSpec::Default`], never with an absent role.
#[derive(Debug, Clone)]
pub struct Theme {
    pub method: ColorSpec,
    pub path: ColorSpec,
    pub strategy: ColorSpec,
    pub mode: ModeColors,
    pub scopes: ScopeColors,
    pub description: ColorSpec,
    pub tags: ColorSpec,
}

impl Theme {
    /// Blue methods, green strategies, scope kinds in green/magenta/red.
    pub fn colored() -> Self {
        Self {
            method: ColorSpec::style(|s| s.blue().to_string()),
            path: ColorSpec::Default,
            strategy: ColorSpec::style(|s| s.green().to_string()),
            mode: ModeColors {
                optional: ColorSpec::style(|s| s.bright_black().to_string()),
                required: ColorSpec::style(|s| s.bright_green().to_string()),
                r#try: ColorSpec::style(|s| s.on_bright_black().to_string()),
            },
            scopes: ScopeColors {
                selection: ColorSpec::style(|s| s.green().to_string()),
                required: ColorSpec::style(|s| s.magenta().to_string()),
                forbidden: ColorSpec::style(|s| s.red().to_string()),
            },
            description: ColorSpec::style(|s| s.yellow().to_string()),
            tags: ColorSpec::style(|s| s.bright_black().to_string()),
        }
    }

    /// Every role set to [`ColorSpec::Default`].
    pub fn plain() -> Self {
        Self {
            method: ColorSpec::Default,
            path: ColorSpec::Default,
            strategy: ColorSpec::Default,
            mode: ModeColors {
                optional: ColorSpec::Default,
                required: ColorSpec::Default,
                r#try: ColorSpec::Default,
            },
            scopes: ScopeColors {
                selection: ColorSpec::Default,
                required: ColorSpec::Default,
                forbidden: ColorSpec::Default,
            },
            description: ColorSpec::Default,
            tags: ColorSpec::Default,
        }
    }

    pub fn rainbow() -> Self {
        Self {
            method: ColorSpec::style(|s| s.red().to_string()),
            path: ColorSpec::from("#ff8600"),
            strategy: ColorSpec::style(|s| s.yellow().to_string()),
            mode: ModeColors {
                optional: ColorSpec::style(|s| s.on_cyan().to_string()),
                required: ColorSpec::style(|s| s.blue().to_string()),
                r#try: ColorSpec::style(|s| s.bright_magenta().to_string()),
            },
            scopes: ScopeColors {
                selection: ColorSpec::style(|s| s.bright_green().to_string()),
                required: ColorSpec::style(|s| s.green().to_string()),
                forbidden: ColorSpec::style(|s| s.on_green().to_string()),
            },
            description: ColorSpec::style(|s| s.bright_blue().to_string()),
            tags: ColorSpec::style(|s| s.magenta().to_string()),
        }
    }

    /// Replace the roles set in `overrides`, keep the rest.
    pub fn with_overrides(mut self, overrides: &ThemeOverrides) -> Self {
        fn apply(slot: &mut ColorSpec, value: &Option<ColorSpec>) {
            if let Some(spec) = value {
                *slot = spec.clone();
            }
        }

        apply(&mut self.method, &overrides.method);
        apply(&mut self.path, &overrides.path);
        apply(&mut self.strategy, &overrides.strategy);
        apply(&mut self.mode.optional, &overrides.mode.optional);
        apply(&mut self.mode.required, &overrides.mode.required);
        apply(&mut self.mode.r#try, &overrides.mode.r#try);
        apply(&mut self.scopes.selection, &overrides.scopes.selection);
        apply(&mut self.scopes.required, &overrides.scopes.required);
        apply(&mut self.scopes.forbidden, &overrides.scopes.forbidden);
        apply(&mut self.description, &overrides.description);
        apply(&mut self.tags, &overrides.tags);
        self
    }

    /// All roles with their dotted names, in declaration order.
    pub fn roles(&self) -> [(&'static str, &ColorSpec); 11] {
        [
            ("method", &self.method),
            ("path", &self.path),
            ("strategy", &self.strategy),
            ("mode.optional", &self.mode.optional),
            ("mode.required", &self.mode.required),
            ("mode.try", &self.mode.r#try),
            ("scopes.selection", &self.scopes.selection),
            ("scopes.required", &self.scopes.required),
            ("scopes.forbidden", &self.scopes.forbidden),
            ("description", &self.description),
            ("tags", &self.tags),
        ]
    }

    /// Resolve every role once and report the ones that fail.
    pub fn check(&self) -> Vec<(&'static str, StyleError)> {
        self.roles()
            .into_iter()
            .filter_map(|(role, spec)| resolve(spec).err().map(|e| (role, e)))
            .collect()
    }

    /// True when no role applies any styling.
    pub fn is_plain(&self) -> bool {
        self.roles().iter().all(|(_, spec)| spec.is_default())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::colored()
    }
}

/// Built-in theme selectable by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ThemePreset {
    #[default]
    Default,
    NoColor,
    Rainbow,
}

impl ThemePreset {
    pub fn theme(self) -> Theme {
        match self {
            ThemePreset::Default => Theme::colored(),
            ThemePreset::NoColor => Theme::plain(),
            ThemePreset::Rainbow => Theme::rainbow(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModeOverrides {
    pub optional: Option<ColorSpec>,
    pub required: Option<ColorSpec>,
    pub r#try: Option<ColorSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScopeOverrides {
    pub selection: Option<ColorSpec>,
    pub required: Option<ColorSpec>,
    pub forbidden: Option<ColorSpec>,
}

/// Partial theme read from configuration, layered over a preset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeOverrides {
    pub method: Option<ColorSpec>,
    pub path: Option<ColorSpec>,
    pub strategy: Option<ColorSpec>,
    pub mode: ModeOverrides,
    pub scopes: ScopeOverrides,
    pub description: Option<ColorSpec>,
    pub tags: Option<ColorSpec>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_resolve() {
        for preset in [ThemePreset::Default, ThemePreset::NoColor, ThemePreset::Rainbow] {
            assert!(preset.theme().check().is_empty(), "{preset:?} has unresolvable roles");
        }
    }

    #[test]
    fn test_plain_theme() {
        assert!(Theme::plain().is_plain());
        assert!(!Theme::colored().is_plain());
        assert!(!Theme::rainbow().is_plain());
    }

    #[test]
    fn test_overrides_replace_only_given_roles() {
        let overrides: ThemeOverrides = toml::from_str(
            r##"
            method = "red"
            scopes = { forbidden = "#ff0000" }
            "##,
        )
        .unwrap();

        let theme = Theme::plain().with_overrides(&overrides);
        assert!(matches!(theme.method, ColorSpec::Named(ref n) if n == "red"));
        assert!(matches!(theme.scopes.forbidden, ColorSpec::Hex(ref h) if h == "#ff0000"));
        assert!(theme.path.is_default());
        assert!(theme.scopes.required.is_default());
    }

    #[test]
    fn test_check_reports_bad_roles() {
        let overrides = ThemeOverrides {
            tags: Some(ColorSpec::from("not-a-color")),
            ..Default::default()
        };
        let errors = Theme::plain().with_overrides(&overrides).check();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "tags");
    }

    #[test]
    fn test_preset_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            theme: ThemePreset,
        }
        let w: Wrapper = toml::from_str(r#"theme = "no-color""#).unwrap();
        assert_eq!(w.theme, ThemePreset::NoColor);
    }
}
