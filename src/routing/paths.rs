//! Path template checks against the matcher axum routes with.
//!
//! A template that `matchit` would refuse makes `Router::route` panic, so
//! every path is inserted here first and refused with an error instead.

use std::collections::HashSet;

use thiserror::Error;

/// Why a path template cannot be served.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("invalid path template {path:?}: {reason}")]
    Invalid { path: String, reason: String },

    #[error("path {path:?} overlaps registered path {with:?}")]
    Conflict { path: String, with: String },
}

/// The distinct path templates registered so far.
#[derive(Debug, Clone, Default)]
pub struct PathSet {
    matcher: matchit::Router<()>,
    paths: HashSet<String>,
}

impl PathSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `path`. A path that is already present is accepted again, since
    /// several methods share one template.
    pub fn insert(&mut self, path: &str) -> Result<(), PathError> {
        if self.paths.contains(path) {
            return Ok(());
        }
        check_syntax(path)?;

        self.matcher.insert(path, ()).map_err(|err| match err {
            matchit::InsertError::Conflict { with } => PathError::Conflict {
                path: path.to_string(),
                with,
            },
            other => PathError::Invalid {
                path: path.to_string(),
                reason: other.to_string(),
            },
        })?;
        self.paths.insert(path.to_string());
        Ok(())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

// axum checks these itself before handing the path to matchit
fn check_syntax(path: &str) -> Result<(), PathError> {
    let invalid = |reason: &str| PathError::Invalid {
        path: path.to_string(),
        reason: reason.to_string(),
    };
    if !path.starts_with('/') {
        return Err(invalid("paths must start with '/'"));
    }
    if path.split('/').any(|segment| segment.starts_with(':')) {
        return Err(invalid("use {param} instead of :param"));
    }
    if path.split('/').any(|segment| segment.starts_with('*')) {
        return Err(invalid("use {*rest} instead of *rest"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_template_twice_is_accepted() {
        let mut paths = PathSet::new();
        paths.insert("/item/{id}").unwrap();
        paths.insert("/item/{id}").unwrap();
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn test_renamed_parameter_conflicts() {
        let mut paths = PathSet::new();
        paths.insert("/item/{id}").unwrap();
        let err = paths.insert("/item/{name}").unwrap_err();
        assert!(matches!(err, PathError::Conflict { ref path, .. } if path == "/item/{name}"));
        assert!(!paths.contains("/item/{name}"));
    }

    #[test]
    fn test_malformed_templates() {
        let mut paths = PathSet::new();
        for path in ["/a/{id", "relative", "/old/:id", "/files/*rest"] {
            assert!(
                matches!(paths.insert(path), Err(PathError::Invalid { .. })),
                "{path} accepted"
            );
        }
        assert!(paths.is_empty());
        paths.insert("/files/{*rest}").unwrap();
        paths.insert("/first/path/{id}").unwrap();
    }
}
