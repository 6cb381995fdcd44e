//! Extracted cell values and their sort keys.

use std::fmt;

/// The raw value a column pulls out of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// One piece of text. The empty scalar stands for "absent".
    Scalar(String),
    /// An ordered list, e.g. strategy names or tags.
    Group(Vec<String>),
    /// A list of lists, one inner list per access rule.
    Groups(Vec<Vec<String>>),
}

impl Value {
    pub fn empty() -> Self {
        Value::Scalar(String::new())
    }

    /// True when there is nothing to show.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Scalar(s) => s.is_empty(),
            Value::Group(items) => items.is_empty(),
            Value::Groups(groups) => groups.is_empty(),
        }
    }

    /// Plain text form: sequences joined with `", "`, nested ones flattened
    /// the same way.
    pub fn joined(&self) -> String {
        match self {
            Value::Scalar(s) => s.clone(),
            Value::Group(items) => items.join(", "),
            Value::Groups(groups) => groups
                .iter()
                .map(|group| group.join(", "))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// The value as a list of token groups.
    ///
    /// A scalar is split on `", "` into a single group, a group is wrapped
    /// as the only group, and the empty value yields no groups.
    pub fn into_groups(self) -> Vec<Vec<String>> {
        match self {
            Value::Scalar(s) if s.is_empty() => Vec::new(),
            Value::Scalar(s) => vec![s.split(", ").map(str::to_string).collect()],
            Value::Group(items) => vec![items],
            Value::Groups(groups) => groups,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::Group(items)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// Comparable projection of a value.
///
/// Numbers order before text so mixed columns still sort deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Number(i64),
    Text(String),
}

impl From<&Value> for SortKey {
    fn from(value: &Value) -> Self {
        SortKey::Text(value.joined())
    }
}
