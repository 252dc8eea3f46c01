//! Property addresses used by targets, views and handlers.

use std::fmt;

/// Which wrapper family produced a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Mutable, observed view.
    Reactive,
    /// Read-only view; writes and deletes are rejected.
    Readonly,
}

impl ViewKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reactive => "reactive",
            Self::Readonly => "readonly",
        }
    }
}

/// A property address: an object key, an array index, or a classification
/// flag.
///
/// Flags only mean something to a view's handler. Raw targets never store
/// them, so they cannot collide with user data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Name(String),
    Index(usize),
    Flag(ViewKind),
}

impl Key {
    /// Array slot addressed by this key, if any.
    ///
    /// Names that spell a canonical decimal index (`"0"`, `"12"`, not `"012"`)
    /// address the same slot as the numeric key.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(i) => Some(*i),
            Self::Name(name) => parse_index(name),
            Self::Flag(_) => None,
        }
    }

    /// Object key addressed by this key, if any.
    pub fn to_property_name(&self) -> Option<String> {
        match self {
            Self::Name(name) => Some(name.clone()),
            Self::Index(i) => Some(i.to_string()),
            Self::Flag(_) => None,
        }
    }
}

fn parse_index(name: &str) -> Option<usize> {
    if name.is_empty() || (name.len() > 1 && name.starts_with('0')) {
        return None;
    }
    if !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::Name(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

impl From<&String> for Key {
    fn from(value: &String) -> Self {
        Self::Name(value.clone())
    }
}

impl From<usize> for Key {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

impl From<ViewKind> for Key {
    fn from(value: ViewKind) -> Self {
        Self::Flag(value)
    }
}

impl From<&Key> for Key {
    fn from(value: &Key) -> Self {
        value.clone()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Index(i) => write!(f, "{i}"),
            Self::Flag(kind) => write!(f, "<is_{}>", kind.as_str()),
        }
    }
}
