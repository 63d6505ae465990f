//! Qualified class names and namespaces.
//!
//! Classes are identified by `::`-separated qualified names such as
//! `Web::Views::Home::Index`. The namespace of a class is everything before
//! its last segment; single-segment names live in the root namespace.

use crate::error::{ViewError, ViewResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Separator between namespace segments.
pub const SEPARATOR: &str = "::";

/// A validated qualified class identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassName(String);

impl ClassName {
    /// Parse a qualified name, rejecting empty names and empty segments.
    pub fn parse(name: &str) -> ViewResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ViewError::invalid_class_name(name, "name is empty"));
        }
        if name.split(SEPARATOR).any(|segment| segment.trim().is_empty()) {
            return Err(ViewError::invalid_class_name(name, "empty segment"));
        }
        if name.contains(char::is_whitespace) {
            return Err(ViewError::invalid_class_name(name, "contains whitespace"));
        }
        Ok(Self(name.to_string()))
    }

    /// Wrap a name known to be well formed.
    pub(crate) fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR)
    }

    /// The innermost segment (`Index` for `Web::Views::Index`).
    pub fn last_segment(&self) -> &str {
        match self.0.rfind(SEPARATOR) {
            Some(pos) => &self.0[pos + SEPARATOR.len()..],
            None => &self.0,
        }
    }

    /// Everything before the final separator.
    pub fn namespace(&self) -> Namespace {
        match self.0.rfind(SEPARATOR) {
            Some(pos) => Namespace::new(&self.0[..pos]),
            None => Namespace::root(),
        }
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ClassName {
    type Err = ViewError;

    fn from_str(s: &str) -> ViewResult<Self> {
        Self::parse(s)
    }
}

impl Serialize for ClassName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ClassName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ClassName::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A scoping identifier. The empty namespace is the global root.
///
/// No validation is performed: any identifier-like string is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self(name.trim().trim_matches(':').to_string())
    }

    /// The global namespace.
    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join `name` into this namespace (`Web::Views` + `Index`).
    pub fn qualify(&self, name: &str) -> String {
        if self.is_root() {
            name.to_string()
        } else {
            format!("{}{}{}", self.0, SEPARATOR, name)
        }
    }

    /// The enclosing namespace, or `None` at the root.
    pub fn parent(&self) -> Option<Namespace> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind(SEPARATOR) {
            Some(pos) => Some(Namespace::new(&self.0[..pos])),
            None => Some(Namespace::root()),
        }
    }

    /// This namespace and each enclosing one, innermost first, ending at
    /// (and including) the root.
    pub fn ancestors(&self) -> impl Iterator<Item = Namespace> {
        std::iter::successors(Some(self.clone()), |ns| ns.parent())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "{}", SEPARATOR)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<&str> for Namespace {
    fn from(value: &str) -> Self {
        Namespace::new(value)
    }
}

impl From<String> for Namespace {
    fn from(value: String) -> Self {
        Namespace::new(value)
    }
}
