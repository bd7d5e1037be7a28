//! Path module - Slash-delimited merge-tree locations.
//!
//! Paths are built incrementally during recursion and serve as the lookup
//! key for rule resolution.

use crate::value::Value;
use std::fmt;

/// Path identifies a location in the merge tree.
///
/// The root is `""` when the destination is a record and `"/"` otherwise
/// (the latter lets a rule target a whole non-record root). Each record
/// descent appends `/key`; each sequence descent appends the literal suffix
/// `[]` - sequence elements are not individually indexed, so every element
/// of a sequence at one location shares a single rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(String);

impl Path {
    /// The root path for a pairwise merge into `dest`.
    pub fn root_for(dest: &Value) -> Self {
        if dest.is_map() {
            Path(String::new())
        } else {
            Path("/".to_string())
        }
    }

    /// The path of a record field under this path.
    pub fn key(&self, key: &str) -> Self {
        Path(format!("{}/{}", self.0, key))
    }

    /// The path shared by the elements of a sequence at this path.
    pub fn elements(&self) -> Self {
        Path(format!("{}[]", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Builds a path from its string form without going through descent.
#[cfg(test)]
pub(crate) fn raw(path: impl Into<String>) -> Path {
    Path(path.into())
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
