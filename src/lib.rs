//! # flex-merge
//!
//! A rule-driven structural merge engine for JSON/YAML-like values.
//!
//! Given two (or more) hierarchical values built from records, sequences,
//! and scalars, the engine produces a single merged value according to a
//! path-addressed rule table. It is intended for layering configuration
//! documents: a base config and an override merge without losing nested
//! structure, while individual substructures can opt into different
//! behavior ("replace this subtree wholesale", "match sequence elements by
//! a custom predicate instead of equality").
//!
//! ## Modules
//!
//! - [`value`] - In-memory representation of JSON/YAML values
//! - [`path`] - Slash-delimited merge-tree locations used for rule lookup
//! - [`rules`] - Rule authoring types and the compiled rule table
//! - [`merge`] - Value dispatch and the public merge entry points
//!
//! ## Example
//!
//! ```
//! use flex_merge::merge;
//! use flex_merge::value::from_json;
//!
//! let base = from_json(r#"{"retries": 3, "hosts": ["a"]}"#).unwrap();
//! let layer = from_json(r#"{"hosts": ["b"], "timeout": 30}"#).unwrap();
//!
//! let merged = merge(base, layer);
//! let want = from_json(r#"{"retries": 3, "hosts": ["a", "b"], "timeout": 30}"#).unwrap();
//! assert_eq!(merged, want);
//! ```

pub mod merge;
pub mod path;
pub mod rules;
pub mod value;

pub use merge::{merge, merge_all, merge_all_with, merge_with};
pub use path::Path;
pub use rules::{
    ElementMatch, MatchFn, MatchedAction, MergeAction, MergeError, MergeOptions, Placement,
    Ruleset, SequenceMergeAction,
};
pub use value::{Map, Value};
