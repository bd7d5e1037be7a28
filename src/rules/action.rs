//! Rule authoring types.

use crate::value::Value;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Binary predicate deciding whether two sequence elements correspond.
///
/// The first argument is the destination element, the second the source
/// element. The engine only invokes the predicate; it takes no ownership
/// of captured state beyond the shared reference.
pub type MatchFn = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// How the engine pairs up sequence elements.
#[derive(Clone, Default)]
pub enum ElementMatch {
    /// The default predicate: deep value equality.
    #[default]
    Default,
    /// No matching; source and destination are concatenated, duplicates
    /// allowed.
    Disabled,
    /// A caller-supplied predicate.
    Custom(MatchFn),
}

impl fmt::Debug for ElementMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementMatch::Default => f.write_str("Default"),
            ElementMatch::Disabled => f.write_str("Disabled"),
            ElementMatch::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How two matched sequence elements are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedAction {
    /// Recursively combine the pair (the default).
    Merge,
    /// Overwrite the destination element with the source element verbatim.
    Replace,
}

/// Where an unmatched source element is placed in the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Insert at the front.
    Prepend,
    /// Add at the back (the default).
    Append,
}

/// Configurable behavior for merging two sequences.
///
/// Unset fields take the documented defaults when the rule table is
/// compiled: equality matching, `matched: Merge`, `not_matched: Append`.
#[derive(Debug, Clone, Default)]
pub struct SequenceMergeAction {
    pub match_with: ElementMatch,
    pub matched: Option<MatchedAction>,
    pub not_matched: Option<Placement>,
}

impl SequenceMergeAction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match elements with a caller-supplied predicate.
    pub fn match_by(
        mut self,
        f: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.match_with = ElementMatch::Custom(Arc::new(f));
        self
    }

    /// Disable element matching; the sequences are concatenated.
    pub fn no_match(mut self) -> Self {
        self.match_with = ElementMatch::Disabled;
        self
    }

    /// Sets how matched element pairs are combined.
    pub fn matched(mut self, action: MatchedAction) -> Self {
        self.matched = Some(action);
        self
    }

    /// Sets where unmatched source elements are placed.
    pub fn not_matched(mut self, placement: Placement) -> Self {
        self.not_matched = Some(placement);
        self
    }
}

/// A merge behavior override for the paths a rule pattern matches.
#[derive(Debug, Clone)]
pub enum MergeAction {
    /// Default record recursion.
    Merge,
    /// Discard the destination subtree; the source subtree is used
    /// verbatim.
    Replace,
    /// Configured sequence merge.
    Sequence(SequenceMergeAction),
}

impl From<SequenceMergeAction> for MergeAction {
    fn from(action: SequenceMergeAction) -> Self {
        MergeAction::Sequence(action)
    }
}

/// Options for a merge call.
///
/// Rule keys are dotted path patterns (`$.a.b` or `a.b`) with glob
/// wildcards `*`, `**`, `?`; keys are normalized to `/`-delimited form
/// once per outer call. The map's insertion order is rule precedence: the
/// first matching pattern wins, there is no "most specific wins"
/// resolution.
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    pub rules: IndexMap<String, MergeAction>,
}

impl MergeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule. Later additions have lower precedence.
    pub fn rule(mut self, pattern: impl Into<String>, action: impl Into<MergeAction>) -> Self {
        self.rules.insert(pattern.into(), action.into());
        self
    }
}
