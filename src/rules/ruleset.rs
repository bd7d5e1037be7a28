//! Pattern normalization and first-match rule resolution.

use super::{ElementMatch, MatchFn, MatchedAction, MergeAction, MergeOptions, Placement};
use crate::path::Path;
use crate::value::Value;
use globset::{GlobBuilder, GlobMatcher};
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by merge calls.
#[derive(Debug, Error)]
pub enum MergeError {
    /// A rule key did not compile to a valid glob pattern.
    #[error("invalid rule pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Default element predicate: deep value equality.
static DEFAULT_MATCH: Lazy<MatchFn> =
    Lazy::new(|| Arc::new(|x: &Value, y: &Value| x == y));

/// The process-wide default sequence action: equality-matched, merged on
/// match, appended otherwise. Read-only; per-call overrides are built as
/// augmented copies.
static DEFAULT_SEQUENCE_ACTION: Lazy<SequenceAction> = Lazy::new(|| SequenceAction {
    match_fn: Some(DEFAULT_MATCH.clone()),
    matched: MatchedAction::Merge,
    not_matched: Placement::Append,
});

/// A fully-populated sequence action. Compilation fills every field, so
/// consumers never branch on "field present?". `match_fn: None` means
/// matching is disabled and the sequences concatenate.
#[derive(Clone)]
pub struct SequenceAction {
    pub match_fn: Option<MatchFn>,
    pub matched: MatchedAction,
    pub not_matched: Placement,
}

impl fmt::Debug for SequenceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceAction")
            .field("match_fn", &self.match_fn.as_ref().map(|_| ".."))
            .field("matched", &self.matched)
            .field("not_matched", &self.not_matched)
            .finish()
    }
}

/// The action a path resolved to.
#[derive(Debug, Clone)]
pub enum ResolvedAction {
    Merge,
    Replace,
    Sequence(SequenceAction),
}

#[derive(Debug)]
struct CompiledRule {
    matcher: GlobMatcher,
    action: ResolvedAction,
}

/// A rule table with keys normalized, patterns compiled, and sequence
/// actions fully populated. Built once per outer merge call and reused
/// across every fold step.
#[derive(Debug)]
pub struct Ruleset {
    rules: Vec<CompiledRule>,
}

impl Ruleset {
    /// An empty ruleset; every path resolves to its type default.
    pub fn empty() -> Self {
        Ruleset { rules: Vec::new() }
    }

    /// Normalizes and compiles a rule table. The caller's options are not
    /// mutated.
    pub fn compile(options: &MergeOptions) -> Result<Self, MergeError> {
        let mut rules = Vec::with_capacity(options.rules.len());
        for (key, action) in &options.rules {
            let pattern = normalize_pattern(key);
            let glob = GlobBuilder::new(&pattern)
                .literal_separator(true)
                .backslash_escape(true)
                .build()
                .map_err(|source| MergeError::InvalidPattern {
                    pattern: key.clone(),
                    source,
                })?;
            rules.push(CompiledRule {
                matcher: glob.compile_matcher(),
                action: populate(action),
            });
        }
        Ok(Ruleset { rules })
    }

    /// Returns the action of the first rule (in table order) whose pattern
    /// matches `path`, or `None` when the type default applies.
    pub fn resolve(&self, path: &Path) -> Option<&ResolvedAction> {
        self.rules
            .iter()
            .find(|rule| rule.matcher.is_match(path.as_str()))
            .map(|rule| &rule.action)
    }

    /// The default sequence action used when a sequence path resolves to
    /// nothing, or to a bare tag that carries no configuration.
    pub fn default_sequence_action() -> &'static SequenceAction {
        &DEFAULT_SEQUENCE_ACTION
    }
}

/// Rewrites an authored rule key into a `/`-delimited pattern: a leading
/// `$` or `$.` becomes `/`, every `.` becomes `/`, and the literal `[]`
/// sequence suffix is escaped so the glob parser does not read it as a
/// character class.
fn normalize_pattern(key: &str) -> String {
    let rooted = if let Some(rest) = key.strip_prefix("$.") {
        format!("/{rest}")
    } else if let Some(rest) = key.strip_prefix('$') {
        format!("/{rest}")
    } else {
        key.to_string()
    };
    rooted.replace('.', "/").replace("[]", "\\[\\]")
}

/// Fills the defaults into a sequence action so downstream consumers get a
/// fully-populated one. Tag actions pass through unchanged.
fn populate(action: &MergeAction) -> ResolvedAction {
    match action {
        MergeAction::Merge => ResolvedAction::Merge,
        MergeAction::Replace => ResolvedAction::Replace,
        MergeAction::Sequence(rule) => ResolvedAction::Sequence(SequenceAction {
            match_fn: match &rule.match_with {
                ElementMatch::Default => Some(DEFAULT_MATCH.clone()),
                ElementMatch::Disabled => None,
                ElementMatch::Custom(f) => Some(f.clone()),
            },
            matched: rule.matched.unwrap_or(MatchedAction::Merge),
            not_matched: rule.not_matched.unwrap_or(Placement::Append),
        }),
    }
}
