//! The merge engine: value dispatch, record merging, and sequence merging.

use crate::path::Path;
use crate::rules::{
    MatchedAction, MergeError, MergeOptions, Placement, ResolvedAction, Ruleset,
};
use crate::value::{Map, Value};

/// Merges `src` into `dest` with default rules.
///
/// Records merge key-by-key, sequences merge with equality matching and
/// appended leftovers, and everything else (scalars, nulls, mismatched
/// shapes) is replaced by `src`. The destination is consumed and returned;
/// mutation in place is expressed through ownership.
pub fn merge(dest: Value, src: Value) -> Value {
    merge_pair(dest, src, &Ruleset::empty())
}

/// Merges `src` into `dest` under a rule table.
///
/// The table is normalized and compiled once; the only failure is a rule
/// key that does not compile to a valid glob pattern.
pub fn merge_with(dest: Value, src: Value, options: &MergeOptions) -> Result<Value, MergeError> {
    let rules = Ruleset::compile(options)?;
    Ok(merge_pair(dest, src, &rules))
}

/// Left-folds pairwise merge across `values` with default rules.
///
/// Returns `None` for an empty input and the sole element unchanged for a
/// single-element input.
pub fn merge_all(values: impl IntoIterator<Item = Value>) -> Option<Value> {
    fold(values, &Ruleset::empty())
}

/// Left-folds pairwise merge across `values` under a rule table.
///
/// The table is compiled exactly once and reused across every fold step.
pub fn merge_all_with(
    values: impl IntoIterator<Item = Value>,
    options: &MergeOptions,
) -> Result<Option<Value>, MergeError> {
    let rules = Ruleset::compile(options)?;
    Ok(fold(values, &rules))
}

fn fold(values: impl IntoIterator<Item = Value>, rules: &Ruleset) -> Option<Value> {
    let mut iter = values.into_iter();
    let mut acc = iter.next()?;
    for next in iter {
        acc = merge_pair(acc, next, rules);
    }
    Some(acc)
}

fn merge_pair(dest: Value, src: Value, rules: &Ruleset) -> Value {
    let root = Path::root_for(&dest);
    combine(dest, src, &root, rules)
}

/// Classifies the operands and picks a merge strategy. This is the single
/// recursion point; both mergers call back into it for nested values.
fn combine(dest: Value, src: Value, path: &Path, rules: &Ruleset) -> Value {
    match (dest, src) {
        (Value::Map(dest), Value::Map(src)) => merge_records(dest, src, path, rules),
        (Value::List(dest), Value::List(src)) => merge_sequences(dest, src, path, rules),
        // Non-mergeable destinations and mismatched shapes: source wins.
        (_, src) => src,
    }
}

fn merge_records(mut dest: Map, src: Map, path: &Path, rules: &Ruleset) -> Value {
    // A sequence action resolved at a record path contributes only its
    // `matched` field; a bare `replace` tag discards the destination
    // outright.
    let replace = match rules.resolve(path) {
        Some(ResolvedAction::Replace) => true,
        Some(ResolvedAction::Sequence(action)) => action.matched == MatchedAction::Replace,
        Some(ResolvedAction::Merge) | None => false,
    };
    if replace {
        return Value::Map(src);
    }

    for (key, src_value) in src {
        let child = path.key(&key);
        if let Some(existing) = dest.get_mut(&key) {
            let current = std::mem::take(existing);
            *existing = combine(current, src_value, &child, rules);
        } else {
            // Nothing to merge against; copy the source value directly.
            dest.set(key, src_value);
        }
    }
    Value::Map(dest)
}

fn merge_sequences(mut dest: Vec<Value>, src: Vec<Value>, path: &Path, rules: &Ruleset) -> Value {
    let action = match rules.resolve(path) {
        Some(ResolvedAction::Replace) => return Value::List(src),
        Some(ResolvedAction::Sequence(action)) => action,
        // A bare tag carries no match/placement configuration.
        Some(ResolvedAction::Merge) | None => Ruleset::default_sequence_action(),
    };

    let Some(match_fn) = &action.match_fn else {
        // Elements never match; concatenation is enough, duplicates
        // allowed.
        let combined = match action.not_matched {
            Placement::Prepend => {
                let mut src = src;
                src.extend(dest);
                src
            }
            Placement::Append => {
                dest.extend(src);
                dest
            }
        };
        return Value::List(combined);
    };

    let child = path.elements();
    for src_element in src {
        // Linear scan by predicate, not position, against the destination
        // as mutated so far in this pass.
        let found = dest
            .iter()
            .position(|element| match_fn(element, &src_element));
        match found {
            None => match action.not_matched {
                Placement::Prepend => dest.insert(0, src_element),
                Placement::Append => dest.push(src_element),
            },
            Some(index) => {
                dest[index] = match action.matched {
                    MatchedAction::Replace => src_element,
                    MatchedAction::Merge => {
                        let existing = std::mem::take(&mut dest[index]);
                        combine(existing, src_element, &child, rules)
                    }
                };
            }
        }
    }
    Value::List(dest)
}
