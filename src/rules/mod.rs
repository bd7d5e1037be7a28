//! Rules module - Merge actions, options, and the compiled rule table.
//!
//! Rules map glob-style path patterns to merge actions; the first pattern
//! (in table order) that matches a path wins.

mod action;
mod ruleset;

pub use action::*;
pub use ruleset::*;
