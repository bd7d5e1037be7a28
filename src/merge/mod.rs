//! Merge module - Value dispatch and the public merge entry points.

mod engine;

#[cfg(test)]
mod merge_test;

pub use engine::*;
