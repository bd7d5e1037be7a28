//! Value module - In-memory representation of JSON/YAML values.
//!
//! Classification is structural: a value is a record, a sequence, or a
//! scalar, and the merge engine dispatches on nothing else.

mod value;

pub use value::*;
