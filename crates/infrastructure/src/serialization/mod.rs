//! Deterministic JSON serialization for stored files.
//!
//! Output uses 2-space indentation and ends with a trailing newline so that
//! files diff cleanly.

mod json;

pub use json::{SerializationError, from_json, from_json_bytes, to_json_stable, to_json_stable_bytes};
