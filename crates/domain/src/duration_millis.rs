//! Serde helper that stores a [`Duration`] as whole milliseconds.
//!
//! Use with `#[serde(with = "relay_domain::duration_millis")]`.

use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

/// Serializes a duration as an integer number of milliseconds.
///
/// # Errors
///
/// Propagates serializer errors.
#[allow(clippy::cast_possible_truncation)]
pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Deserializes a duration from an integer number of milliseconds.
///
/// # Errors
///
/// Fails if the value is not an unsigned integer.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = u64::deserialize(deserializer)?;
    Ok(Duration::from_millis(millis))
}
