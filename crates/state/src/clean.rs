//! Deep cleanup of values before transmission.

use serde_json::Value;

/// How a value is prepared before it is sent to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanPolicy {
    /// Send the value exactly as it serializes.
    #[default]
    Keep,
    /// Recursively drop object fields whose value is `null`, for
    /// backends that reject explicit nulls.
    StripNulls,
}

/// Recursively remove object fields whose value is `null`.
///
/// Array elements are never removed and keep their order; objects
/// nested inside arrays are still cleaned. Scalars pass through
/// unchanged, including a bare `null`.
pub fn strip_null_fields(value: Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .filter(|(_, field)| !field.is_null())
                .map(|(key, field)| (key, strip_null_fields(field)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_null_fields).collect()),
        other => other,
    }
}
