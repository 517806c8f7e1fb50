//! Field projection for responses.
//!
//! A repeatable `properties[]` query parameter narrows a response object to
//! the requested readable fields. The record identity is always kept, and
//! names that are unknown or not readable are silently ignored.

use serde::Serialize;
use serde_json::Value;

use crate::models::FieldPolicy;

/// Collect the values of every `properties[]` parameter, in order.
#[must_use]
pub fn requested_properties(params: &[(String, String)]) -> Vec<String> {
    params
        .iter()
        .filter(|(key, _)| key == "properties[]")
        .map(|(_, value)| value.clone())
        .collect()
}

/// Serialize `item` and, when properties were requested, strip the object
/// down to those readable fields plus `id`.
///
/// # Errors
///
/// Returns the underlying `serde_json` error if `item` fails to serialize.
pub fn project<T: Serialize>(
    item: &T,
    properties: &[String],
    policies: &[FieldPolicy],
) -> Result<Value, serde_json::Error> {
    let value = serde_json::to_value(item)?;
    if properties.is_empty() {
        return Ok(value);
    }

    let Value::Object(map) = value else {
        return Ok(value);
    };

    let projected = map
        .into_iter()
        .filter(|(name, _)| name == "id" || is_requested_readable(name, properties, policies))
        .collect();
    Ok(Value::Object(projected))
}

fn is_requested_readable(name: &str, properties: &[String], policies: &[FieldPolicy]) -> bool {
    properties.iter().any(|p| p == name)
        && policies
            .iter()
            .any(|policy| policy.name == name && policy.readable)
}
