//! Internal serde helpers shared by the request and response wire types.
//!
//! The service is loose about its JSON: fields that are normally arrays or objects show up as
//! `null`, error lists mix strings and objects, and legacy payloads put raw JSON where a string
//! is expected. These helpers absorb that looseness at the deserialization boundary so the
//! public types can stay plain `String`/`Vec` values.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes a field that may be `null`, substituting `T::default()`.
///
/// Pair with `#[serde(default)]` so a missing field behaves the same as an explicit `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserializes the response shell's `errors` list.
///
/// Entries may be plain strings or `{"code": .., "message": ..}` objects. Objects are reduced
/// to their `message` text when it is a string, otherwise to their compact JSON text.
pub(crate) fn error_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .map(|entry| match entry {
            Value::Object(ref obj) => match obj.get("message") {
                Some(Value::String(message)) => message.clone(),
                _ => entry.to_string(),
            },
            other => json_text(other),
        })
        .collect())
}

/// Deserializes any JSON value into its text form via [`json_text`].
///
/// An explicit `null` becomes the literal text `"null"`.
pub(crate) fn text_or_json<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(json_text)
}

/// Returns a JSON string's contents, or the compact serialization of any other value.
pub(crate) fn json_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

/// Skip predicate for optional floats: unset and zero are both omitted.
pub(crate) fn is_unset_f64(value: &Option<f64>) -> bool {
    value.is_none_or(|v| v == 0.0)
}

/// Skip predicate for optional integers: unset and zero are both omitted.
pub(crate) fn is_unset_u32(value: &Option<u32>) -> bool {
    value.is_none_or(|v| v == 0)
}
