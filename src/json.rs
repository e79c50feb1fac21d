//! Tolerant-but-typed JSON helpers shared by every model type.
//!
//! The decode contract is deliberately forgiving: a present-but-malformed
//! *required* value fails that node's parse with a typed [`JsonError`], while
//! malformed entries inside arrays are dropped with a warning so one bad
//! value never takes down the containing collection.

use crate::warning::{Severity, WarningLogger, warn};
use serde_json::{Map, Value};

/// A JSON object keyed by strings, as found throughout RWPM documents.
pub type JsonObject = Map<String, Value>;

/// Fatal JSON decode errors, typed by the offending model.
#[derive(thiserror::Error, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum JsonError {
    /// A node required by the named model's invariants is absent or has the
    /// wrong shape.
    #[error("invalid JSON for `{0}`")]
    Parsing(&'static str),
}

/// Decode contract implemented by every model type.
pub trait FromJson: Sized {
    /// Model name used in errors and warnings.
    const MODEL: &'static str;

    /// Decodes a value, reporting recoverable issues to `warnings`.
    fn from_json(value: &Value, warnings: &mut dyn WarningLogger) -> Result<Self, JsonError>;
}

/// Encode contract implemented by every model type.
///
/// Encoding is total: it never fails, and empty/absent fields are omitted to
/// keep round-trips minimal.
pub trait ToJson {
    fn to_json(&self) -> Value;
}

/// Requires `value` to be a JSON object, failing with the model's name.
pub(crate) fn as_object<'a>(
    value: &'a Value,
    model: &'static str,
) -> Result<&'a JsonObject, JsonError> {
    value.as_object().ok_or(JsonError::Parsing(model))
}

/// Decodes a string field; non-string values yield `None`.
pub(crate) fn parse_string(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_owned)
}

pub(crate) fn parse_bool(value: Option<&Value>, default: bool) -> bool {
    value.and_then(Value::as_bool).unwrap_or(default)
}

/// Decodes a non-negative integer; negative or non-numeric values yield
/// `None` rather than an error.
pub(crate) fn parse_positive(value: Option<&Value>) -> Option<u64> {
    match value {
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|n| *n >= 0.0).map(|n| n as u64)),
        _ => None,
    }
}

/// Decodes a non-negative float; negative or non-numeric values yield `None`.
pub(crate) fn parse_positive_double(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64).filter(|n| *n >= 0.0)
}

pub(crate) fn parse_double(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}

/// Decodes a field that may hold either a single string or an array of
/// strings. Non-string array entries are skipped.
pub(crate) fn parse_string_array(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(string)) => vec![string.clone()],
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

/// Decodes an array of model values, dropping malformed entries with a
/// warning instead of failing the whole array.
///
/// When `allow_single` is set, a bare object/string is accepted as a
/// one-element array, per the RWPM convention for singular fields.
pub(crate) fn parse_array<T: FromJson>(
    value: Option<&Value>,
    warnings: &mut dyn WarningLogger,
    allow_single: bool,
) -> Vec<T> {
    let values: &[Value] = match value {
        Some(Value::Array(values)) => values,
        Some(single) if allow_single => std::slice::from_ref(single),
        _ => return Vec::new(),
    };

    values
        .iter()
        .filter_map(|entry| match T::from_json(entry, warnings) {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                warn(
                    warnings,
                    T::MODEL,
                    Severity::Moderate,
                    format!("dropped malformed entry: {entry}"),
                    Some(entry),
                );
                None
            }
        })
        .collect()
}

/// Inserts `value` unless it is `None`.
pub(crate) fn encode_if_not_nil(object: &mut JsonObject, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        object.insert(key.to_owned(), value);
    }
}

/// Inserts `value` unless it is null, an empty string, an empty array or an
/// empty object.
pub(crate) fn encode_if_not_empty(object: &mut JsonObject, key: &str, value: Value) {
    let empty = match &value {
        Value::Null => true,
        Value::String(string) => string.is_empty(),
        Value::Array(values) => values.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if !empty {
        object.insert(key.to_owned(), value);
    }
}
