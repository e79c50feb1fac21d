//! Open-ended link properties and their typed projections.

use crate::json::{self, JsonObject, ToJson};
use serde_json::Value;

/// The open string-keyed property bag attached to a link.
///
/// Typed accessors are a thin projection over the raw JSON; unknown
/// properties survive round-trips untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Properties(JsonObject);

impl Properties {
    pub fn new(properties: JsonObject) -> Self {
        Self(properties)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw value of a property.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// A property decoded as a string.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Inserts or replaces a property, returning the updated bag.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// The encryption declaration of the resource, when present and valid.
    pub fn encryption(&self) -> Option<Encryption> {
        Encryption::from_json(self.0.get("encryption")?)
    }
}

impl From<JsonObject> for Properties {
    fn from(properties: JsonObject) -> Self {
        Self(properties)
    }
}

impl ToJson for Properties {
    fn to_json(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// How a resource is encrypted, per the `encryption` link property.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Encryption {
    /// Identifies the encryption algorithm (URI).
    pub algorithm: String,
    /// Identifies the protection scheme (e.g., LCP).
    pub scheme: Option<String>,
    /// Compression applied to the resource before encryption.
    pub compression: Option<String>,
    /// Length of the resource in bytes before compression and encryption.
    pub original_length: Option<u64>,
    /// Encryption profile, when the scheme defines several.
    pub profile: Option<String>,
}

impl Encryption {
    /// `algorithm` is required; a declaration without one is ignored.
    fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            algorithm: json::parse_string(object.get("algorithm"))?,
            scheme: json::parse_string(object.get("scheme")),
            compression: json::parse_string(object.get("compression")),
            original_length: json::parse_positive(object.get("originalLength")),
            profile: json::parse_string(object.get("profile")),
        })
    }

    /// Whether the resource was deflate-compressed before encryption.
    pub fn is_deflated(&self) -> bool {
        self.compression.as_deref() == Some("deflate")
    }
}

impl ToJson for Encryption {
    fn to_json(&self) -> Value {
        let mut object = JsonObject::new();
        object.insert("algorithm".to_owned(), Value::String(self.algorithm.clone()));
        json::encode_if_not_nil(
            &mut object,
            "scheme",
            self.scheme.clone().map(Value::String),
        );
        json::encode_if_not_nil(
            &mut object,
            "compression",
            self.compression.clone().map(Value::String),
        );
        json::encode_if_not_nil(
            &mut object,
            "originalLength",
            self.original_length.map(Value::from),
        );
        json::encode_if_not_nil(
            &mut object,
            "profile",
            self.profile.clone().map(Value::String),
        );
        Value::Object(object)
    }
}
