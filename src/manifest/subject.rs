//! Subjects (topics) of a publication.

use crate::json::{self, FromJson, JsonError, JsonObject, ToJson};
use crate::manifest::link::{Link, links_to_json};
use crate::manifest::locale::LocalizedString;
use crate::warning::WarningLogger;
use serde_json::Value;

/// A subject the publication is about, from a controlled vocabulary or free
/// text.
#[derive(Clone, Debug, PartialEq)]
pub struct Subject {
    /// Name of the subject, possibly localized.
    pub name: LocalizedString,
    /// String used to sort the name.
    pub sort_as: Option<String>,
    /// Vocabulary the subject code belongs to (e.g., a BISAC/Thema URI).
    pub scheme: Option<String>,
    /// Code of the subject within its scheme.
    pub code: Option<String>,
    /// Related links (e.g., a catalog search for the subject).
    pub links: Vec<Link>,
}

impl Subject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: LocalizedString::nonlocalized(name),
            sort_as: None,
            scheme: None,
            code: None,
            links: Vec::new(),
        }
    }
}

impl FromJson for Subject {
    const MODEL: &'static str = "Subject";

    fn from_json(value: &Value, warnings: &mut dyn WarningLogger) -> Result<Self, JsonError> {
        match value {
            Value::String(name) => Ok(Self::new(name.clone())),
            Value::Object(object) => {
                let name = object
                    .get("name")
                    .ok_or(JsonError::Parsing(Self::MODEL))
                    .and_then(|name| LocalizedString::from_json(name, warnings))?;

                Ok(Self {
                    name,
                    sort_as: json::parse_string(object.get("sortAs")),
                    scheme: json::parse_string(object.get("scheme")),
                    code: json::parse_string(object.get("code")),
                    links: json::parse_array(object.get("links"), warnings, false),
                })
            }
            _ => Err(JsonError::Parsing(Self::MODEL)),
        }
    }
}

impl ToJson for Subject {
    fn to_json(&self) -> Value {
        let mut object = JsonObject::new();
        object.insert("name".to_owned(), self.name.to_json());
        json::encode_if_not_nil(&mut object, "sortAs", self.sort_as.clone().map(Value::String));
        json::encode_if_not_nil(&mut object, "scheme", self.scheme.clone().map(Value::String));
        json::encode_if_not_nil(&mut object, "code", self.code.clone().map(Value::String));
        json::encode_if_not_empty(&mut object, "links", links_to_json(&self.links));
        Value::Object(object)
    }
}
