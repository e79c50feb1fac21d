//! Contributors to a publication (authors, translators, publishers, ...).

use crate::json::{self, FromJson, JsonError, JsonObject, ToJson};
use crate::manifest::link::{Link, links_to_json};
use crate::manifest::locale::LocalizedString;
use crate::warning::WarningLogger;
use serde_json::Value;

/// A person or organization credited with a role in the publication.
///
/// The JSON form may be a bare name string or a full object; both decode to
/// the same model.
#[derive(Clone, Debug, PartialEq)]
pub struct Contributor {
    /// Name of the contributor, possibly localized.
    pub name: LocalizedString,
    /// String used to sort the name.
    pub sort_as: Option<String>,
    /// Identifier of the contributor (e.g., an ISNI URI).
    pub identifier: Option<String>,
    /// Roles of the contributor in the making of the publication.
    pub roles: Vec<String>,
    /// Position of the publication in the collection this contributor
    /// stands for (used by `belongsTo` series/collections).
    pub position: Option<f64>,
    /// Related links (e.g., the contributor's homepage).
    pub links: Vec<Link>,
}

impl Contributor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: LocalizedString::nonlocalized(name),
            sort_as: None,
            identifier: None,
            roles: Vec::new(),
            position: None,
            links: Vec::new(),
        }
    }
}

impl FromJson for Contributor {
    const MODEL: &'static str = "Contributor";

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
                    identifier: json::parse_string(object.get("identifier")),
                    roles: json::parse_string_array(object.get("role")),
                    position: json::parse_double(object.get("position")),
                    links: json::parse_array(object.get("links"), warnings, false),
                })
            }
            _ => Err(JsonError::Parsing(Self::MODEL)),
        }
    }
}

impl ToJson for Contributor {
    fn to_json(&self) -> Value {
        let mut object = JsonObject::new();
        object.insert("name".to_owned(), self.name.to_json());
        json::encode_if_not_nil(&mut object, "sortAs", self.sort_as.clone().map(Value::String));
        json::encode_if_not_nil(
            &mut object,
            "identifier",
            self.identifier.clone().map(Value::String),
        );
        json::encode_if_not_empty(
            &mut object,
            "role",
            Value::Array(self.roles.iter().cloned().map(Value::String).collect()),
        );
        json::encode_if_not_nil(&mut object, "position", self.position.map(Value::from));
        json::encode_if_not_empty(&mut object, "links", links_to_json(&self.links));
        Value::Object(object)
    }
}

/// Decodes a contributor field holding a single name/object or an array of
/// them, dropping malformed entries with a warning.
pub(crate) fn parse_contributors(
    value: Option<&Value>,
    warnings: &mut dyn WarningLogger,
) -> Vec<Contributor> {
    json::parse_array(value, warnings, true)
}

/// Encodes a contributor list.
pub(crate) fn contributors_to_json(contributors: &[Contributor]) -> Value {
    Value::Array(contributors.iter().map(Contributor::to_json).collect())
}
