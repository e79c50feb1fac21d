//! Named sub-collections of links within a manifest (table of contents,
//! landmarks, page lists, ...).

use crate::json::{self, FromJson, JsonError, JsonObject, ToJson};
use crate::manifest::link::{Link, links_to_json};
use crate::warning::{Severity, WarningLogger, warn};
use serde_json::Value;
use std::collections::BTreeMap;

/// Role-keyed groups of sub-collections, as attached to a [`Manifest`]
/// (e.g., `toc`, `landmarks`) or nested inside another collection.
///
/// [`Manifest`]: crate::manifest::Manifest
pub type Subcollections = BTreeMap<String, Vec<PublicationCollection>>;

/// A named, possibly nested group of links beyond the primary reading
/// order/resources.
///
/// Collections are trees owned by value; there are no back-references.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PublicationCollection {
    /// Open metadata bag of the collection.
    pub metadata: JsonObject,
    /// Links of the collection. A collection decoded from JSON always holds
    /// at least one link; an empty `links` array is a parse error.
    pub links: Vec<Link>,
    /// Nested sub-collections, keyed by role.
    pub subcollections: Subcollections,
}

impl PublicationCollection {
    pub fn new(links: Vec<Link>) -> Self {
        Self {
            metadata: JsonObject::new(),
            links,
            subcollections: Subcollections::new(),
        }
    }
}

impl FromJson for PublicationCollection {
    const MODEL: &'static str = "PublicationCollection";

    /// Accepts the full object form (`{"metadata":…, "links":…, …}`) as well
    /// as a bare array of links.
    fn from_json(value: &Value, warnings: &mut dyn WarningLogger) -> Result<Self, JsonError> {
        let (metadata, links, subcollections) = match value {
            Value::Array(_) => (
                JsonObject::new(),
                json::parse_array(Some(value), warnings, false),
                Subcollections::new(),
            ),
            Value::Object(object) => {
                let mut object = object.clone();
                let metadata = object
                    .remove("metadata")
                    .and_then(|metadata| match metadata {
                        Value::Object(map) => Some(map),
                        _ => None,
                    })
                    .unwrap_or_default();
                let links = json::parse_array(object.remove("links").as_ref(), warnings, false);
                // Every remaining key is a nested sub-collection role.
                let subcollections = subcollections_from_json(object, warnings);
                (metadata, links, subcollections)
            }
            _ => return Err(JsonError::Parsing(Self::MODEL)),
        };

        // An empty collection is a parse error, not a degenerate success.
        if links.is_empty() {
            return Err(JsonError::Parsing(Self::MODEL));
        }

        Ok(Self {
            metadata,
            links,
            subcollections,
        })
    }
}

impl ToJson for PublicationCollection {
    fn to_json(&self) -> Value {
        let mut object = JsonObject::new();
        json::encode_if_not_empty(&mut object, "metadata", Value::Object(self.metadata.clone()));
        object.insert("links".to_owned(), links_to_json(&self.links));
        encode_subcollections(&mut object, &self.subcollections);
        Value::Object(object)
    }
}

/// Decodes role-keyed sub-collections from the leftover keys of a parent
/// object. Each value may be a single collection or an array of them;
/// malformed values are dropped with a warning.
pub(crate) fn subcollections_from_json(
    roles: JsonObject,
    warnings: &mut dyn WarningLogger,
) -> Subcollections {
    let mut subcollections = Subcollections::new();
    for (role, value) in roles {
        let single = |warnings: &mut dyn WarningLogger| {
            match PublicationCollection::from_json(&value, warnings) {
                Ok(collection) => vec![collection],
                Err(_) => {
                    warn(
                        warnings,
                        PublicationCollection::MODEL,
                        Severity::Moderate,
                        format!("dropped malformed sub-collection `{role}`"),
                        Some(&value),
                    );
                    Vec::new()
                }
            }
        };
        let collections: Vec<PublicationCollection> = match &value {
            // A bare array of links (`"toc": [{"href": …}, …]`) is a single
            // collection; an array of objects without `href` is a list of
            // collections.
            Value::Array(entries)
                if !entries.is_empty()
                    && entries.iter().all(|entry| {
                        entry
                            .as_object()
                            .is_some_and(|object| object.contains_key("href"))
                    }) =>
            {
                single(warnings)
            }
            Value::Array(_) => json::parse_array(Some(&value), warnings, false),
            _ => single(warnings),
        };
        if !collections.is_empty() {
            subcollections.insert(role, collections);
        }
    }
    subcollections
}

/// Encodes sub-collections back into their parent object, one key per role.
/// A single collection is flattened out of its array.
pub(crate) fn encode_subcollections(object: &mut JsonObject, subcollections: &Subcollections) {
    for (role, collections) in subcollections {
        match collections.as_slice() {
            [] => {}
            [single] => {
                object.insert(role.clone(), single.to_json());
            }
            many => {
                object.insert(
                    role.clone(),
                    Value::Array(many.iter().map(PublicationCollection::to_json).collect()),
                );
            }
        }
    }
}
