//! Links between publication resources.

use crate::href::{Url, UriTemplate};
use crate::json::{self, FromJson, JsonError, JsonObject, ToJson};
use crate::manifest::properties::Properties;
use crate::mediatype::MediaType;
use crate::warning::WarningLogger;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// A link relation, compared case-insensitively.
///
/// Normalized to lowercase at construction so membership tests never need to
/// fold case again.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct LinkRelation(String);

impl LinkRelation {
    pub const SELF: &'static str = "self";
    pub const ALTERNATE: &'static str = "alternate";
    pub const COVER: &'static str = "cover";
    pub const CONTENTS: &'static str = "contents";
    pub const SEARCH: &'static str = "search";

    pub fn new(relation: impl AsRef<str>) -> Self {
        Self(relation.as_ref().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for LinkRelation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<str> for LinkRelation {
    fn eq(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

/// A link to a resource, possibly through a URI template.
///
/// `alternates` and `children` form finite trees: the parser never re-links a
/// node to one of its ancestors.
///
/// # Examples
/// ```
/// use webpub::href::Url;
/// use webpub::manifest::Link;
///
/// let link = Link::new("chapter1.xhtml");
/// let base = Url::from_href("https://example.com/book/manifest.json");
///
/// assert_eq!(
///     "https://example.com/book/chapter1.xhtml",
///     link.url_relative_to(Some(&base), &Default::default()).to_string(),
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    /// URI or URI template pointing to the resource.
    pub href: String,
    /// Media type of the linked resource.
    pub media_type: Option<MediaType>,
    /// Whether `href` is a URI template requiring expansion before use.
    pub templated: bool,
    /// Title of the linked resource.
    pub title: Option<String>,
    /// Relations between the resource and its containing collection,
    /// in declaration order, deduplicated case-insensitively.
    pub rels: Vec<LinkRelation>,
    /// Open property bag.
    pub properties: Properties,
    /// Height of the resource in pixels.
    pub height: Option<u64>,
    /// Width of the resource in pixels.
    pub width: Option<u64>,
    /// Bitrate of the resource in kbps.
    pub bitrate: Option<f64>,
    /// Duration of the resource in seconds.
    pub duration: Option<f64>,
    /// Languages of the resource (BCP 47 tags).
    pub languages: Vec<String>,
    /// Alternate renditions of the resource.
    pub alternates: Vec<Link>,
    /// Resources belonging to the linked resource.
    pub children: Vec<Link>,
}

impl Link {
    /// A minimal link with only an `href`.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            media_type: None,
            templated: false,
            title: None,
            rels: Vec::new(),
            properties: Properties::default(),
            height: None,
            width: None,
            bitrate: None,
            duration: None,
            languages: Vec::new(),
            alternates: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Whether the link declares the given relation (case-insensitive).
    pub fn has_rel(&self, relation: &str) -> bool {
        self.rels.iter().any(|rel| rel == relation)
    }

    /// The URL of the link, normalized but not resolved against any base.
    ///
    /// A templated `href` is expanded with `parameters` first; variables
    /// without a matching parameter are removed. An empty result becomes
    /// `"#"`.
    pub fn url(&self, parameters: &BTreeMap<String, String>) -> Url {
        let href = if self.templated {
            UriTemplate::new(self.href.as_str()).expand(parameters)
        } else {
            self.href.clone()
        };
        let href = if href.is_empty() { "#" } else { href.as_str() };
        Url::from_href(href).normalized()
    }

    /// The URL of the link resolved against `base`, when one is given.
    pub fn url_relative_to(&self, base: Option<&Url>, parameters: &BTreeMap<String, String>) -> Url {
        let url = self.url(parameters);
        match base {
            Some(base) => base.resolve(&url),
            None => url,
        }
    }
}

impl FromJson for Link {
    const MODEL: &'static str = "Link";

    /// `href` is required; a link without one fails to parse (and is dropped
    /// with a warning when inside an array).
    fn from_json(value: &Value, warnings: &mut dyn WarningLogger) -> Result<Self, JsonError> {
        let object = json::as_object(value, Self::MODEL)?;
        let href = json::parse_string(object.get("href"))
            .filter(|href| !href.is_empty())
            .ok_or(JsonError::Parsing(Self::MODEL))?;

        let mut rels = Vec::new();
        for relation in json::parse_string_array(object.get("rel")) {
            let relation = LinkRelation::new(relation);
            if !rels.contains(&relation) {
                rels.push(relation);
            }
        }

        Ok(Self {
            href,
            media_type: json::parse_string(object.get("type"))
                .as_deref()
                .and_then(MediaType::parse),
            templated: json::parse_bool(object.get("templated"), false),
            title: json::parse_string(object.get("title")),
            rels,
            properties: object
                .get("properties")
                .and_then(Value::as_object)
                .cloned()
                .map(Properties::new)
                .unwrap_or_default(),
            height: json::parse_positive(object.get("height")),
            width: json::parse_positive(object.get("width")),
            bitrate: json::parse_positive_double(object.get("bitrate")),
            duration: json::parse_positive_double(object.get("duration")),
            languages: json::parse_string_array(object.get("language")),
            alternates: json::parse_array(object.get("alternate"), warnings, false),
            children: json::parse_array(object.get("children"), warnings, false),
        })
    }
}

impl ToJson for Link {
    fn to_json(&self) -> Value {
        let mut object = JsonObject::new();
        object.insert("href".to_owned(), Value::String(self.href.clone()));
        json::encode_if_not_nil(
            &mut object,
            "type",
            self.media_type
                .as_ref()
                .map(|media_type| Value::String(media_type.as_str().to_owned())),
        );
        if self.templated {
            object.insert("templated".to_owned(), Value::Bool(true));
        }
        json::encode_if_not_nil(&mut object, "title", self.title.clone().map(Value::String));
        json::encode_if_not_empty(
            &mut object,
            "rel",
            Value::Array(
                self.rels
                    .iter()
                    .map(|rel| Value::String(rel.as_str().to_owned()))
                    .collect(),
            ),
        );
        json::encode_if_not_empty(&mut object, "properties", self.properties.to_json());
        json::encode_if_not_nil(&mut object, "height", self.height.map(Value::from));
        json::encode_if_not_nil(&mut object, "width", self.width.map(Value::from));
        json::encode_if_not_nil(&mut object, "bitrate", self.bitrate.map(Value::from));
        json::encode_if_not_nil(&mut object, "duration", self.duration.map(Value::from));
        json::encode_if_not_empty(
            &mut object,
            "language",
            Value::Array(self.languages.iter().cloned().map(Value::String).collect()),
        );
        json::encode_if_not_empty(&mut object, "alternate", links_to_json(&self.alternates));
        json::encode_if_not_empty(&mut object, "children", links_to_json(&self.children));
        Value::Object(object)
    }
}

/// Encodes a list of links, omitting nothing.
pub(crate) fn links_to_json(links: &[Link]) -> Value {
    Value::Array(links.iter().map(Link::to_json).collect())
}

/// Depth-first search through links and, recursively, their alternates and
/// children.
pub(crate) fn find_link_deep<'a>(
    links: &'a [Link],
    predicate: &impl Fn(&Link) -> bool,
) -> Option<&'a Link> {
    for link in links {
        if predicate(link) {
            return Some(link);
        }
        if let Some(found) = find_link_deep(&link.alternates, predicate)
            .or_else(|| find_link_deep(&link.children, predicate))
        {
            return Some(found);
        }
    }
    None
}
