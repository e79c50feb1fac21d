//! The Readium Web Publication Manifest model.
//!
//! All types decode from RWPM JSON tolerantly (malformed array entries are
//! dropped with a warning, structurally required fields fail the node's
//! parse) and encode back omitting empty fields. Values are immutable in
//! spirit: "mutation" is producing an updated copy, with the sole exception
//! of [`Manifest::links`] used for `self`-link injection at publication
//! build time.

mod accessibility;
mod collection;
mod contributor;
mod link;
mod locale;
mod metadata;
mod properties;
mod subject;
pub mod transform;

pub use accessibility::{Accessibility, Certification};
pub use collection::{PublicationCollection, Subcollections};
pub use contributor::Contributor;
pub use link::{Link, LinkRelation};
pub use locale::LocalizedString;
pub use metadata::{
    BelongsTo, Layout, Metadata, Profile, ReadingProgression, Tdm, TdmReservation,
};
pub use properties::{Encryption, Properties};
pub use subject::Subject;

use crate::href::Url;
use crate::json::{self, FromJson, JsonError, JsonObject, ToJson};
use crate::manifest::collection::{encode_subcollections, subcollections_from_json};
use crate::manifest::link::{find_link_deep, links_to_json};
use crate::manifest::transform::HrefNormalizer;
use crate::warning::{NoopWarningLogger, Severity, WarningLogger, warn};
use serde_json::Value;

/// Role of the sub-collection surfaced as the table of contents.
const TOC_ROLE: &str = "toc";

/// The manifest of a web publication: its metadata plus the resource graph.
///
/// # Examples
/// ```
/// use webpub::manifest::{Manifest, Profile};
///
/// let manifest = Manifest::from_json(&serde_json::json!({
///     "metadata": { "title": "Moby-Dick" },
///     "links": [
///         { "rel": "self", "href": "https://example.com/manifest.json",
///           "type": "application/webpub+json" },
///     ],
///     "readingOrder": [
///         { "href": "c1.xhtml", "type": "application/xhtml+xml" },
///         { "href": "c2.xhtml", "type": "application/xhtml+xml" },
///     ],
/// })).unwrap();
///
/// assert_eq!("Moby-Dick", manifest.metadata.title.string());
/// // HREFs were normalized against the `self` link.
/// assert_eq!("https://example.com/c1.xhtml", manifest.reading_order[0].href);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Manifest {
    /// JSON-LD context URIs, in declaration order.
    pub context: Vec<String>,
    pub metadata: Metadata,
    /// Manifest-level links (including `self`).
    pub links: Vec<Link>,
    /// The linear, ordered reading sequence. Order is significant and never
    /// re-sorted; every entry carries a media type.
    pub reading_order: Vec<Link>,
    /// Resources needed to render the reading order, in no particular order.
    pub resources: Vec<Link>,
    /// Additional link collections, keyed by role (e.g., `toc`, `landmarks`).
    pub subcollections: Subcollections,
}

impl Manifest {
    pub fn new(metadata: Metadata) -> Self {
        Self {
            context: Vec::new(),
            metadata,
            links: Vec::new(),
            reading_order: Vec::new(),
            resources: Vec::new(),
            subcollections: Subcollections::new(),
        }
    }

    /// Decodes a remote (non-packaged) manifest, ignoring warnings.
    pub fn from_json(value: &Value) -> Result<Self, JsonError> {
        Self::from_json_with(value, false, &mut NoopWarningLogger)
    }

    /// Decodes a manifest.
    ///
    /// When `packaged`, HREFs are normalized against the archive root `/` and
    /// any declared `self` link is demoted to `alternate` (a packaged
    /// manifest cannot assert its own external location). Otherwise the base
    /// is taken from the manifest's own `self` link, when present.
    pub fn from_json_with(
        value: &Value,
        packaged: bool,
        warnings: &mut dyn WarningLogger,
    ) -> Result<Self, JsonError> {
        let mut object = json::as_object(value, Self::MODEL)?.clone();

        let context = json::parse_string_array(object.remove("@context").as_ref());
        let metadata = object
            .remove("metadata")
            .ok_or(JsonError::Parsing(Self::MODEL))
            .and_then(|metadata| Metadata::from_json(&metadata, warnings))?;
        let mut links: Vec<Link> = json::parse_array(object.remove("links").as_ref(), warnings, false);

        // `spine` is the legacy name of `readingOrder`.
        let reading_order_json = object
            .remove("readingOrder")
            .or_else(|| object.remove("spine"));
        let reading_order =
            parse_typed_links(reading_order_json.as_ref(), "readingOrder", warnings);
        let resources = parse_typed_links(object.remove("resources").as_ref(), "resources", warnings);

        let subcollections = subcollections_from_json(object, warnings);

        let base = if packaged {
            for link in &mut links {
                for rel in &mut link.rels {
                    if *rel == *LinkRelation::SELF {
                        *rel = LinkRelation::new(LinkRelation::ALTERNATE);
                    }
                }
            }
            Some(Url::from_href("/"))
        } else {
            links
                .iter()
                .find(|link| link.has_rel(LinkRelation::SELF) && !link.templated)
                .map(|link| link.url(&Default::default()))
        };

        let mut manifest = Self {
            context,
            metadata,
            links,
            reading_order,
            resources,
            subcollections,
        };
        if let Some(base) = base {
            let mut normalizer = HrefNormalizer::new(base, warnings);
            transform::transform(&mut manifest, &mut normalizer);
        }
        Ok(manifest)
    }

    const MODEL: &'static str = "Manifest";

    /// The links of the `toc` sub-collection, or an empty slice.
    pub fn table_of_contents(&self) -> &[Link] {
        self.subcollections
            .get(TOC_ROLE)
            .and_then(|collections| collections.first())
            .map(|collection| collection.links.as_slice())
            .unwrap_or(&[])
    }

    /// Finds the first link matching the given HREF.
    ///
    /// Searches `readingOrder`, then `resources`, then `links`, recursing
    /// into alternates and children. An exact match is tried first; on
    /// failure the comparison is retried once with queries and fragments
    /// stripped on both sides.
    pub fn link_with_href(&self, href: &str) -> Option<&Link> {
        self.find_link(&|link| link.href == href).or_else(|| {
            let target = strip_query_and_fragment(href);
            self.find_link(&|link| strip_query_and_fragment(&link.href) == target)
        })
    }

    /// Finds the first link with the given relation (case-insensitive).
    pub fn link_with_rel(&self, rel: &str) -> Option<&Link> {
        self.find_link(&|link| link.has_rel(rel))
    }

    /// All links with the given relation, in `readingOrder`, `resources`,
    /// `links` priority order.
    pub fn links_with_rel(&self, rel: &str) -> Vec<&Link> {
        [&self.reading_order, &self.resources, &self.links]
            .into_iter()
            .flatten()
            .filter(|link| link.has_rel(rel))
            .collect()
    }

    fn find_link(&self, predicate: &impl Fn(&Link) -> bool) -> Option<&Link> {
        find_link_deep(&self.reading_order, predicate)
            .or_else(|| find_link_deep(&self.resources, predicate))
            .or_else(|| find_link_deep(&self.links, predicate))
    }

    /// Whether the publication conforms to the given profile.
    ///
    /// A manifest with an empty reading order conforms to nothing. The four
    /// built-in profiles are checked structurally against the reading order's
    /// media types rather than trusting `conformsTo` alone; EPUB additionally
    /// requires a declared conformance, since "all resources are HTML" is
    /// ambiguous with generic web publications. Any other profile is matched
    /// by exact URI against the declared set.
    pub fn conforms_to(&self, profile: &Profile) -> bool {
        if self.reading_order.is_empty() {
            return false;
        }
        let all = |predicate: fn(&crate::mediatype::MediaType) -> bool| {
            self.reading_order
                .iter()
                .all(|link| link.media_type.as_ref().is_some_and(predicate))
        };

        match profile.as_str() {
            Profile::AUDIOBOOK => all(crate::mediatype::MediaType::is_audio),
            Profile::DIVINA => all(crate::mediatype::MediaType::is_bitmap),
            Profile::EPUB => {
                all(crate::mediatype::MediaType::is_html)
                    && self.metadata.declares_conformance_to(profile)
            }
            Profile::PDF => all(crate::mediatype::MediaType::is_pdf),
            _ => self.metadata.declares_conformance_to(profile),
        }
    }
}

impl ToJson for Manifest {
    fn to_json(&self) -> Value {
        let mut object = JsonObject::new();
        json::encode_if_not_empty(
            &mut object,
            "@context",
            Value::Array(self.context.iter().cloned().map(Value::String).collect()),
        );
        object.insert("metadata".to_owned(), self.metadata.to_json());
        json::encode_if_not_empty(&mut object, "links", links_to_json(&self.links));
        object.insert("readingOrder".to_owned(), links_to_json(&self.reading_order));
        json::encode_if_not_empty(&mut object, "resources", links_to_json(&self.resources));
        encode_subcollections(&mut object, &self.subcollections);
        Value::Object(object)
    }
}

/// Parses `readingOrder`/`resources`, dropping entries without a media type.
fn parse_typed_links(
    value: Option<&Value>,
    field: &'static str,
    warnings: &mut dyn WarningLogger,
) -> Vec<Link> {
    let links: Vec<Link> = json::parse_array(value, warnings, false);
    links
        .into_iter()
        .filter(|link| {
            let typed = link.media_type.is_some();
            if !typed {
                warn(
                    warnings,
                    "Manifest",
                    Severity::Moderate,
                    format!("dropped `{field}` entry without a media type: {}", link.href),
                    None,
                );
            }
            typed
        })
        .collect()
}

fn strip_query_and_fragment(href: &str) -> &str {
    href.find(['#', '?']).map_or(href, |index| &href[..index])
}
