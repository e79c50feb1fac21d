//! Publication-level metadata.

use crate::json::{self, FromJson, JsonError, JsonObject, ToJson};
use crate::manifest::accessibility::Accessibility;
use crate::manifest::contributor::{Contributor, contributors_to_json, parse_contributors};
use crate::manifest::locale::LocalizedString;
use crate::manifest::subject::Subject;
use crate::warning::WarningLogger;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// A publication profile URI, as declared in `conformsTo`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Profile(String);

impl Profile {
    pub const AUDIOBOOK: &'static str = "https://readium.org/webpub-manifest/profiles/audiobook";
    pub const DIVINA: &'static str = "https://readium.org/webpub-manifest/profiles/divina";
    pub const EPUB: &'static str = "https://readium.org/webpub-manifest/profiles/epub";
    pub const PDF: &'static str = "https://readium.org/webpub-manifest/profiles/pdf";

    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn audiobook() -> Self {
        Self::new(Self::AUDIOBOOK)
    }

    pub fn divina() -> Self {
        Self::new(Self::DIVINA)
    }

    pub fn epub() -> Self {
        Self::new(Self::EPUB)
    }

    pub fn pdf() -> Self {
        Self::new(Self::PDF)
    }
}

impl Display for Profile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction readable content flows through the reading order.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ReadingProgression {
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
    #[default]
    Auto,
}

impl ReadingProgression {
    fn parse(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("ltr") => Self::LeftToRight,
            Some("rtl") => Self::RightToLeft,
            Some("ttb") => Self::TopToBottom,
            Some("btt") => Self::BottomToTop,
            _ => Self::Auto,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::LeftToRight => "ltr",
            Self::RightToLeft => "rtl",
            Self::TopToBottom => "ttb",
            Self::BottomToTop => "btt",
            Self::Auto => "auto",
        }
    }
}

/// Hint about the intended layout of reflowable vs. fixed content.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Layout {
    Fixed,
    Reflowable,
}

impl Layout {
    fn parse(value: Option<&Value>) -> Option<Self> {
        match value.and_then(Value::as_str) {
            Some("fixed") => Some(Self::Fixed),
            Some("reflowable") => Some(Self::Reflowable),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Fixed => "fixed",
            Self::Reflowable => "reflowable",
        }
    }
}

/// A text-and-data-mining reservation, per the TDM Reservation Protocol.
#[derive(Clone, Debug, PartialEq)]
pub struct Tdm {
    /// Whether TDM rights are reserved (`all`) or waived (`none`).
    pub reservation: TdmReservation,
    /// URL of the policy detailing the reservation.
    pub policy: Option<String>,
}

/// The scope of a [`Tdm`] reservation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TdmReservation {
    All,
    None,
}

impl TdmReservation {
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::None => "none",
        }
    }
}

impl Tdm {
    fn from_json(value: Option<&Value>) -> Option<Self> {
        let object = value?.as_object()?;
        let reservation = match object.get("reservation").and_then(Value::as_str) {
            Some("all") => TdmReservation::All,
            Some("none") => TdmReservation::None,
            _ => return None,
        };
        Some(Self {
            reservation,
            policy: json::parse_string(object.get("policy")),
        })
    }
}

impl ToJson for Tdm {
    fn to_json(&self) -> Value {
        let mut object = JsonObject::new();
        object.insert(
            "reservation".to_owned(),
            Value::String(self.reservation.as_str().to_owned()),
        );
        json::encode_if_not_nil(&mut object, "policy", self.policy.clone().map(Value::String));
        Value::Object(object)
    }
}

/// Contributor collections the publication belongs to, keyed by role
/// (e.g., `collection`, `series`).
pub type BelongsTo = BTreeMap<String, Vec<Contributor>>;

/// The metadata of a publication.
///
/// JSON uses singular role keys (`author`, `translator`, ...) that each map
/// to a list here. Unrecognized keys survive in [`other_metadata`]
/// (Self::other_metadata).
#[derive(Clone, Debug, PartialEq)]
pub struct Metadata {
    /// Title of the publication. Required.
    pub title: LocalizedString,
    pub subtitle: Option<LocalizedString>,
    /// Unique identifier (e.g., a URN).
    pub identifier: Option<String>,
    /// Publication type URI (`@type`).
    pub r#type: Option<String>,
    /// Profiles this publication conforms to.
    pub conforms_to: Vec<Profile>,
    /// Date of last modification, as an ISO 8601 string.
    pub modified: Option<String>,
    /// Date of first publication, as an ISO 8601 string.
    pub published: Option<String>,
    /// Languages of the publication content (BCP 47 tags).
    pub languages: Vec<String>,
    pub sort_as: Option<String>,
    pub authors: Vec<Contributor>,
    pub translators: Vec<Contributor>,
    pub editors: Vec<Contributor>,
    pub artists: Vec<Contributor>,
    pub illustrators: Vec<Contributor>,
    pub letterers: Vec<Contributor>,
    pub pencilers: Vec<Contributor>,
    pub colorists: Vec<Contributor>,
    pub inkers: Vec<Contributor>,
    pub narrators: Vec<Contributor>,
    pub contributors: Vec<Contributor>,
    pub publishers: Vec<Contributor>,
    pub imprints: Vec<Contributor>,
    pub subjects: Vec<Subject>,
    /// Collections/series this publication belongs to, keyed by role.
    pub belongs_to: BelongsTo,
    pub description: Option<String>,
    /// Duration in seconds, for time-based media.
    pub duration: Option<f64>,
    pub number_of_pages: Option<u64>,
    pub accessibility: Option<Accessibility>,
    pub tdm: Option<Tdm>,
    pub layout: Option<Layout>,
    pub reading_progression: ReadingProgression,
    /// Every JSON key this model does not know about.
    pub other_metadata: JsonObject,
}

impl Metadata {
    /// A minimal metadata with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_title(LocalizedString::nonlocalized(title))
    }

    pub fn with_title(title: LocalizedString) -> Self {
        Self {
            title,
            subtitle: None,
            identifier: None,
            r#type: None,
            conforms_to: Vec::new(),
            modified: None,
            published: None,
            languages: Vec::new(),
            sort_as: None,
            authors: Vec::new(),
            translators: Vec::new(),
            editors: Vec::new(),
            artists: Vec::new(),
            illustrators: Vec::new(),
            letterers: Vec::new(),
            pencilers: Vec::new(),
            colorists: Vec::new(),
            inkers: Vec::new(),
            narrators: Vec::new(),
            contributors: Vec::new(),
            publishers: Vec::new(),
            imprints: Vec::new(),
            subjects: Vec::new(),
            belongs_to: BelongsTo::new(),
            description: None,
            duration: None,
            number_of_pages: None,
            accessibility: None,
            tdm: None,
            layout: None,
            reading_progression: ReadingProgression::default(),
            other_metadata: JsonObject::new(),
        }
    }

    /// Whether the publication declares conformance to the given profile.
    pub fn declares_conformance_to(&self, profile: &Profile) -> bool {
        self.conforms_to.contains(profile)
    }

    /// The declared reading progression, with `auto` resolved from the
    /// primary language when it implies a right-to-left script.
    pub fn effective_reading_progression(&self) -> ReadingProgression {
        if self.reading_progression != ReadingProgression::Auto {
            return self.reading_progression;
        }
        let rtl = self.languages.first().is_some_and(|language| {
            let language = language.to_ascii_lowercase();
            let mut subtags = language.split('-');
            match subtags.next() {
                Some("ar" | "fa" | "he") => true,
                // Traditional Chinese is laid out right to left.
                Some("zh") => subtags.any(|subtag| matches!(subtag, "hant" | "tw")),
                _ => false,
            }
        });
        if rtl {
            ReadingProgression::RightToLeft
        } else {
            ReadingProgression::Auto
        }
    }

    /// Iterates over all contributor role lists, in a fixed order.
    pub(crate) fn contributor_lists_mut(&mut self) -> impl Iterator<Item = &mut Vec<Contributor>> {
        let mut lists: Vec<&mut Vec<Contributor>> = vec![
            &mut self.authors,
            &mut self.translators,
            &mut self.editors,
            &mut self.artists,
            &mut self.illustrators,
            &mut self.letterers,
            &mut self.pencilers,
            &mut self.colorists,
            &mut self.inkers,
            &mut self.narrators,
            &mut self.contributors,
            &mut self.publishers,
            &mut self.imprints,
        ];
        lists.extend(self.belongs_to.values_mut());
        lists.into_iter()
    }
}

impl FromJson for Metadata {
    const MODEL: &'static str = "Metadata";

    fn from_json(value: &Value, warnings: &mut dyn WarningLogger) -> Result<Self, JsonError> {
        let mut object = json::as_object(value, Self::MODEL)?.clone();

        let title = object
            .remove("title")
            .ok_or(JsonError::Parsing(Self::MODEL))
            .and_then(|title| LocalizedString::from_json(&title, warnings))?;
        let subtitle = object
            .remove("subtitle")
            .and_then(|subtitle| LocalizedString::from_json(&subtitle, warnings).ok());

        let mut contributors = |key: &str| parse_contributors(object.remove(key).as_ref(), warnings);
        let authors = contributors("author");
        let translators = contributors("translator");
        let editors = contributors("editor");
        let artists = contributors("artist");
        let illustrators = contributors("illustrator");
        let letterers = contributors("letterer");
        let pencilers = contributors("penciler");
        let colorists = contributors("colorist");
        let inkers = contributors("inker");
        let narrators = contributors("narrator");
        let contributor_list = contributors("contributor");
        let publishers = contributors("publisher");
        let imprints = contributors("imprint");

        // `belongsTo` roles, with the legacy top-level aliases folded in.
        let mut belongs_to = BelongsTo::new();
        if let Some(Value::Object(roles)) = object.remove("belongsTo") {
            for (role, value) in roles {
                let list = parse_contributors(Some(&value), warnings);
                if !list.is_empty() {
                    belongs_to.insert(role, list);
                }
            }
        }
        for legacy in ["collection", "series"] {
            let list = parse_contributors(object.remove(legacy).as_ref(), warnings);
            if !list.is_empty() {
                belongs_to.entry(legacy.to_owned()).or_default().extend(list);
            }
        }

        let metadata = Self {
            title,
            subtitle,
            identifier: json::parse_string(object.remove("identifier").as_ref()),
            r#type: json::parse_string(object.remove("@type").as_ref()),
            conforms_to: json::parse_string_array(object.remove("conformsTo").as_ref())
                .into_iter()
                .map(Profile::new)
                .collect(),
            modified: json::parse_string(object.remove("modified").as_ref()),
            published: json::parse_string(object.remove("published").as_ref()),
            languages: json::parse_string_array(object.remove("language").as_ref()),
            sort_as: json::parse_string(object.remove("sortAs").as_ref()),
            authors,
            translators,
            editors,
            artists,
            illustrators,
            letterers,
            pencilers,
            colorists,
            inkers,
            narrators,
            contributors: contributor_list,
            publishers,
            imprints,
            subjects: json::parse_array(object.remove("subject").as_ref(), warnings, true),
            belongs_to,
            description: json::parse_string(object.remove("description").as_ref()),
            duration: json::parse_positive_double(object.remove("duration").as_ref()),
            number_of_pages: json::parse_positive(object.remove("numberOfPages").as_ref()),
            accessibility: object
                .remove("accessibility")
                .and_then(|value| Accessibility::from_json(&value, warnings).ok())
                .filter(|accessibility| !accessibility.is_empty()),
            tdm: Tdm::from_json(object.remove("tdm").as_ref()),
            layout: Layout::parse(object.remove("layout").as_ref()),
            reading_progression: ReadingProgression::parse(
                object.remove("readingProgression").as_ref(),
            ),
            // Whatever was not consumed above is preserved as-is.
            other_metadata: object,
        };
        Ok(metadata)
    }
}

impl ToJson for Metadata {
    fn to_json(&self) -> Value {
        let mut object = self.other_metadata.clone();
        object.insert("title".to_owned(), self.title.to_json());
        json::encode_if_not_nil(
            &mut object,
            "subtitle",
            self.subtitle.as_ref().map(ToJson::to_json),
        );
        json::encode_if_not_nil(
            &mut object,
            "identifier",
            self.identifier.clone().map(Value::String),
        );
        json::encode_if_not_nil(&mut object, "@type", self.r#type.clone().map(Value::String));
        json::encode_if_not_empty(
            &mut object,
            "conformsTo",
            Value::Array(
                self.conforms_to
                    .iter()
                    .map(|profile| Value::String(profile.as_str().to_owned()))
                    .collect(),
            ),
        );
        json::encode_if_not_nil(&mut object, "modified", self.modified.clone().map(Value::String));
        json::encode_if_not_nil(
            &mut object,
            "published",
            self.published.clone().map(Value::String),
        );
        json::encode_if_not_empty(
            &mut object,
            "language",
            Value::Array(self.languages.iter().cloned().map(Value::String).collect()),
        );
        json::encode_if_not_nil(&mut object, "sortAs", self.sort_as.clone().map(Value::String));

        let roles: [(&str, &Vec<Contributor>); 13] = [
            ("author", &self.authors),
            ("translator", &self.translators),
            ("editor", &self.editors),
            ("artist", &self.artists),
            ("illustrator", &self.illustrators),
            ("letterer", &self.letterers),
            ("penciler", &self.pencilers),
            ("colorist", &self.colorists),
            ("inker", &self.inkers),
            ("narrator", &self.narrators),
            ("contributor", &self.contributors),
            ("publisher", &self.publishers),
            ("imprint", &self.imprints),
        ];
        for (key, list) in roles {
            json::encode_if_not_empty(&mut object, key, contributors_to_json(list));
        }

        json::encode_if_not_empty(
            &mut object,
            "subject",
            Value::Array(self.subjects.iter().map(ToJson::to_json).collect()),
        );
        if !self.belongs_to.is_empty() {
            let mut belongs_to = JsonObject::new();
            for (role, list) in &self.belongs_to {
                json::encode_if_not_empty(&mut belongs_to, role, contributors_to_json(list));
            }
            json::encode_if_not_empty(&mut object, "belongsTo", Value::Object(belongs_to));
        }
        json::encode_if_not_nil(
            &mut object,
            "description",
            self.description.clone().map(Value::String),
        );
        json::encode_if_not_nil(&mut object, "duration", self.duration.map(Value::from));
        json::encode_if_not_nil(
            &mut object,
            "numberOfPages",
            self.number_of_pages.map(Value::from),
        );
        json::encode_if_not_nil(
            &mut object,
            "accessibility",
            self.accessibility.as_ref().map(ToJson::to_json),
        );
        json::encode_if_not_nil(&mut object, "tdm", self.tdm.as_ref().map(ToJson::to_json));
        json::encode_if_not_nil(
            &mut object,
            "layout",
            self.layout.map(|layout| Value::String(layout.as_str().to_owned())),
        );
        if self.reading_progression != ReadingProgression::Auto {
            object.insert(
                "readingProgression".to_owned(),
                Value::String(self.reading_progression.as_str().to_owned()),
            );
        }
        Value::Object(object)
    }
}
