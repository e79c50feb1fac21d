//! Accessibility metadata, per the EPUB Accessibility / Schema.org
//! vocabularies surfaced by RWPM.

use crate::json::{self, FromJson, JsonError, JsonObject, ToJson};
use crate::warning::WarningLogger;
use serde_json::Value;

/// Accessibility claims made by the publication.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Accessibility {
    /// Accessibility profiles the publication conforms to (URIs).
    pub conforms_to: Vec<String>,
    /// Certification backing the conformance claims.
    pub certification: Option<Certification>,
    /// Human-readable summary of the accessibility of the publication.
    pub summary: Option<String>,
    /// Ways the content may be consumed (e.g., `textual`, `auditory`).
    pub access_modes: Vec<String>,
    /// Sets of access modes each sufficient on their own to consume the
    /// content.
    pub access_modes_sufficient: Vec<Vec<String>>,
    /// Accessibility features (e.g., `alternativeText`).
    pub features: Vec<String>,
    /// Potential hazards (e.g., `flashing`, `noSoundHazard`).
    pub hazards: Vec<String>,
}

impl Accessibility {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Who certified the accessibility claims, and how.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Certification {
    pub certified_by: Option<String>,
    pub credential: Option<String>,
    pub report: Option<String>,
}

impl Certification {
    fn from_json(value: Option<&Value>) -> Option<Self> {
        let object = value?.as_object()?;
        let certification = Self {
            certified_by: json::parse_string(object.get("certifiedBy")),
            credential: json::parse_string(object.get("credential")),
            report: json::parse_string(object.get("report")),
        };
        (certification != Self::default()).then_some(certification)
    }
}

impl FromJson for Accessibility {
    const MODEL: &'static str = "Accessibility";

    fn from_json(value: &Value, _warnings: &mut dyn WarningLogger) -> Result<Self, JsonError> {
        let object = json::as_object(value, Self::MODEL)?;

        // `accessModeSufficient` is an array of (string | array of strings).
        let access_modes_sufficient = match object.get("accessModeSufficient") {
            Some(Value::Array(entries)) => entries
                .iter()
                .map(|entry| json::parse_string_array(Some(entry)))
                .filter(|modes| !modes.is_empty())
                .collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            conforms_to: json::parse_string_array(object.get("conformsTo")),
            certification: Certification::from_json(object.get("certification")),
            summary: json::parse_string(object.get("summary")),
            access_modes: json::parse_string_array(object.get("accessMode")),
            access_modes_sufficient,
            features: json::parse_string_array(object.get("feature")),
            hazards: json::parse_string_array(object.get("hazard")),
        })
    }
}

impl ToJson for Accessibility {
    fn to_json(&self) -> Value {
        let string_array =
            |strings: &[String]| Value::Array(strings.iter().cloned().map(Value::String).collect());

        let mut object = JsonObject::new();
        json::encode_if_not_empty(&mut object, "conformsTo", string_array(&self.conforms_to));
        if let Some(certification) = &self.certification {
            let mut inner = JsonObject::new();
            json::encode_if_not_nil(
                &mut inner,
                "certifiedBy",
                certification.certified_by.clone().map(Value::String),
            );
            json::encode_if_not_nil(
                &mut inner,
                "credential",
                certification.credential.clone().map(Value::String),
            );
            json::encode_if_not_nil(
                &mut inner,
                "report",
                certification.report.clone().map(Value::String),
            );
            json::encode_if_not_empty(&mut object, "certification", Value::Object(inner));
        }
        json::encode_if_not_nil(&mut object, "summary", self.summary.clone().map(Value::String));
        json::encode_if_not_empty(&mut object, "accessMode", string_array(&self.access_modes));
        json::encode_if_not_empty(
            &mut object,
            "accessModeSufficient",
            Value::Array(
                self.access_modes_sufficient
                    .iter()
                    .map(|modes| string_array(modes))
                    .collect(),
            ),
        );
        json::encode_if_not_empty(&mut object, "feature", string_array(&self.features));
        json::encode_if_not_empty(&mut object, "hazard", string_array(&self.hazards));
        Value::Object(object)
    }
}
