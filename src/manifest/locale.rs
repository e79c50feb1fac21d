//! Localized strings with BCP 47-keyed translations.

use crate::json::{FromJson, JsonError, ToJson};
use crate::warning::{Severity, WarningLogger, warn};
use serde_json::Value;
use std::collections::BTreeMap;

/// Fallback language used when no better translation matches.
const FALLBACK_LANGUAGE: &str = "en";

/// A string that may carry translations keyed by language tag.
///
/// Producers must guarantee a [`Localized`](Self::Localized) variant holds at
/// least one entry; the JSON decoder rejects empty translation maps.
///
/// # Examples
/// ```
/// use webpub::manifest::LocalizedString;
///
/// let title = LocalizedString::localized([("fr", "Bonjour"), ("en", "Hello")]);
///
/// assert_eq!("Bonjour", title.string_for_language("fr"));
/// // Unknown languages fall back to English.
/// assert_eq!("Hello", title.string_for_language("de"));
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum LocalizedString {
    /// A plain string without language information.
    Nonlocalized(String),
    /// Translations keyed by BCP 47 language tag.
    Localized(BTreeMap<String, String>),
}

impl LocalizedString {
    pub fn nonlocalized(string: impl Into<String>) -> Self {
        Self::Nonlocalized(string.into())
    }

    pub fn localized<K: Into<String>, V: Into<String>>(
        translations: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        Self::Localized(
            translations
                .into_iter()
                .map(|(tag, string)| (tag.into(), string.into()))
                .collect(),
        )
    }

    /// The display string with no language preference.
    ///
    /// Falls back through `en`, then the first available translation.
    pub fn string(&self) -> &str {
        self.string_for_languages(&[])
    }

    /// The display string best matching the given language code.
    pub fn string_for_language(&self, language: &str) -> &str {
        self.string_for_languages(&[language])
    }

    /// The display string best matching the given preference order.
    ///
    /// Resolution: exact tag match (then primary-subtag match) for each
    /// preferred language in order, then `en`, then the first available
    /// translation, then `""`.
    pub fn string_for_languages(&self, preferred: &[&str]) -> &str {
        let translations = match self {
            Self::Nonlocalized(string) => return string,
            Self::Localized(translations) => translations,
        };

        preferred
            .iter()
            .chain(&[FALLBACK_LANGUAGE])
            .find_map(|language| lookup(translations, language))
            .or_else(|| translations.values().next().map(String::as_str))
            .unwrap_or("")
    }
}

/// Case-insensitive tag match, retried with the primary subtag
/// (`en-US` matches an `en` entry and vice versa).
fn lookup<'a>(translations: &'a BTreeMap<String, String>, language: &str) -> Option<&'a str> {
    let primary = |tag: &str| tag.split('-').next().unwrap_or(tag).to_ascii_lowercase();

    translations
        .iter()
        .find(|(tag, _)| tag.eq_ignore_ascii_case(language))
        .or_else(|| {
            let wanted = primary(language);
            translations.iter().find(|(tag, _)| primary(tag) == wanted)
        })
        .map(|(_, string)| string.as_str())
}

impl FromJson for LocalizedString {
    const MODEL: &'static str = "LocalizedString";

    fn from_json(value: &Value, warnings: &mut dyn WarningLogger) -> Result<Self, JsonError> {
        match value {
            Value::String(string) => Ok(Self::Nonlocalized(string.clone())),
            Value::Object(object) => {
                let mut translations = BTreeMap::new();
                for (tag, translated) in object {
                    match translated.as_str() {
                        Some(string) => {
                            translations.insert(tag.clone(), string.to_owned());
                        }
                        None => warn(
                            warnings,
                            Self::MODEL,
                            Severity::Moderate,
                            format!("dropped non-string translation for `{tag}`"),
                            Some(translated),
                        ),
                    }
                }
                if translations.is_empty() {
                    return Err(JsonError::Parsing(Self::MODEL));
                }
                Ok(Self::Localized(translations))
            }
            _ => Err(JsonError::Parsing(Self::MODEL)),
        }
    }
}

impl ToJson for LocalizedString {
    fn to_json(&self) -> Value {
        match self {
            Self::Nonlocalized(string) => Value::String(string.clone()),
            Self::Localized(translations) => Value::Object(
                translations
                    .iter()
                    .map(|(tag, string)| (tag.clone(), Value::String(string.clone())))
                    .collect(),
            ),
        }
    }
}
