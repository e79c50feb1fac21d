use super::{full_manifest_json, parse_full_manifest};
use serde_json::json;
use webpub::Manifest;
use webpub::json::ToJson;
use webpub::manifest::{Layout, Profile, ReadingProgression, TdmReservation};

#[test]
fn test_round_trip_preserves_model() {
    let manifest = parse_full_manifest();
    let reparsed = Manifest::from_json(&manifest.to_json()).unwrap();

    assert_eq!(manifest, reparsed);
}

#[test]
fn test_decoded_fields() {
    let manifest = parse_full_manifest();
    let metadata = &manifest.metadata;

    assert_eq!(
        vec!["https://readium.org/webpub-manifest/context.jsonld"],
        manifest.context,
    );
    assert_eq!("Moby-Dick", metadata.title.string());
    assert_eq!(
        "Or, the Whale",
        metadata.subtitle.as_ref().unwrap().string(),
    );
    assert_eq!(Some("urn:isbn:9780000000001"), metadata.identifier.as_deref());
    assert_eq!(Some("https://schema.org/Book"), metadata.r#type.as_deref());
    assert_eq!(vec![Profile::epub()], metadata.conforms_to);
    assert_eq!(vec!["en"], metadata.languages);

    assert_eq!("Herman Melville", metadata.authors[0].name.string());
    assert_eq!(vec!["aut"], metadata.authors[0].roles);
    assert_eq!("Jane Doe", metadata.translators[0].name.string());
    assert_eq!("Harper & Brothers", metadata.publishers[0].name.string());

    assert_eq!(2, metadata.subjects.len());
    assert_eq!("Sea stories", metadata.subjects[1].name.string());
    assert_eq!(Some("FIC047000"), metadata.subjects[1].code.as_deref());

    let series = &metadata.belongs_to["series"];
    assert_eq!("Classics", series[0].name.string());
    assert_eq!(Some(1.5), series[0].position);

    assert_eq!(ReadingProgression::LeftToRight, metadata.reading_progression);
    assert_eq!(Some(Layout::Reflowable), metadata.layout);
    assert_eq!(Some(3600.0), metadata.duration);
    assert_eq!(Some(600), metadata.number_of_pages);

    let tdm = metadata.tdm.as_ref().unwrap();
    assert_eq!(TdmReservation::All, tdm.reservation);
    assert_eq!(Some("https://example.com/tdm"), tdm.policy.as_deref());

    let accessibility = metadata.accessibility.as_ref().unwrap();
    assert_eq!(vec!["textual", "visual"], accessibility.access_modes);
    assert_eq!(
        vec![vec!["textual".to_owned()], vec!["textual".to_owned(), "visual".to_owned()]],
        accessibility.access_modes_sufficient,
    );
    assert_eq!(
        Some("Example Certifier"),
        accessibility
            .certification
            .as_ref()
            .unwrap()
            .certified_by
            .as_deref(),
    );

    // Unrecognized keys survive.
    assert_eq!(Some(&json!({ "kept": true })), metadata.other_metadata.get("x-custom"));

    assert_eq!(2, manifest.reading_order.len());
    assert_eq!(1, manifest.resources.len());
    assert_eq!(1, manifest.table_of_contents().len());
}

#[test]
fn test_legacy_spine_key_is_reading_order() {
    let manifest = Manifest::from_json(&json!({
        "metadata": { "title": "T" },
        "spine": [
            { "href": "/c1.xhtml", "type": "application/xhtml+xml" },
        ],
    }))
    .unwrap();

    assert_eq!(1, manifest.reading_order.len());
    assert_eq!("/c1.xhtml", manifest.reading_order[0].href);
    // Re-encoding always uses the modern key.
    assert!(manifest.to_json().get("spine").is_none());
    assert!(manifest.to_json().get("readingOrder").is_some());
}

#[test]
fn test_manifest_without_metadata_fails() {
    assert!(Manifest::from_json(&json!({ "links": [] })).is_err());
}

#[test]
fn test_metadata_without_title_fails() {
    assert!(Manifest::from_json(&json!({ "metadata": { "identifier": "id" } })).is_err());
}

#[test]
fn test_empty_translation_map_fails() {
    assert!(Manifest::from_json(&json!({ "metadata": { "title": {} } })).is_err());
}
