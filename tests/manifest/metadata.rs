use serde_json::json;
use webpub::Manifest;
use webpub::manifest::{LocalizedString, ReadingProgression};
use webpub::warning::{Severity, WarningCollector};

#[test]
fn test_malformed_contributor_entries_are_dropped() {
    let mut warnings = WarningCollector::new();
    let manifest = Manifest::from_json_with(
        &json!({
            "metadata": {
                "title": "T",
                "author": ["Name A", 42, "Name B", { "role": "aut" }],
            },
        }),
        false,
        &mut warnings,
    )
    .unwrap();

    let authors = &manifest.metadata.authors;
    assert_eq!(2, authors.len());
    assert_eq!("Name A", authors[0].name.string());
    assert_eq!("Name B", authors[1].name.string());

    // One warning per dropped entry (the number, and the object without a name),
    // each carrying the offending fragment.
    let warnings = warnings.into_warnings();
    assert_eq!(2, warnings.len());
    assert!(warnings.iter().all(|warning| warning.severity == Severity::Moderate));
    assert!(warnings.iter().all(|warning| warning.model == "Contributor"));
    assert_eq!(Some(&json!(42)), warnings[0].source.as_ref());
    assert_eq!(Some(&json!({ "role": "aut" })), warnings[1].source.as_ref());
}

#[test]
fn test_untyped_reading_order_entries_are_dropped() {
    let mut warnings = WarningCollector::new();
    let manifest = Manifest::from_json_with(
        &json!({
            "metadata": { "title": "T" },
            "readingOrder": [
                { "href": "/c1.xhtml", "type": "application/xhtml+xml" },
                { "href": "/untyped.xhtml" },
            ],
        }),
        false,
        &mut warnings,
    )
    .unwrap();

    assert_eq!(1, manifest.reading_order.len());
    assert_eq!("/c1.xhtml", manifest.reading_order[0].href);
    assert_eq!(1, warnings.warnings().len());
}

#[test]
fn test_legacy_collection_and_series_keys() {
    let manifest = Manifest::from_json(&json!({
        "metadata": {
            "title": "T",
            "collection": "Anthologies",
            "series": { "name": "Classics", "position": 2.0 },
        },
    }))
    .unwrap();

    let belongs_to = &manifest.metadata.belongs_to;
    assert_eq!("Anthologies", belongs_to["collection"][0].name.string());
    assert_eq!("Classics", belongs_to["series"][0].name.string());
    assert_eq!(Some(2.0), belongs_to["series"][0].position);
}

#[test]
fn test_localized_string_fallbacks() {
    let title = LocalizedString::localized([("fr", "Bonjour"), ("en-GB", "Hello")]);

    #[rustfmt::skip]
    let expected = [
        ("Bonjour", "fr"),
        ("Bonjour", "FR"),
        ("Bonjour", "fr-CA"),
        ("Hello", "en-GB"),
        ("Hello", "en"),
        ("Hello", "de"),
    ];

    for (expect, language) in expected {
        assert_eq!(expect, title.string_for_language(language), "language {language}");
    }
    assert_eq!("Hello", title.string());
    assert_eq!("Bonjour", title.string_for_languages(&["it", "fr"]));
}

#[test]
fn test_localized_string_without_english_falls_back_to_first() {
    let title = LocalizedString::localized([("ja", "こんにちは"), ("fr", "Bonjour")]);

    assert_eq!("Bonjour", title.string_for_language("de"));
}

#[test]
fn test_nonlocalized_string_ignores_preferences() {
    let title = LocalizedString::nonlocalized("Plain");

    assert_eq!("Plain", title.string_for_language("fr"));
}

#[test]
fn test_negative_numbers_are_rejected() {
    let manifest = Manifest::from_json(&json!({
        "metadata": { "title": "T", "duration": -5.0, "numberOfPages": -1 },
        "readingOrder": [
            { "href": "/c1", "type": "text/html", "height": -600, "bitrate": -32.0 },
        ],
    }))
    .unwrap();

    assert_eq!(None, manifest.metadata.duration);
    assert_eq!(None, manifest.metadata.number_of_pages);
    assert_eq!(None, manifest.reading_order[0].height);
    assert_eq!(None, manifest.reading_order[0].bitrate);
}

#[test]
fn test_effective_reading_progression() {
    let parse = |metadata: serde_json::Value| {
        Manifest::from_json(&json!({ "metadata": metadata }))
            .unwrap()
            .metadata
            .effective_reading_progression()
    };

    #[rustfmt::skip]
    let expected = [
        (ReadingProgression::RightToLeft, json!({ "title": "T", "language": "ar" })),
        (ReadingProgression::RightToLeft, json!({ "title": "T", "language": "he-IL" })),
        (ReadingProgression::RightToLeft, json!({ "title": "T", "language": "zh-Hant" })),
        (ReadingProgression::RightToLeft, json!({ "title": "T", "language": "zh-TW" })),
        (ReadingProgression::Auto, json!({ "title": "T", "language": "zh" })),
        (ReadingProgression::Auto, json!({ "title": "T", "language": "zh-Hans" })),
        (ReadingProgression::Auto, json!({ "title": "T", "language": "en" })),
        (ReadingProgression::Auto, json!({ "title": "T" })),
        (ReadingProgression::LeftToRight, json!({ "title": "T", "language": "ar", "readingProgression": "ltr" })),
    ];

    for (expect, metadata) in expected {
        assert_eq!(expect, parse(metadata));
    }
}

#[test]
fn test_subcollection_shapes() {
    let mut warnings = WarningCollector::new();
    let manifest = Manifest::from_json_with(
        &json!({
            "metadata": { "title": "T" },
            // A bare array of links is shorthand for one collection.
            "toc": [{ "href": "/c1.xhtml", "title": "One" }],
            // The full form carries metadata and nested sub-collections.
            "guided": {
                "metadata": { "generated": true },
                "links": [{ "href": "/g1" }],
                "pages": [{ "href": "/p1" }],
            },
            // A collection without links is malformed and dropped.
            "landmarks": { "links": [] },
        }),
        false,
        &mut warnings,
    )
    .unwrap();

    assert_eq!(1, manifest.table_of_contents().len());

    let guided = &manifest.subcollections["guided"][0];
    assert_eq!(Some(&json!(true)), guided.metadata.get("generated"));
    assert_eq!("/g1", guided.links[0].href);
    assert_eq!("/p1", guided.subcollections["pages"][0].links[0].href);

    assert!(!manifest.subcollections.contains_key("landmarks"));
    assert_eq!(1, warnings.warnings().len());
}
