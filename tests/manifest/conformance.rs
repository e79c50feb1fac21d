use serde_json::{Value, json};
use webpub::Manifest;
use webpub::manifest::Profile;

fn manifest(conforms_to: Value, reading_order_types: &[&str]) -> Manifest {
    let reading_order: Vec<Value> = reading_order_types
        .iter()
        .enumerate()
        .map(|(index, media_type)| json!({ "href": format!("/r{index}"), "type": media_type }))
        .collect();
    Manifest::from_json(&json!({
        "metadata": { "title": "T", "conformsTo": conforms_to },
        "readingOrder": reading_order,
    }))
    .unwrap()
}

#[test]
fn test_audiobook_is_structural() {
    let audiobook = manifest(json!([]), &["audio/mpeg", "audio/ogg"]);

    assert!(audiobook.conforms_to(&Profile::audiobook()));
    assert!(!audiobook.conforms_to(&Profile::divina()));
    assert!(!audiobook.conforms_to(&Profile::pdf()));
}

#[test]
fn test_mixed_content_is_not_an_audiobook() {
    let mixed = manifest(
        json!([Profile::AUDIOBOOK]),
        &["audio/mpeg", "image/png"],
    );

    assert!(!mixed.conforms_to(&Profile::audiobook()));
}

#[test]
fn test_divina_is_structural() {
    let divina = manifest(json!([]), &["image/png", "image/jpeg", "image/webp"]);

    assert!(divina.conforms_to(&Profile::divina()));
    assert!(!divina.conforms_to(&Profile::audiobook()));
}

#[test]
fn test_pdf_is_structural() {
    let pdf = manifest(json!([]), &["application/pdf"]);

    assert!(pdf.conforms_to(&Profile::pdf()));
}

#[test]
fn test_epub_requires_a_declaration() {
    let undeclared = manifest(json!([]), &["application/xhtml+xml", "text/html"]);
    let declared = manifest(json!([Profile::EPUB]), &["application/xhtml+xml", "text/html"]);
    let declared_with_image = manifest(json!([Profile::EPUB]), &["text/html", "image/png"]);

    assert!(!undeclared.conforms_to(&Profile::epub()));
    assert!(declared.conforms_to(&Profile::epub()));
    assert!(!declared_with_image.conforms_to(&Profile::epub()));
}

#[test]
fn test_custom_profile_matches_by_uri() {
    let custom = "https://example.com/profiles/comics";
    let declared = manifest(json!([custom]), &["image/png"]);

    assert!(declared.conforms_to(&Profile::new(custom)));
    assert!(!declared.conforms_to(&Profile::new("https://example.com/profiles/other")));
}

#[test]
fn test_empty_reading_order_conforms_to_nothing() {
    let empty = Manifest::from_json(&json!({
        "metadata": {
            "title": "T",
            "conformsTo": [Profile::AUDIOBOOK, "https://example.com/profiles/comics"],
        },
    }))
    .unwrap();

    assert!(!empty.conforms_to(&Profile::audiobook()));
    assert!(!empty.conforms_to(&Profile::new("https://example.com/profiles/comics")));
}
