use super::parse_full_manifest;
use serde_json::json;
use std::collections::BTreeMap;
use webpub::Manifest;
use webpub::manifest::{Link, LinkRelation};

#[test]
fn test_link_with_href_priority_order() {
    // The same href appears in all three lists; `readingOrder` wins.
    let manifest = Manifest::from_json(&json!({
        "metadata": { "title": "T" },
        "links": [{ "href": "/dup", "title": "links" }],
        "readingOrder": [{ "href": "/dup", "type": "text/html", "title": "readingOrder" }],
        "resources": [{ "href": "/dup", "type": "text/html", "title": "resources" }],
    }))
    .unwrap();

    let found = manifest.link_with_href("/dup").unwrap();
    assert_eq!(Some("readingOrder"), found.title.as_deref());
}

#[test]
fn test_link_with_href_strips_query_and_fragment() {
    let manifest = parse_full_manifest();

    for href in [
        "https://example.com/c1.xhtml",
        "https://example.com/c1.xhtml#section-2",
        "https://example.com/c1.xhtml?page=3",
        "https://example.com/c1.xhtml?page=3#top",
    ] {
        let found = manifest.link_with_href(href).unwrap();
        assert_eq!("https://example.com/c1.xhtml", found.href, "lookup of {href}");
    }
    assert!(manifest.link_with_href("https://example.com/missing.xhtml").is_none());
}

#[test]
fn test_link_with_href_prefers_exact_matches() {
    let manifest = Manifest::from_json(&json!({
        "metadata": { "title": "T" },
        "readingOrder": [
            { "href": "/c?page=1", "type": "text/html", "title": "first" },
            { "href": "/c?page=2", "type": "text/html", "title": "second" },
        ],
    }))
    .unwrap();

    let found = manifest.link_with_href("/c?page=2").unwrap();
    assert_eq!(Some("second"), found.title.as_deref());
}

#[test]
fn test_link_lookup_recurses_into_alternates() {
    let manifest = parse_full_manifest();

    let found = manifest.link_with_href("https://example.com/c2.mp3").unwrap();
    assert_eq!("audio/mpeg", found.media_type.as_ref().unwrap().as_str());
}

#[test]
fn test_link_with_rel_is_case_insensitive() {
    let manifest = parse_full_manifest();

    let cover = manifest.link_with_rel("COVER").unwrap();
    assert_eq!("https://example.com/cover.png", cover.href);
    assert!(cover.has_rel(LinkRelation::COVER));
}

#[test]
fn test_links_with_rel() {
    let manifest = parse_full_manifest();

    assert_eq!(1, manifest.links_with_rel("self").len());
    assert_eq!(1, manifest.links_with_rel("cover").len());
    assert!(manifest.links_with_rel("contents").is_empty());
}

#[test]
fn test_table_of_contents() {
    let manifest = parse_full_manifest();

    let toc = manifest.table_of_contents();
    assert_eq!(1, toc.len());
    assert_eq!(Some("Chapter 1"), toc[0].title.as_deref());
    assert!(Manifest::new(manifest.metadata.clone()).table_of_contents().is_empty());
}

#[test]
fn test_templated_link_url_expansion() {
    let manifest = parse_full_manifest();
    let search = manifest.link_with_rel("search").unwrap();

    // The normalizer left the template alone.
    assert_eq!("https://example.com/search{?query}", search.href);
    assert!(search.templated);

    let parameters = BTreeMap::from([("query".to_owned(), "whale".to_owned())]);
    assert_eq!(
        "https://example.com/search?query=whale",
        search.url(&parameters).to_string(),
    );
    // Variables without a matching parameter are removed.
    assert_eq!(
        "https://example.com/search",
        search.url(&BTreeMap::new()).to_string(),
    );
}

#[test]
fn test_empty_template_expansion_becomes_a_fragment() {
    let mut link = Link::new("{x}");
    link.templated = true;

    // An href consisting only of an unmatched variable expands to nothing;
    // `#` keeps the URL well-formed.
    assert_eq!("#", link.url(&BTreeMap::new()).to_string());
}
