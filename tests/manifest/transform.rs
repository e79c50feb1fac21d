use super::parse_full_manifest;
use serde_json::json;
use webpub::Manifest;
use webpub::href::Url;
use webpub::manifest::transform::{HrefNormalizer, ManifestTransformer, transform};
use webpub::manifest::{Link, LinkRelation};
use webpub::warning::{Severity, WarningCollector};

fn packaged_manifest() -> serde_json::Value {
    json!({
        "metadata": { "title": "T" },
        "links": [
            { "rel": "self", "href": "https://example.com/manifest.json",
              "type": "application/webpub+json" },
        ],
        "readingOrder": [
            { "href": "c1.xhtml", "type": "application/xhtml+xml" },
            { "href": "chapters/c2.xhtml", "type": "application/xhtml+xml" },
        ],
        "toc": [{ "href": "c1.xhtml#start", "title": "One" }],
    })
}

#[test]
fn test_packaged_hrefs_are_normalized_to_the_root() {
    let manifest = Manifest::from_json_with(
        &packaged_manifest(),
        true,
        &mut webpub::warning::NoopWarningLogger,
    )
    .unwrap();

    assert_eq!("/c1.xhtml", manifest.reading_order[0].href);
    assert_eq!("/chapters/c2.xhtml", manifest.reading_order[1].href);
    assert_eq!("/c1.xhtml#start", manifest.table_of_contents()[0].href);
}

#[test]
fn test_packaged_self_link_becomes_alternate() {
    let manifest = Manifest::from_json_with(
        &packaged_manifest(),
        true,
        &mut webpub::warning::NoopWarningLogger,
    )
    .unwrap();

    let link = &manifest.links[0];
    assert!(!link.has_rel(LinkRelation::SELF));
    assert!(link.has_rel(LinkRelation::ALTERNATE));
    // The declared location survives as the href, just demoted.
    assert_eq!("https://example.com/manifest.json", link.href);
}

#[test]
fn test_remote_hrefs_resolve_against_the_self_link() {
    let manifest = Manifest::from_json_with(
        &packaged_manifest(),
        false,
        &mut webpub::warning::NoopWarningLogger,
    )
    .unwrap();

    assert_eq!("https://example.com/c1.xhtml", manifest.reading_order[0].href);
    assert_eq!(
        "https://example.com/chapters/c2.xhtml",
        manifest.reading_order[1].href,
    );
}

#[test]
fn test_normalization_is_idempotent() {
    let manifest = parse_full_manifest();

    let mut warnings = WarningCollector::new();
    let mut again = manifest.clone();
    let mut normalizer = HrefNormalizer::new(
        Url::from_href("https://example.com/manifest.json"),
        &mut warnings,
    );
    transform(&mut again, &mut normalizer);

    assert_eq!(manifest, again);
}

#[test]
fn test_templated_links_are_never_resolved() {
    let mut warnings = WarningCollector::new();
    let manifest = Manifest::from_json_with(
        &json!({
            "metadata": { "title": "T" },
            "links": [
                { "rel": "self", "href": "https://example.com/manifest.json",
                  "type": "application/webpub+json" },
                { "rel": "search", "href": "search{?query}", "templated": true },
            ],
        }),
        false,
        &mut warnings,
    )
    .unwrap();

    let search = manifest.link_with_rel("search").unwrap();
    assert_eq!("search{?query}", search.href);

    let warnings = warnings.into_warnings();
    assert_eq!(1, warnings.len());
    assert_eq!(Severity::Minor, warnings[0].severity);
}

/// Counts `transform_link` invocations.
#[derive(Default)]
struct LinkCounter {
    count: usize,
}

impl ManifestTransformer for LinkCounter {
    fn transform_link(&mut self, _link: &mut Link) {
        self.count += 1;
    }
}

#[test]
fn test_transform_visits_every_link_once() {
    let mut manifest = parse_full_manifest();

    let mut counter = LinkCounter::default();
    transform(&mut manifest, &mut counter);

    // 2 manifest links, 2 reading order entries + 1 alternate, 1 resource,
    // 1 toc entry.
    assert_eq!(7, counter.count);
}
