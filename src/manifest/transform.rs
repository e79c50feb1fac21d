//! Whole-graph manifest rewrites.
//!
//! [`ManifestTransformer`] is a visitor with no-op defaults; the traversal
//! lives in [`transform`] so every implementation shares the same
//! deterministic walk and each link is visited exactly once.

use crate::href::Url;
use crate::manifest::Manifest;
use crate::manifest::link::Link;
use crate::manifest::metadata::Metadata;
use crate::warning::{Severity, WarningLogger, warn};

/// Hooks invoked while walking a manifest graph. All default to no-ops.
pub trait ManifestTransformer {
    fn transform_manifest(&mut self, _manifest: &mut Manifest) {}

    fn transform_metadata(&mut self, _metadata: &mut Metadata) {}

    fn transform_link(&mut self, _link: &mut Link) {}
}

/// Applies `transformer` to every node of the manifest graph.
///
/// Walk order: metadata contributor lists (and their links), then the
/// manifest's `links`, `readingOrder`, `resources` and sub-collections
/// (recursively), recursing into each link's alternates and children, and
/// finally the manifest-level hook.
pub fn transform(manifest: &mut Manifest, transformer: &mut impl ManifestTransformer) {
    for list in manifest.metadata.contributor_lists_mut() {
        for contributor in list {
            transform_links(&mut contributor.links, transformer);
        }
    }
    transformer.transform_metadata(&mut manifest.metadata);

    transform_links(&mut manifest.links, transformer);
    transform_links(&mut manifest.reading_order, transformer);
    transform_links(&mut manifest.resources, transformer);
    for collections in manifest.subcollections.values_mut() {
        for collection in collections {
            transform_collection_links(collection, transformer);
        }
    }

    transformer.transform_manifest(manifest);
}

fn transform_collection_links(
    collection: &mut crate::manifest::PublicationCollection,
    transformer: &mut impl ManifestTransformer,
) {
    transform_links(&mut collection.links, transformer);
    for collections in collection.subcollections.values_mut() {
        for nested in collections {
            transform_collection_links(nested, transformer);
        }
    }
}

fn transform_links(links: &mut [Link], transformer: &mut impl ManifestTransformer) {
    for link in links {
        transformer.transform_link(link);
        transform_links(&mut link.alternates, transformer);
        transform_links(&mut link.children, transformer);
    }
}

/// Rewrites every non-templated HREF of the graph absolute against a base
/// URL.
///
/// Idempotent: once hrefs are absolute, a second pass is a no-op. Templated
/// links are never resolved automatically; they are skipped with a warning
/// since expansion is the caller's responsibility.
pub struct HrefNormalizer<'a> {
    base: Url,
    warnings: &'a mut dyn WarningLogger,
}

impl<'a> HrefNormalizer<'a> {
    pub fn new(base: Url, warnings: &'a mut dyn WarningLogger) -> Self {
        Self { base, warnings }
    }
}

impl ManifestTransformer for HrefNormalizer<'_> {
    fn transform_link(&mut self, link: &mut Link) {
        if link.templated {
            warn(
                self.warnings,
                "Link",
                Severity::Minor,
                format!("left templated href unresolved: {}", link.href),
                None,
            );
            return;
        }
        link.href = self
            .base
            .resolve(&Url::from_href(&link.href))
            .to_string();
    }
}
