//! The publication façade: one manifest, one fetcher, pluggable services.

use crate::json::JsonError;
use crate::manifest::{Link, LinkRelation, Manifest, Metadata, Profile};
use crate::mediatype::MediaType;
use crate::resource::{Fetcher, Resource};

/// Errors opening a publication, surfaced to the host application.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum OpeningError {
    /// The publication is protected and access was denied.
    #[error("access to the publication is forbidden")]
    Forbidden,

    /// The publication source is unreachable (e.g., network down).
    #[error("the publication is currently unavailable")]
    Unavailable,

    /// Provided credentials were rejected by the protection layer.
    #[error("the provided credentials are incorrect")]
    IncorrectCredentials,

    /// The source does not look like a supported publication format.
    #[error("the publication format is not supported")]
    UnsupportedFormat,

    /// The publication file was not found.
    #[error("the publication was not found")]
    NotFound,

    /// The manifest (or a required component) failed to parse.
    #[error("the publication is corrupted and cannot be parsed")]
    ParsingFailed(#[from] JsonError),
}

/// A service plugged into a [`Publication`], able to contribute links and
/// serve synthetic resources (e.g., a positions list or a search endpoint).
///
/// The [`Any`](std::any::Any) supertrait allows hosts to retrieve a concrete
/// service back through [`Publication::find_service`].
pub trait Service: std::any::Any {
    /// Links routed to this service, injected into the manifest's `links`
    /// at build time.
    fn links(&self) -> Vec<Link> {
        Vec::new()
    }

    /// Serves a link contributed by this service, or `None` to let the
    /// fetcher handle it.
    fn get(&self, _link: &Link) -> Option<Box<dyn Resource>> {
        None
    }
}

/// A web publication: an immutable [`Manifest`] composed with a resource
/// fetcher and services.
///
/// No internal locking is performed; if the fetcher is not thread-safe,
/// callers must serialize access externally.
pub struct Publication {
    manifest: Manifest,
    fetcher: Box<dyn Fetcher>,
    services: Vec<Box<dyn Service>>,
}

impl Publication {
    /// Composes a publication without any builder transformations.
    pub fn new(manifest: Manifest, fetcher: Box<dyn Fetcher>) -> Self {
        Builder::new(MediaType::RWPM, manifest, fetcher).build()
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn metadata(&self) -> &Metadata {
        &self.manifest.metadata
    }

    /// The `self` link of the manifest, when one is declared.
    pub fn self_link(&self) -> Option<&Link> {
        self.manifest.link_with_rel(LinkRelation::SELF)
    }

    pub fn link_with_href(&self, href: &str) -> Option<&Link> {
        self.manifest.link_with_href(href)
    }

    pub fn link_with_rel(&self, rel: &str) -> Option<&Link> {
        self.manifest.link_with_rel(rel)
    }

    pub fn links_with_rel(&self, rel: &str) -> Vec<&Link> {
        self.manifest.links_with_rel(rel)
    }

    pub fn conforms_to(&self, profile: &Profile) -> bool {
        self.manifest.conforms_to(profile)
    }

    /// Resolves a resource for the link matching `href`.
    ///
    /// Services get the first shot at links they contributed; everything
    /// else goes through the fetcher (where a protection layer may have
    /// installed a decrypting wrapper).
    pub fn get(&self, href: &str) -> Option<Box<dyn Resource>> {
        let link = self.link_with_href(href)?;
        for service in &self.services {
            if let Some(resource) = service.get(link) {
                return Some(resource);
            }
        }
        Some(self.fetcher.get(link))
    }

    /// Finds the first registered service of a concrete type.
    pub fn find_service<T: Service>(&self) -> Option<&T> {
        self.services.iter().find_map(|service| {
            let any: &dyn std::any::Any = service.as_ref();
            any.downcast_ref::<T>()
        })
    }
}

/// Collects services while a publication is being built.
#[derive(Default)]
pub struct ServicesBuilder {
    services: Vec<Box<dyn Service>>,
}

impl ServicesBuilder {
    pub fn add(&mut self, service: impl Service + 'static) {
        self.services.push(Box::new(service));
    }
}

/// A hook letting a protection or service layer rewrap the fetcher and
/// manifest before the immutable [`Publication`] is finalized.
pub type Transform =
    Box<dyn FnOnce(&MediaType, &mut Manifest, &mut Box<dyn Fetcher>, &mut ServicesBuilder)>;

/// Assembles a [`Publication`], applying registered [`Transform`]s in order.
pub struct Builder {
    media_type: MediaType,
    manifest: Manifest,
    fetcher: Box<dyn Fetcher>,
    services: ServicesBuilder,
    transforms: Vec<Transform>,
}

impl Builder {
    /// `media_type` identifies the publication format the manifest was
    /// parsed from; transforms may use it to opt out.
    pub fn new(media_type: MediaType, manifest: Manifest, fetcher: Box<dyn Fetcher>) -> Self {
        Self {
            media_type,
            manifest,
            fetcher,
            services: ServicesBuilder::default(),
            transforms: Vec::new(),
        }
    }

    pub fn add_service(mut self, service: impl Service + 'static) -> Self {
        self.services.add(service);
        self
    }

    pub fn add_transform(mut self, transform: Transform) -> Self {
        self.transforms.push(transform);
        self
    }

    /// Applies every transform, injects service links into the manifest's
    /// `links` (the sole mutation of the manifest after parsing), and
    /// freezes the result.
    pub fn build(mut self) -> Publication {
        for transform in self.transforms {
            transform(
                &self.media_type,
                &mut self.manifest,
                &mut self.fetcher,
                &mut self.services,
            );
        }

        for service in &self.services.services {
            self.manifest.links.extend(service.links());
        }
        // Keep any `self` link first, where clients expect it.
        if let Some(position) = self
            .manifest
            .links
            .iter()
            .position(|link| link.has_rel(LinkRelation::SELF))
            .filter(|position| *position != 0)
        {
            let link = self.manifest.links.remove(position);
            self.manifest.links.insert(0, link);
        }

        Publication {
            manifest: self.manifest,
            fetcher: self.fetcher,
            services: self.services.services,
        }
    }
}
