//! Byte-range-addressable access to publication resources.
//!
//! The model never fetches anything itself; it consumes this small contract
//! and leaves transport (archive, filesystem, HTTP) to the host application.

use crate::manifest::Link;
use std::ops::Range;
use std::sync::Arc;

/// Errors accessing a resource's bytes.
#[derive(thiserror::Error, Clone, Debug)]
#[non_exhaustive]
pub enum ResourceError {
    /// The resource does not exist.
    #[error("resource not found")]
    NotFound,
    /// Access to the resource was denied (e.g., missing DRM credentials).
    #[error("access to the resource is forbidden")]
    Forbidden,
    /// The resource is temporarily unreachable.
    #[error("the resource is currently unavailable")]
    Unavailable,
    /// Any other transport- or codec-level failure.
    #[error(transparent)]
    Other(Arc<dyn std::error::Error + Send + Sync>),
}

impl ResourceError {
    pub fn wrap(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other(Arc::new(error))
    }
}

/// A readable resource addressed by a [`Link`].
///
/// `read(None)` returns the whole resource; `read(Some(range))` returns the
/// requested byte range, clamped to the resource length (a range past the
/// end yields empty data rather than an error).
pub trait Resource {
    /// The link from which this resource was resolved, carrying among other
    /// things `properties.encryption`.
    fn link(&self) -> &Link;

    /// Total length of the resource in bytes.
    fn length(&self) -> Result<u64, ResourceError>;

    fn read(&self, range: Option<Range<u64>>) -> Result<Vec<u8>, ResourceError>;
}

/// Resolves links to resources.
pub trait Fetcher {
    fn get(&self, link: &Link) -> Box<dyn Resource>;
}

/// Clamps a requested range to `len`, converting to `usize` indices.
pub(crate) fn clamp_range(range: Range<u64>, len: u64) -> Range<usize> {
    let start = range.start.min(len) as usize;
    let end = (range.end.min(len) as usize).max(start);
    start..end
}

/// An in-memory resource.
#[derive(Clone, Debug)]
pub struct BytesResource {
    link: Link,
    data: Arc<[u8]>,
}

impl BytesResource {
    pub fn new(link: Link, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            link,
            data: data.into(),
        }
    }
}

impl Resource for BytesResource {
    fn link(&self) -> &Link {
        &self.link
    }

    fn length(&self) -> Result<u64, ResourceError> {
        Ok(self.data.len() as u64)
    }

    fn read(&self, range: Option<Range<u64>>) -> Result<Vec<u8>, ResourceError> {
        Ok(match range {
            Some(range) => self.data[clamp_range(range, self.data.len() as u64)].to_vec(),
            None => self.data.to_vec(),
        })
    }
}

/// A resource that fails every access with the same error.
#[derive(Clone, Debug)]
pub struct FailureResource {
    link: Link,
    error: ResourceError,
}

impl FailureResource {
    pub fn new(link: Link, error: ResourceError) -> Self {
        Self { link, error }
    }
}

impl Resource for FailureResource {
    fn link(&self) -> &Link {
        &self.link
    }

    fn length(&self) -> Result<u64, ResourceError> {
        Err(self.error.clone())
    }

    fn read(&self, _range: Option<Range<u64>>) -> Result<Vec<u8>, ResourceError> {
        Err(self.error.clone())
    }
}

/// A fetcher serving a fixed set of in-memory resources, keyed by HREF.
///
/// Mostly useful for tests and packaged fixtures.
#[derive(Clone, Debug, Default)]
pub struct InMemoryFetcher {
    resources: Vec<(String, Arc<[u8]>)>,
}

impl InMemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the bytes served for `href`, replacing any previous entry.
    pub fn insert(&mut self, href: impl Into<String>, data: impl Into<Arc<[u8]>>) {
        let href = href.into();
        self.resources.retain(|(existing, _)| *existing != href);
        self.resources.push((href, data.into()));
    }
}

impl Fetcher for InMemoryFetcher {
    fn get(&self, link: &Link) -> Box<dyn Resource> {
        match self
            .resources
            .iter()
            .find(|(href, _)| *href == link.href)
        {
            Some((_, data)) => Box::new(BytesResource {
                link: link.clone(),
                data: Arc::clone(data),
            }),
            None => Box::new(FailureResource::new(link.clone(), ResourceError::NotFound)),
        }
    }
}

/// Wraps another fetcher, passing every resource through a transformation
/// (e.g., decryption).
pub struct TransformingFetcher {
    inner: Box<dyn Fetcher>,
    transform: Box<dyn Fn(Box<dyn Resource>) -> Box<dyn Resource>>,
}

impl TransformingFetcher {
    pub fn new(
        inner: Box<dyn Fetcher>,
        transform: impl Fn(Box<dyn Resource>) -> Box<dyn Resource> + 'static,
    ) -> Self {
        Self {
            inner,
            transform: Box::new(transform),
        }
    }

    /// Replaces `fetcher` in place with a transforming wrapper around it.
    pub fn wrap(
        fetcher: &mut Box<dyn Fetcher>,
        transform: impl Fn(Box<dyn Resource>) -> Box<dyn Resource> + 'static,
    ) {
        let inner = std::mem::replace(fetcher, Box::new(InMemoryFetcher::new()));
        *fetcher = Box::new(Self::new(inner, transform));
    }
}

impl Fetcher for TransformingFetcher {
    fn get(&self, link: &Link) -> Box<dyn Resource> {
        (self.transform)(self.inner.get(link))
    }
}
