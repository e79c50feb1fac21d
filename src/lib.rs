//! # webpub
//!
//! A Readium Web Publication Manifest (RWPM) data model with a tolerant
//! JSON decode/encode pipeline, HREF normalization, and streaming LCP
//! decryption of protected resources.
//!
//! ## Examples
//! Parsing a manifest and looking up its content:
//! ```rust
//! use webpub::Manifest;
//!
//! let manifest = Manifest::from_json(&serde_json::json!({
//!     "metadata": { "title": "Moby-Dick", "author": "Herman Melville" },
//!     "readingOrder": [
//!         { "href": "/c1.xhtml", "type": "application/xhtml+xml" },
//!         { "href": "/c2.xhtml", "type": "application/xhtml+xml" },
//!     ],
//! })).unwrap();
//!
//! assert_eq!("Moby-Dick", manifest.metadata.title.string());
//!
//! let chapter = manifest.link_with_href("/c2.xhtml").unwrap();
//! assert_eq!("application/xhtml+xml", chapter.media_type.as_ref().unwrap().as_str());
//! ```
//! Collecting warnings for malformed-but-recoverable input:
//! ```rust
//! use webpub::Manifest;
//! use webpub::warning::WarningCollector;
//!
//! let mut warnings = WarningCollector::new();
//! let manifest = Manifest::from_json_with(&serde_json::json!({
//!     "metadata": { "title": "T", "author": ["Name A", 42, "Name B"] },
//! }), false, &mut warnings).unwrap();
//!
//! // The malformed entry was dropped, not fatal.
//! assert_eq!(2, manifest.metadata.authors.len());
//! assert_eq!(1, warnings.warnings().len());
//! ```

pub mod href;
pub mod json;
pub mod lcp;
pub mod manifest;
pub mod mediatype;
pub mod publication;
pub mod resource;
pub mod warning;

pub use self::json::{FromJson, JsonError, ToJson};
pub use self::manifest::{Link, LocalizedString, Manifest, Metadata};
pub use self::mediatype::MediaType;
pub use self::publication::Publication;

pub mod errors {
    pub use super::json::JsonError;
    pub use super::lcp::DecryptionError;
    pub use super::publication::OpeningError;
    pub use super::resource::ResourceError;
}
