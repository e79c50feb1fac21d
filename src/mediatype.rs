//! Media types declared by publication links.

use std::borrow::Cow;
use std::fmt::{Display, Formatter};

/// A normalized media type (essence only; parameters are discarded).
///
/// # Examples
/// ```
/// use webpub::mediatype::MediaType;
///
/// let media_type = MediaType::parse("Application/XHTML+XML; charset=utf-8").unwrap();
///
/// assert_eq!(MediaType::XHTML, media_type);
/// assert!(media_type.is_html());
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MediaType(Cow<'static, str>);

impl MediaType {
    pub const HTML: MediaType = MediaType::from_static("text/html");
    pub const XHTML: MediaType = MediaType::from_static("application/xhtml+xml");
    pub const PDF: MediaType = MediaType::from_static("application/pdf");
    pub const PNG: MediaType = MediaType::from_static("image/png");
    pub const JPEG: MediaType = MediaType::from_static("image/jpeg");
    pub const MP3: MediaType = MediaType::from_static("audio/mpeg");
    pub const CSS: MediaType = MediaType::from_static("text/css");
    /// A Readium Web Publication Manifest document.
    pub const RWPM: MediaType = MediaType::from_static("application/webpub+json");
    /// An LCP License Document.
    pub const LCP_LICENSE: MediaType =
        MediaType::from_static("application/vnd.readium.lcp.license.v1.0+json");

    /// Bitmap formats accepted for visual narrative (Divina) resources.
    const BITMAPS: &'static [&'static str] = &[
        "image/avif",
        "image/bmp",
        "image/gif",
        "image/jpeg",
        "image/jxl",
        "image/png",
        "image/tiff",
        "image/webp",
    ];

    /// `essence` must already be a lowercase `type/subtype` pair.
    const fn from_static(essence: &'static str) -> Self {
        Self(Cow::Borrowed(essence))
    }

    /// Parses a media type string, discarding parameters and lowercasing.
    ///
    /// Returns `None` when `input` has no `type/subtype` shape.
    pub fn parse(input: &str) -> Option<Self> {
        let essence = input.split(';').next()?.trim().to_ascii_lowercase();
        let (kind, subtype) = essence.split_once('/')?;
        if kind.is_empty() || subtype.is_empty() || subtype.contains('/') {
            return None;
        }
        Some(Self(Cow::Owned(essence)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is (X)HTML content.
    pub fn is_html(&self) -> bool {
        *self == Self::HTML || *self == Self::XHTML
    }

    /// Whether this is any audio format.
    pub fn is_audio(&self) -> bool {
        self.0.starts_with("audio/")
    }

    /// Whether this is a bitmap image format usable as a Divina page.
    pub fn is_bitmap(&self) -> bool {
        Self::BITMAPS.contains(&self.0.as_ref())
    }

    pub fn is_pdf(&self) -> bool {
        *self == Self::PDF
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
