//! Readium LCP integration: streaming decryption of protected resources.
//!
//! This module consumes an opaque [`License`] (the decrypted-content-key
//! holder; acquisition and validation of license documents happen outside
//! this crate) and exposes protected resources as ordinary byte-range
//! addressable [`Resource`](crate::resource::Resource)s.

mod decryptor;

pub use decryptor::Decryptor;

use crate::resource::ResourceError;
use std::sync::Arc;

/// URI identifying the LCP protection scheme in `properties.encryption`.
pub const SCHEME: &str = "http://readium.org/2014/01/lcp";

/// URI of the AES-256-CBC algorithm, the only one supporting random access.
pub const CBC_ALGORITHM: &str = "http://www.w3.org/2001/04/xmlenc#aes256-cbc";

/// Holder of a publication's decrypted content key.
///
/// `decipher` performs raw block decryption: for CBC input, the first block
/// of `data` is used as the IV/chaining block and is not part of the output.
/// Padding is left in place; the caller strips it.
pub trait License {
    fn decipher(&self, data: &[u8]) -> Result<Option<Vec<u8>>, DecryptionError>;
}

/// Errors decrypting a protected resource.
///
/// All variants are local to a single read; none invalidates the license or
/// other reads.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum DecryptionError {
    /// The cipher returned no data: content-key mismatch or corrupted
    /// ciphertext.
    #[error("the cipher returned no data")]
    EmptyDecryptedData,

    /// The resource is shorter than two AES blocks and cannot contain a
    /// valid IV plus padding.
    #[error("invalid CBC-encrypted data")]
    InvalidCbcData,

    /// Decompressing the decrypted resource failed.
    #[error("failed to inflate the decrypted resource")]
    InflateFailed(#[source] std::io::Error),

    /// Reading the underlying encrypted resource failed.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// The license itself failed to decipher.
    #[error("the license failed to decipher the content")]
    License(#[source] Arc<dyn std::error::Error + Send + Sync>),
}

impl DecryptionError {
    /// Converts into a [`ResourceError`] for surfacing through the
    /// [`Resource`](crate::resource::Resource) contract.
    pub(crate) fn into_resource_error(self) -> ResourceError {
        match self {
            Self::Resource(error) => error,
            other => ResourceError::wrap(other),
        }
    }
}
