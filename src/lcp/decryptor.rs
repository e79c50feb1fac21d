//! Strategy selection and the two decryption paths.
//!
//! Byte-range random access is only mathematically safe when the content is
//! CBC-encrypted and NOT deflated (compression destroys fixed-offset
//! addressability), hence the two-strategy split: CBC-and-uncompressed
//! resources get true random access, everything else is decrypted fully
//! once and served from memory.

use crate::lcp::{CBC_ALGORITHM, DecryptionError, License, SCHEME};
use crate::manifest::{Encryption, Link};
use crate::resource::{FailureResource, Resource, ResourceError, clamp_range};
use std::io::Read;
use std::ops::Range;
use std::sync::{Arc, OnceLock};

const AES_BLOCK_SIZE: u64 = 16;

/// Wraps resources flagged as LCP-protected with the appropriate decryption
/// strategy. Stateless: selection happens per resource, on `transform`.
#[derive(Clone)]
pub struct Decryptor {
    license: Option<Arc<dyn License + Send + Sync>>,
}

impl Decryptor {
    /// `license` is the decrypted-content-key holder; without one, every
    /// protected resource read fails with
    /// [`Forbidden`](ResourceError::Forbidden) — the content is provably
    /// encrypted but key access was denied.
    pub fn new(license: Option<Arc<dyn License + Send + Sync>>) -> Self {
        Self { license }
    }

    /// Returns a resource serving plaintext, or the resource untouched when
    /// its link does not declare LCP encryption.
    pub fn transform(&self, resource: Box<dyn Resource>) -> Box<dyn Resource> {
        let encryption = match resource.link().properties.encryption() {
            Some(encryption) if encryption.scheme.as_deref() == Some(SCHEME) => encryption,
            _ => return resource,
        };

        let Some(license) = &self.license else {
            return Box::new(FailureResource::new(
                resource.link().clone(),
                ResourceError::Forbidden,
            ));
        };

        if encryption.is_deflated() || !is_cbc(&encryption) {
            Box::new(FullResource {
                original_length: encryption.original_length,
                deflated: encryption.is_deflated(),
                resource,
                license: Arc::clone(license),
                plaintext: OnceLock::new(),
            })
        } else {
            Box::new(CbcResource {
                resource,
                license: Arc::clone(license),
                plaintext_length: OnceLock::new(),
            })
        }
    }
}

fn is_cbc(encryption: &Encryption) -> bool {
    encryption.algorithm == CBC_ALGORITHM
}

/// Decrypts the whole underlying resource on first read and serves every
/// range from the cached plaintext.
///
/// The memoization is compute-once but unsynchronized against concurrent
/// first reads; redundant decryption is a performance cost only, since
/// deciphering the same ciphertext is deterministic.
struct FullResource {
    resource: Box<dyn Resource>,
    license: Arc<dyn License + Send + Sync>,
    deflated: bool,
    original_length: Option<u64>,
    plaintext: OnceLock<Result<Arc<[u8]>, ResourceError>>,
}

impl FullResource {
    fn plaintext(&self) -> Result<Arc<[u8]>, ResourceError> {
        self.plaintext
            .get_or_init(|| {
                decrypt_fully(self.resource.as_ref(), self.license.as_ref(), self.deflated)
                    .map(Arc::from)
                    .map_err(DecryptionError::into_resource_error)
            })
            .clone()
    }
}

impl Resource for FullResource {
    fn link(&self) -> &Link {
        self.resource.link()
    }

    fn length(&self) -> Result<u64, ResourceError> {
        match self.original_length {
            Some(length) => Ok(length),
            None => Ok(self.plaintext()?.len() as u64),
        }
    }

    fn read(&self, range: Option<Range<u64>>) -> Result<Vec<u8>, ResourceError> {
        let plaintext = self.plaintext()?;
        Ok(match range {
            Some(range) => plaintext[clamp_range(range, plaintext.len() as u64)].to_vec(),
            None => plaintext.to_vec(),
        })
    }
}

/// True random access into CBC ciphertext, without full decryption.
///
/// Every range read is independent: one underlying range read, one
/// decipher, no caching (blocks start at cipher-block boundaries that
/// rarely coincide across calls).
struct CbcResource {
    resource: Box<dyn Resource>,
    license: Arc<dyn License + Send + Sync>,
    plaintext_length: OnceLock<Result<u64, ResourceError>>,
}

impl CbcResource {
    fn plaintext_length(&self) -> Result<u64, ResourceError> {
        self.plaintext_length
            .get_or_init(|| {
                compute_plaintext_length(self.resource.as_ref(), self.license.as_ref())
                    .map_err(DecryptionError::into_resource_error)
            })
            .clone()
    }

    fn read_range(&self, range: Range<u64>) -> Result<Vec<u8>, DecryptionError> {
        let range = clamp_range(range, self.plaintext_length()?);
        if range.is_empty() {
            return Ok(Vec::new());
        }

        // The read starts one block early: the preceding ciphertext block is
        // the chaining/IV input for the first requested block.
        let block_position = range.start as u64 % AES_BLOCK_SIZE;
        let read_position = range.start as u64 - block_position;
        let blocks = (range.end as u64 - read_position).div_ceil(AES_BLOCK_SIZE) + 1;

        let encrypted_length = self.resource.length()?;
        let read_end = (read_position + blocks * AES_BLOCK_SIZE).min(encrypted_length);
        let encrypted = self.resource.read(Some(read_position..read_end))?;

        let decrypted = self
            .license
            .decipher(&encrypted)?
            .ok_or(DecryptionError::EmptyDecryptedData)?;

        // Discard the leading chaining bytes and any trailing overflow.
        let start = block_position as usize;
        let end = start + range.len();
        if decrypted.len() < end {
            return Err(DecryptionError::EmptyDecryptedData);
        }
        Ok(decrypted[start..end].to_vec())
    }
}

impl Resource for CbcResource {
    fn link(&self) -> &Link {
        self.resource.link()
    }

    fn length(&self) -> Result<u64, ResourceError> {
        self.plaintext_length()
    }

    fn read(&self, range: Option<Range<u64>>) -> Result<Vec<u8>, ResourceError> {
        match range {
            Some(range) => self
                .read_range(range)
                .map_err(DecryptionError::into_resource_error),
            // An unranged read takes the plain full-decryption path.
            None => decrypt_fully(self.resource.as_ref(), self.license.as_ref(), false)
                .map_err(DecryptionError::into_resource_error),
        }
    }
}

/// Reads and deciphers the entire resource, strips the PKCS7 padding and
/// optionally inflates the result.
fn decrypt_fully(
    resource: &dyn Resource,
    license: &dyn License,
    deflated: bool,
) -> Result<Vec<u8>, DecryptionError> {
    let encrypted = resource.read(None)?;
    let mut decrypted = license
        .decipher(&encrypted)?
        .ok_or(DecryptionError::EmptyDecryptedData)?;

    // The last byte is the padding length.
    let padding = decrypted.last().copied().unwrap_or(0) as usize;
    if padding == 0 || padding as u64 > AES_BLOCK_SIZE || padding > decrypted.len() {
        return Err(DecryptionError::EmptyDecryptedData);
    }
    decrypted.truncate(decrypted.len() - padding);

    if deflated {
        inflate(&decrypted)
    } else {
        Ok(decrypted)
    }
}

/// Plaintext size = ciphertext − one AES block (the IV) − the residual
/// padding, measured by deciphering only the last two blocks.
fn compute_plaintext_length(
    resource: &dyn Resource,
    license: &dyn License,
) -> Result<u64, DecryptionError> {
    let encrypted_length = resource.length()?;
    if encrypted_length < 2 * AES_BLOCK_SIZE {
        return Err(DecryptionError::InvalidCbcData);
    }

    let tail = resource.read(Some(encrypted_length - 2 * AES_BLOCK_SIZE..encrypted_length))?;
    let decrypted = license
        .decipher(&tail)?
        .ok_or(DecryptionError::EmptyDecryptedData)?;
    let padding = decrypted.last().copied().unwrap_or(0) as u64;
    if !(1..=AES_BLOCK_SIZE).contains(&padding) {
        return Err(DecryptionError::InvalidCbcData);
    }
    Ok(encrypted_length - AES_BLOCK_SIZE - padding)
}

fn inflate(data: &[u8]) -> Result<Vec<u8>, DecryptionError> {
    let mut inflated = Vec::new();
    flate2::read::DeflateDecoder::new(data)
        .read_to_end(&mut inflated)
        .map_err(DecryptionError::InflateFailed)?;
    Ok(inflated)
}
