use super::util::{FixedKeyLicense, VoidLicense, encrypt, protected_link, sample_bytes};
use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::io::Write;
use std::sync::Arc;
use webpub::lcp::{CBC_ALGORITHM, Decryptor};
use webpub::resource::{BytesResource, Resource, ResourceError};

const GCM_ALGORITHM: &str = "http://www.w3.org/2009/xmlenc11#aes256-gcm";

fn decryptor() -> Decryptor {
    Decryptor::new(Some(Arc::new(FixedKeyLicense)))
}

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

#[test]
fn test_deflated_resource_is_inflated() {
    let plaintext = b"the quick brown fox jumps over the lazy dog ".repeat(100);
    let link = protected_link(
        "/chapter.xhtml",
        CBC_ALGORITHM,
        Some("deflate"),
        Some(plaintext.len() as u64),
    );
    let resource = decryptor().transform(Box::new(BytesResource::new(
        link,
        encrypt(&deflate(&plaintext)),
    )));

    assert_eq!(plaintext.len() as u64, resource.length().unwrap());
    assert_eq!(plaintext, resource.read(None).unwrap());
    assert_eq!(&plaintext[100..200], resource.read(Some(100..200)).unwrap().as_slice());
}

#[test]
fn test_non_cbc_algorithms_decrypt_fully() {
    let plaintext = sample_bytes(500);
    let link = protected_link("/audio.mp3", GCM_ALGORITHM, None, None);
    let resource =
        decryptor().transform(Box::new(BytesResource::new(link, encrypt(&plaintext))));

    assert_eq!(500, resource.length().unwrap());
    assert_eq!(plaintext, resource.read(None).unwrap());
    assert_eq!(&plaintext[0..10], resource.read(Some(0..10)).unwrap().as_slice());
}

#[test]
fn test_declared_original_length_wins() {
    let plaintext = sample_bytes(500);
    let link = protected_link("/audio.mp3", GCM_ALGORITHM, None, Some(480));
    let resource =
        decryptor().transform(Box::new(BytesResource::new(link, encrypt(&plaintext))));

    // The declaration is trusted without triggering a decryption.
    assert_eq!(480, resource.length().unwrap());
}

#[test]
fn test_license_yielding_no_data_is_an_error() {
    let link = protected_link("/chapter.xhtml", CBC_ALGORITHM, Some("deflate"), None);
    let resource = Decryptor::new(Some(Arc::new(VoidLicense)))
        .transform(Box::new(BytesResource::new(link, encrypt(b"payload"))));

    assert!(matches!(resource.read(None), Err(ResourceError::Other(_))));
}
