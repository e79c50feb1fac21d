use super::util::{FixedKeyLicense, encrypt, protected_link, sample_bytes};
use serde_json::json;
use std::sync::Arc;
use webpub::lcp::{CBC_ALGORITHM, Decryptor};
use webpub::manifest::{Link, Properties};
use webpub::resource::{BytesResource, Resource, ResourceError};

fn decryptor() -> Decryptor {
    Decryptor::new(Some(Arc::new(FixedKeyLicense)))
}

fn cbc_resource(plaintext: &[u8]) -> Box<dyn Resource> {
    let link = protected_link("/chapter.xhtml", CBC_ALGORITHM, None, None);
    let resource = BytesResource::new(link, encrypt(plaintext));
    decryptor().transform(Box::new(resource))
}

#[test]
fn test_length_and_full_read() {
    let plaintext = sample_bytes(100);
    let resource = cbc_resource(&plaintext);

    assert_eq!(100, resource.length().unwrap());
    assert_eq!(plaintext, resource.read(None).unwrap());
}

#[test]
fn test_range_reads_at_arbitrary_offsets() {
    let plaintext = sample_bytes(100);
    let resource = cbc_resource(&plaintext);

    // Block-aligned, straddling and single-byte ranges, in both the first
    // and the last cipher block.
    #[rustfmt::skip]
    let ranges = [
        (0, 1), (0, 16), (0, 100),
        (1, 15), (15, 17), (16, 32), (17, 33), (31, 64),
        (50, 50), (95, 100), (99, 100),
    ];

    for (start, end) in ranges {
        assert_eq!(
            &plaintext[start..end],
            resource.read(Some(start as u64..end as u64)).unwrap().as_slice(),
            "range {start}..{end}",
        );
    }
}

#[test]
fn test_ranges_are_clamped_to_the_plaintext_length() {
    let plaintext = sample_bytes(100);
    let resource = cbc_resource(&plaintext);

    assert_eq!(&plaintext[90..], resource.read(Some(90..200)).unwrap().as_slice());
    assert!(resource.read(Some(200..300)).unwrap().is_empty());
}

#[test]
fn test_two_block_ciphertext_is_an_empty_resource() {
    // IV plus a single all-padding block: the smallest valid ciphertext.
    let resource = cbc_resource(&[]);

    assert_eq!(0, resource.length().unwrap());
    assert!(resource.read(Some(0..10)).unwrap().is_empty());
    assert!(resource.read(None).unwrap().is_empty());
}

#[test]
fn test_truncated_ciphertext_is_rejected() {
    let link = protected_link("/chapter.xhtml", CBC_ALGORITHM, None, None);
    let resource = decryptor().transform(Box::new(BytesResource::new(link, vec![0u8; 16])));

    assert!(matches!(resource.length(), Err(ResourceError::Other(_))));
}

#[test]
fn test_reads_without_a_license_are_forbidden() {
    let link = protected_link("/chapter.xhtml", CBC_ALGORITHM, None, None);
    let resource = Decryptor::new(None)
        .transform(Box::new(BytesResource::new(link, encrypt(b"secret"))));

    assert!(matches!(resource.length(), Err(ResourceError::Forbidden)));
    assert!(matches!(resource.read(None), Err(ResourceError::Forbidden)));
}

#[test]
fn test_unprotected_resources_pass_through() {
    let resource = decryptor().transform(Box::new(BytesResource::new(
        Link::new("/plain.css"),
        &b"body {}"[..],
    )));

    assert_eq!(b"body {}".to_vec(), resource.read(None).unwrap());
}

#[test]
fn test_non_lcp_schemes_pass_through() {
    let mut link = Link::new("/other.bin");
    link.properties = Properties::default().with(
        "encryption",
        json!({ "scheme": "https://example.com/drm", "algorithm": CBC_ALGORITHM }),
    );
    let data = encrypt(b"still ciphertext");
    let resource = decryptor().transform(Box::new(BytesResource::new(link, data.clone())));

    // Another scheme's ciphertext is served untouched.
    assert_eq!(data, resource.read(None).unwrap());
}
