use repkit_core::hash::{md5_bytes, md5_file};
use std::fs;

#[test]
fn known_vectors() {
    // RFC 1321 test suite values.
    assert_eq!(md5_bytes(b""), "d41d8cd98f00b204e9800998ecf8427e");
    assert_eq!(md5_bytes(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
    assert_eq!(
        md5_bytes(b"message digest"),
        "f96b697d7cb7938d525a2f31aaf161d0"
    );
}

#[test]
fn file_digest_matches_byte_digest_across_chunk_boundaries() {
    let td = tempfile::tempdir().unwrap();
    // Larger than the 64 KiB read chunk, and not a multiple of it.
    let bytes: Vec<u8> = (0..200_001u32).map(|i| (i % 251) as u8).collect();
    let path = td.path().join("big.bin");
    fs::write(&path, &bytes).unwrap();

    let once = md5_file(&path).unwrap();
    assert_eq!(once, md5_bytes(&bytes));
    // Deterministic across repeated reads.
    assert_eq!(once, md5_file(&path).unwrap());
}

#[test]
fn unreadable_file_is_an_error_not_a_digest() {
    let td = tempfile::tempdir().unwrap();
    let err = md5_file(&td.path().join("absent.bin")).expect_err("missing file");
    assert!(format!("{err:#}").contains("absent.bin"));
}
