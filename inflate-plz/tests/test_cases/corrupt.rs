use inflate_plz::decompress;
use rstest::rstest;

use super::*;

// Flips that still parse must reproduce the input exactly.
#[rstest]
fn test_single_byte_flip_never_wrong_success(
    #[values(Framing::Zlib, Framing::Gzip)] framing: Framing,
) {
    let data = corpus(2_000);
    let compressed = compress(framing, &data);
    for pos in 0..compressed.len() {
        let mut corrupt = compressed.clone();
        corrupt[pos] ^= 0xff;
        let mut writer = Vec::new();
        if decompress(&corrupt, &mut writer, framing).is_ok() {
            assert_eq!(writer, data, "flip at {pos} decoded to wrong output");
        }
    }
}

#[rstest]
fn test_header_flip_is_malformed(
    #[values(Framing::Zlib, Framing::Gzip)] framing: Framing,
) {
    let compressed = compress(framing, &noise(1_000));
    let mut corrupt = compressed.clone();
    corrupt[0] ^= 0xff;
    let result = decompress(&corrupt, Vec::new(), framing);
    assert_eq!(Outcome::from(&result), Outcome::MalformedInput);
}

#[rstest]
#[case::crc(0)]
#[case::isize(4)]
fn test_gzip_trailer_mismatch(#[case] offset: usize) {
    let mut compressed = compress_gzip(INPUT);
    let trailer = compressed.len() - 8;
    compressed[trailer + offset] ^= 0x01;
    let mut writer = Vec::new();
    let err = decompress(&compressed, &mut writer, Framing::Gzip).unwrap_err();
    assert!(err.is_malformed());
    assert_eq!(err.outcome().code(), -3);
}

#[test]
fn test_zlib_adler_mismatch() {
    let mut compressed = compress_zlib(INPUT);
    let last = compressed.len() - 1;
    compressed[last] ^= 0x01;
    let result = decompress(&compressed, Vec::new(), Framing::Zlib);
    assert_eq!(Outcome::from(&result), Outcome::MalformedInput);
}

#[test]
fn test_gzip_unknown_method() {
    let mut compressed = compress_gzip(INPUT);
    compressed[2] = 7;
    let err = decompress(&compressed, Vec::new(), Framing::Gzip).unwrap_err();
    assert!(matches!(
        err,
        InflateError::MalformedInput(msg) if msg.contains("method")
    ));
}

#[test]
fn test_garbage() {
    let result = decompress(b"plain text", Vec::new(), Framing::Raw);
    assert_eq!(Outcome::from(&result), Outcome::MalformedInput);
}
