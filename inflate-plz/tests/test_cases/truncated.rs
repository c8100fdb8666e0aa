use inflate_plz::decompress;
use rstest::rstest;

use super::*;

#[rstest]
fn test_every_prefix_is_malformed(
    #[values(Framing::Raw, Framing::Zlib, Framing::Gzip)] framing: Framing,
) {
    let data = corpus(3_000);
    let compressed = compress(framing, &data);
    for len in 1..compressed.len() {
        let result = decompress(&compressed[..len], Vec::new(), framing);
        assert_eq!(
            Outcome::from(&result),
            Outcome::MalformedInput,
            "prefix of {len} bytes"
        );
    }
}

#[test]
fn test_truncated_keeps_partial_output() {
    init_tracing();
    let data = noise(20_000);
    let compressed = compress_gzip(&data);
    let cut = &compressed[..compressed.len() / 2];
    let mut writer = Vec::new();
    let err = decompress(cut, &mut writer, Framing::Gzip).unwrap_err();
    assert!(err.is_malformed());
    assert!(!writer.is_empty());
    assert!(data.starts_with(&writer));
}

#[test]
fn test_truncated_gzip_trailer() {
    let compressed = compress_gzip(INPUT);
    let cut = &compressed[..compressed.len() - 4];
    let mut writer = Vec::new();
    let err = decompress(cut, &mut writer, Framing::Gzip).unwrap_err();
    assert!(err.is_malformed());
    // body decoded, trailer incomplete
    assert_eq!(writer, INPUT);
}
