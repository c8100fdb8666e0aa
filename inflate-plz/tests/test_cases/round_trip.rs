use inflate_plz::{decompress, decompress_reader};
use rstest::rstest;

use super::*;

fn assert_round_trip(framing: Framing, data: &[u8]) {
    let compressed = compress(framing, data);
    let mut writer = Vec::new();
    let summary = decompress(&compressed, &mut writer, framing).unwrap();
    assert_eq!(writer, data);
    assert_eq!(summary.produced, data.len() as u64);
    assert_eq!(summary.consumed, compressed.len() as u64);
}

#[rstest]
fn test_round_trip_hello(
    #[values(Framing::Raw, Framing::Zlib, Framing::Gzip)] framing: Framing,
) {
    init_tracing();
    assert_round_trip(framing, INPUT);
}

#[rstest]
fn test_round_trip_sizes(
    #[values(Framing::Raw, Framing::Zlib, Framing::Gzip)] framing: Framing,
    #[values(1, 4095, 4096, 4097, 100_000)] len: usize,
) {
    assert_round_trip(framing, &noise(len));
    assert_round_trip(framing, &corpus(len));
}

#[rstest]
fn test_empty_stream(
    #[values(Framing::Raw, Framing::Zlib, Framing::Gzip)] framing: Framing,
) {
    let compressed = compress(framing, b"");
    assert!(!compressed.is_empty());
    let mut writer = Vec::new();
    let summary = decompress(&compressed, &mut writer, framing).unwrap();
    assert!(writer.is_empty());
    assert_eq!(summary.produced, 0);
}

#[rstest]
fn test_zero_length_input(
    #[values(Framing::Raw, Framing::Zlib, Framing::Gzip)] framing: Framing,
) {
    let mut writer = Vec::new();
    let result = decompress(&[], &mut writer, framing);
    assert_eq!(Outcome::from(&result), Outcome::Success);
    assert!(writer.is_empty());
}

// one input chunk expanding into hundreds of output chunks
#[rstest]
fn test_amplification_fully_drained(
    #[values(Framing::Raw, Framing::Zlib, Framing::Gzip)] framing: Framing,
) {
    let data = vec![0u8; 1 << 20];
    let compressed = compress(framing, &data);
    assert!(compressed.len() < inflate_plz::DEFAULT_CHUNK_SIZE);
    let (output, summary) =
        inflate_to_bytes::<{ inflate_plz::DEFAULT_CHUNK_SIZE }>(
            framing,
            &compressed,
        )
        .unwrap();
    assert_eq!(summary.produced, data.len() as u64);
    assert_eq!(output.as_ref(), data.as_slice());
}

#[test]
fn test_gzip_optional_header_fields() {
    let data = corpus(10_000);
    let compressed = compress_gzip_with_header(&data);
    let (output, _) = inflate_to_bytes::<16>(Framing::Gzip, &compressed)
        .unwrap();
    assert_eq!(output.as_ref(), data.as_slice());
}

#[test]
fn test_trailing_bytes_ignored() {
    let mut compressed = compress_gzip(INPUT);
    let len = compressed.len();
    // a second member is not decoded
    compressed.extend_from_slice(&compress_gzip(b"second member"));
    let mut writer = Vec::new();
    let summary = decompress(&compressed, &mut writer, Framing::Gzip).unwrap();
    assert_eq!(writer, INPUT);
    assert_eq!(summary.consumed, len as u64);
}

#[test]
fn test_reader_source() {
    let data = corpus(50_000);
    let compressed = compress_zlib(&data);
    let mut writer = Vec::new();
    decompress_reader(
        TrickleReader::new(&compressed, 7),
        &mut writer,
        Framing::Zlib,
    )
    .unwrap();
    assert_eq!(writer, data);
}

#[test]
fn test_wrong_framing_is_malformed() {
    let compressed = compress_zlib(INPUT);
    let result = decompress(&compressed, Vec::new(), Framing::Gzip);
    assert_eq!(Outcome::from(&result), Outcome::MalformedInput);
}
