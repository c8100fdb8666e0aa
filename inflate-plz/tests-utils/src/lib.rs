pub use bytes::BytesMut;
use bytes::BufMut;
use std::io::{self, ErrorKind, Read, Write};

use flate2::{Compression, GzBuilder};
use inflate_plz::{Framing, InflateError, Inflater, Summary};

pub const INPUT: &[u8] = b"hello world";

pub const CHUNK_SIZES: [usize; 7] = [16, 64, 512, 4096, 8192, 32768, 65536];

pub fn compress_raw(data: &[u8]) -> Vec<u8> {
    let mut encoder = flate2::write::DeflateEncoder::new(
        Vec::new(),
        Compression::default(),
    );
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn compress_zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder =
        flate2::write::ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn compress_gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder =
        flate2::write::GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

// FEXTRA + FNAME + FCOMMENT
pub fn compress_gzip_with_header(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzBuilder::new()
        .filename("corpus.bin")
        .comment("generated by tests-utils")
        .extra(vec![b'x'; 300])
        .mtime(1_700_000_000)
        .write(Vec::new(), Compression::best());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn compress(framing: Framing, data: &[u8]) -> Vec<u8> {
    match framing {
        Framing::Raw => compress_raw(data),
        Framing::Zlib => compress_zlib(data),
        Framing::Gzip => compress_gzip(data),
    }
}

/// Deterministic, poorly compressible bytes.
pub fn noise(len: usize) -> Vec<u8> {
    let mut state: u32 = 0x2545_f491;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

/// Text like input with long repeats, compresses well.
pub fn corpus(len: usize) -> Vec<u8> {
    b"the quick brown fox jumps over the lazy dog\n"
        .iter()
        .cycle()
        .take(len)
        .copied()
        .collect()
}

pub fn inflate_to_bytes<const CHUNK: usize>(
    framing: Framing,
    compressed: &[u8],
) -> Result<(BytesMut, Summary), InflateError> {
    let mut writer = BytesMut::new().writer();
    let summary = Inflater::<inflate_plz::FlateEngine, CHUNK>::with_framing(
        framing,
    )
    .decompress(compressed, &mut writer)?;
    Ok((writer.into_inner(), summary))
}

/// Accepts `limit` bytes then fails every write.
#[derive(Debug, Default)]
pub struct FailingWriter {
    pub limit: usize,
    pub written: Vec<u8>,
    pub attempts_after_failure: usize,
    failed: bool,
}

impl FailingWriter {
    pub fn new(limit: usize) -> Self {
        FailingWriter {
            limit,
            ..Default::default()
        }
    }
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.failed {
            self.attempts_after_failure += 1;
            return Err(io::Error::from(ErrorKind::BrokenPipe));
        }
        let room = self.limit - self.written.len();
        if room == 0 {
            self.failed = true;
            return Err(io::Error::other("disk full"));
        }
        let take = room.min(buf.len());
        self.written.extend_from_slice(&buf[..take]);
        Ok(take)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reports a zero length write, as a full device would.
pub struct ZeroWriter;

impl Write for ZeroWriter {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Ok(0)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes succeed, flush fails.
#[derive(Default)]
pub struct FlushFailWriter {
    pub written: Vec<u8>,
}

impl Write for FlushFailWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::other("flush failed"))
    }
}

/// Serves `data` in fragments of at most `step` bytes, failing with
/// `Interrupted` between fragments and with a hard error after
/// `fail_after` bytes when set.
pub struct TrickleReader<'a> {
    data: &'a [u8],
    step: usize,
    fail_after: Option<usize>,
    served: usize,
    interrupt: bool,
}

impl<'a> TrickleReader<'a> {
    pub fn new(data: &'a [u8], step: usize) -> Self {
        TrickleReader {
            data,
            step,
            fail_after: None,
            served: 0,
            interrupt: false,
        }
    }

    pub fn fail_after(mut self, at: usize) -> Self {
        self.fail_after = Some(at);
        self
    }
}

impl Read for TrickleReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(at) = self.fail_after
            && self.served >= at
        {
            return Err(io::Error::other("source failed"));
        }
        self.interrupt = !self.interrupt;
        if self.interrupt {
            return Err(io::Error::from(ErrorKind::Interrupted));
        }
        let take = self.step.min(buf.len()).min(self.data.len());
        buf[..take].copy_from_slice(&self.data[..take]);
        self.data = &self.data[take..];
        self.served += take;
        Ok(take)
    }
}
