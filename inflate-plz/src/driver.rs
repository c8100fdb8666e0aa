use std::io::{ErrorKind, Read, Write};
use std::marker::PhantomData;

use tracing::trace;

use crate::{
    engine::{Engine, FlateEngine},
    error::InflateError,
    framing::Framing,
    session::Session,
};

// Kept small so the two staging buffers stay well inside a 16k frame.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Byte counts for a successful call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Compressed bytes handed to the engine. Bytes after the end of the
    /// stream are not counted.
    pub consumed: u64,
    /// Decompressed bytes written to the sink.
    pub produced: u64,
}

/// Chunked fill/drain driver.
///
/// Holds configuration only. Each call opens its own [`Session`] and two
/// `CHUNK` sized staging buffers on the stack, so memory use does not
/// depend on the size of the input or of the output.
///
/// The sink is taken by value. Pass `&mut file` to keep ownership of the
/// handle, or `file` to have it closed when the call returns.
pub struct Inflater<E = FlateEngine, const CHUNK: usize = DEFAULT_CHUNK_SIZE> {
    framing: Framing,
    engine: PhantomData<fn() -> E>,
}

impl Inflater {
    pub fn new(framing: Framing) -> Self {
        Inflater::with_framing(framing)
    }
}

impl<E: Engine, const CHUNK: usize> Inflater<E, CHUNK> {
    pub fn with_framing(framing: Framing) -> Self {
        const { assert!(CHUNK > 0, "chunk size must be non zero") };
        Inflater {
            framing,
            engine: PhantomData,
        }
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    pub const fn chunk_size(&self) -> usize {
        CHUNK
    }

    pub fn decompress<W>(
        &self,
        input: &[u8],
        sink: W,
    ) -> Result<Summary, InflateError>
    where
        W: Write,
    {
        self.decompress_reader(input, sink)
    }

    /* 1. open session
     * 2. fill    - read up to CHUNK bytes, 0 => input exhausted
     * 3. drain   - step engine, write output, repeat while
     *                  output buffer full
     *                  input left in chunk and engine progressed
     * 4. repeat 2 until input exhausted or stream end
     *
     * session ends on drop, on every return path
     */
    pub fn decompress_reader<R, W>(
        &self,
        mut source: R,
        mut sink: W,
    ) -> Result<Summary, InflateError>
    where
        R: Read,
        W: Write,
    {
        let mut session = Session::<E>::open(self.framing)?;
        let mut input = [0u8; CHUNK];
        let mut output = [0u8; CHUNK];
        let mut summary = Summary::default();
        let mut read_any = false;

        'fill: loop {
            session.feed();
            let filled = match fill(&mut source, &mut input) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => return Err(session.fail(InflateError::Io(e))),
            };
            read_any = true;
            let mut pos = 0;

            loop {
                let step = session.step(&input[pos..filled], &mut output)?;
                pos += step.consumed;
                summary.consumed += step.consumed as u64;
                if step.produced > 0 {
                    if let Err(e) = sink.write_all(&output[..step.produced]) {
                        return Err(session.fail(InflateError::Io(e)));
                    }
                    summary.produced += step.produced as u64;
                }
                if step.is_stream_end() {
                    break 'fill;
                }
                let output_full = step.produced == CHUNK;
                let input_left = pos < filled && step.made_progress();
                if !(output_full || input_left) {
                    break;
                }
            }
        }

        if !session.is_finished() {
            if read_any {
                return Err(session.fail(InflateError::truncated()));
            }
            trace!("empty source");
            session.finish_empty();
        }
        if let Err(e) = sink.flush() {
            return Err(session.fail(InflateError::Io(e)));
        }
        trace!(
            consumed = summary.consumed,
            produced = summary.produced,
            "stream end"
        );
        Ok(summary)
    }
}

impl<E, const CHUNK: usize> Clone for Inflater<E, CHUNK> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, const CHUNK: usize> Copy for Inflater<E, CHUNK> {}

impl<E, const CHUNK: usize> std::fmt::Debug for Inflater<E, CHUNK> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inflater")
            .field("framing", &self.framing)
            .field("chunk", &CHUNK)
            .finish()
    }
}

// Reads until buf is full or the source is exhausted.
fn fill<R: Read>(source: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
