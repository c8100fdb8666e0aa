use std::io::{Read, Write};

pub mod driver;
pub mod engine;
pub mod error;
pub mod framing;
pub mod session;

pub use driver::{DEFAULT_CHUNK_SIZE, Inflater, Summary};
pub use engine::{Engine, EngineError, FlateEngine, Step, StepStatus};
pub use error::{InflateError, Outcome};
pub use framing::Framing;

/// Inflates `input` into `sink` with the default engine and chunk size.
pub fn decompress<W>(
    input: &[u8],
    sink: W,
    framing: Framing,
) -> Result<Summary, InflateError>
where
    W: Write,
{
    Inflater::new(framing).decompress(input, sink)
}

pub fn decompress_reader<R, W>(
    source: R,
    sink: W,
    framing: Framing,
) -> Result<Summary, InflateError>
where
    R: Read,
    W: Write,
{
    Inflater::new(framing).decompress_reader(source, sink)
}
