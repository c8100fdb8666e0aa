use flate2::{Decompress, DecompressError, FlushDecompress, Status};

use super::{Engine, EngineError, Step, StepStatus, gzip::GzipMember};
use crate::framing::Framing;

/// [`Engine`] backed by `flate2`.
///
/// Raw and zlib streams go straight to [`Decompress`]. Gzip members are
/// unwrapped by [`GzipMember`] around a raw inflater, so the same code path
/// works with every `flate2` backend.
pub struct FlateEngine {
    inflater: Decompress,
    member: Option<GzipMember>,
}

impl Engine for FlateEngine {
    fn init(framing: Framing) -> Result<Self, EngineError> {
        let (zlib_header, member) = match framing {
            Framing::Raw => (false, None),
            Framing::Zlib => (true, None),
            Framing::Gzip => (false, Some(GzipMember::new())),
        };
        Ok(FlateEngine {
            inflater: Decompress::new(zlib_header),
            member,
        })
    }

    fn step(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<Step, EngineError> {
        match self.member.as_mut() {
            Some(member) => member.step(&mut self.inflater, input, output),
            None => inflate(&mut self.inflater, input, output),
        }
    }
}

/* Runs the inflater until one of
 *      output full
 *      input exhausted
 *      stream end
 *      no progress (more input needed)
 */
pub(crate) fn inflate(
    inflater: &mut Decompress,
    input: &[u8],
    output: &mut [u8],
) -> Result<Step, EngineError> {
    let mut consumed = 0;
    let mut produced = 0;
    loop {
        let before_in = inflater.total_in();
        let before_out = inflater.total_out();
        let status = inflater
            .decompress(
                &input[consumed..],
                &mut output[produced..],
                FlushDecompress::None,
            )
            .map_err(map_error)?;
        let read = (inflater.total_in() - before_in) as usize;
        let written = (inflater.total_out() - before_out) as usize;
        consumed += read;
        produced += written;
        match status {
            Status::StreamEnd => {
                return Ok(Step::new(consumed, produced, StepStatus::StreamEnd));
            }
            Status::Ok | Status::BufError => {
                if produced == output.len()
                    || consumed == input.len()
                    || (read == 0 && written == 0)
                {
                    return Ok(Step::new(consumed, produced, StepStatus::Ok));
                }
            }
        }
    }
}

fn map_error(e: DecompressError) -> EngineError {
    match e.needs_dictionary() {
        Some(adler) => EngineError::NeedDictionary(adler),
        None => EngineError::Data(e.to_string()),
    }
}
