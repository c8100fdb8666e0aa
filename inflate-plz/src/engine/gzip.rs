use flate2::{Crc, Decompress};
use tracing::trace;

use super::{EngineError, Step, StepStatus, flate::inflate};

// wiki - gzip - 1F 8B
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const CM_DEFLATE: u8 = 8;

const FHCRC: u8 = 0x02;
const FEXTRA: u8 = 0x04;
const FNAME: u8 = 0x08;
const FCOMMENT: u8 = 0x10;
const FRESERVED: u8 = 0xe0;

// optional fields in the order they appear after the fixed header
const FIELD_ORDER: [u8; 4] = [FEXTRA, FNAME, FCOMMENT, FHCRC];

// magic(2) + cm + flg + mtime(4) + xfl + os
const FIXED_LEN: usize = 10;
// crc32 + isize
const TRAILER_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderState {
    Fixed,
    ExtraLen,
    Extra(usize),
    Name,
    Comment,
    HeaderCrc,
    Done,
}

/// Member header parser that accepts the header split at any byte.
pub struct HeaderParser {
    state: HeaderState,
    scratch: [u8; FIXED_LEN],
    filled: usize,
    flags: u8,
    crc: Crc,
}

impl HeaderParser {
    pub fn new() -> Self {
        HeaderParser {
            state: HeaderState::Fixed,
            scratch: [0; FIXED_LEN],
            filled: 0,
            flags: 0,
            crc: Crc::new(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == HeaderState::Done
    }

    /// Returns the number of header bytes taken from `input`.
    pub fn feed(&mut self, input: &[u8]) -> Result<usize, EngineError> {
        let mut consumed = 0;
        for &byte in input {
            if self.is_done() {
                break;
            }
            self.push(byte)?;
            consumed += 1;
        }
        Ok(consumed)
    }

    fn push(&mut self, byte: u8) -> Result<(), EngineError> {
        if self.state != HeaderState::HeaderCrc {
            self.crc.update(&[byte]);
        }
        match self.state {
            HeaderState::Fixed => {
                if self.collect(byte, FIXED_LEN) {
                    self.check_fixed()?;
                    self.state = self.next_field(0);
                }
            }
            HeaderState::ExtraLen => {
                if self.collect(byte, 2) {
                    let xlen =
                        u16::from_le_bytes([self.scratch[0], self.scratch[1]]);
                    self.state = match xlen {
                        0 => self.next_field(1),
                        n => HeaderState::Extra(n as usize),
                    };
                }
            }
            HeaderState::Extra(1) => self.state = self.next_field(1),
            HeaderState::Extra(remaining) => {
                self.state = HeaderState::Extra(remaining - 1)
            }
            HeaderState::Name if byte == 0 => self.state = self.next_field(2),
            HeaderState::Comment if byte == 0 => {
                self.state = self.next_field(3)
            }
            HeaderState::Name | HeaderState::Comment => {}
            HeaderState::HeaderCrc => {
                if self.collect(byte, 2) {
                    let expected =
                        u16::from_le_bytes([self.scratch[0], self.scratch[1]]);
                    let actual = (self.crc.sum() & 0xffff) as u16;
                    if expected != actual {
                        return Err(EngineError::Data(
                            "gzip header crc mismatch".into(),
                        ));
                    }
                    self.state = HeaderState::Done;
                }
            }
            HeaderState::Done => {}
        }
        Ok(())
    }

    // true once `len` bytes have been gathered into scratch
    fn collect(&mut self, byte: u8, len: usize) -> bool {
        self.scratch[self.filled] = byte;
        self.filled += 1;
        if self.filled == len {
            self.filled = 0;
            true
        } else {
            false
        }
    }

    fn check_fixed(&mut self) -> Result<(), EngineError> {
        if self.scratch[..2] != GZIP_MAGIC {
            return Err(EngineError::Data("incorrect gzip magic".into()));
        }
        if self.scratch[2] != CM_DEFLATE {
            return Err(EngineError::Data(format!(
                "unknown gzip compression method {}",
                self.scratch[2]
            )));
        }
        self.flags = self.scratch[3];
        if self.flags & FRESERVED != 0 {
            return Err(EngineError::Data("reserved gzip flags set".into()));
        }
        Ok(())
    }

    fn next_field(&self, from: usize) -> HeaderState {
        FIELD_ORDER[from..]
            .iter()
            .find(|flag| self.flags & **flag != 0)
            .map_or(HeaderState::Done, |flag| match *flag {
                FEXTRA => HeaderState::ExtraLen,
                FNAME => HeaderState::Name,
                FCOMMENT => HeaderState::Comment,
                _ => HeaderState::HeaderCrc,
            })
    }
}

impl Default for HeaderParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects the crc32 and isize that close a member.
#[derive(Default)]
pub struct TrailerParser {
    buf: [u8; TRAILER_LEN],
    filled: usize,
}

impl TrailerParser {
    pub fn is_done(&self) -> bool {
        self.filled == TRAILER_LEN
    }

    pub fn feed(&mut self, input: &[u8]) -> usize {
        let take = input.len().min(TRAILER_LEN - self.filled);
        self.buf[self.filled..self.filled + take]
            .copy_from_slice(&input[..take]);
        self.filled += take;
        take
    }

    pub fn verify(&self, crc: &Crc) -> Result<(), EngineError> {
        let expected_crc = u32::from_le_bytes([
            self.buf[0],
            self.buf[1],
            self.buf[2],
            self.buf[3],
        ]);
        let expected_size = u32::from_le_bytes([
            self.buf[4],
            self.buf[5],
            self.buf[6],
            self.buf[7],
        ]);
        if expected_crc != crc.sum() {
            return Err(EngineError::Data("gzip crc32 mismatch".into()));
        }
        if expected_size != crc.amount() {
            return Err(EngineError::Data("gzip isize mismatch".into()));
        }
        Ok(())
    }
}

enum Phase {
    Header(HeaderParser),
    Body,
    Trailer(TrailerParser),
    Done,
}

/// Wraps a raw inflater with the framing of a single gzip member.
pub struct GzipMember {
    phase: Phase,
    crc: Crc,
}

impl GzipMember {
    pub fn new() -> Self {
        GzipMember {
            phase: Phase::Header(HeaderParser::new()),
            crc: Crc::new(),
        }
    }

    pub fn step(
        &mut self,
        inflater: &mut Decompress,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<Step, EngineError> {
        let mut consumed = 0;
        let mut produced = 0;
        loop {
            match &mut self.phase {
                Phase::Header(parser) => {
                    consumed += parser.feed(&input[consumed..])?;
                    if !parser.is_done() {
                        break;
                    }
                    trace!("gzip header parsed");
                    self.phase = Phase::Body;
                }
                Phase::Body => {
                    let step = inflate(
                        inflater,
                        &input[consumed..],
                        &mut output[produced..],
                    )?;
                    self.crc
                        .update(&output[produced..produced + step.produced]);
                    consumed += step.consumed;
                    produced += step.produced;
                    if !step.is_stream_end() {
                        break;
                    }
                    self.phase = Phase::Trailer(TrailerParser::default());
                }
                Phase::Trailer(trailer) => {
                    consumed += trailer.feed(&input[consumed..]);
                    if !trailer.is_done() {
                        break;
                    }
                    trailer.verify(&self.crc)?;
                    trace!(size = self.crc.amount(), "gzip trailer verified");
                    self.phase = Phase::Done;
                }
                Phase::Done => {
                    return Ok(Step::new(
                        consumed,
                        produced,
                        StepStatus::StreamEnd,
                    ));
                }
            }
        }
        Ok(Step::new(consumed, produced, StepStatus::Ok))
    }
}

impl Default for GzipMember {
    fn default() -> Self {
        Self::new()
    }
}
