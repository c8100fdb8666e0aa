use thiserror::Error;

use crate::framing::Framing;

pub mod flate;
pub mod gzip;

pub use flate::FlateEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    // more input or output space needed
    Ok,
    // logical end of the stream reached
    StreamEnd,
}

/// Progress made by a single [`Engine::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub consumed: usize,
    pub produced: usize,
    pub status: StepStatus,
}

impl Step {
    pub fn new(consumed: usize, produced: usize, status: StepStatus) -> Self {
        Step {
            consumed,
            produced,
            status,
        }
    }

    pub fn is_stream_end(&self) -> bool {
        matches!(self.status, StepStatus::StreamEnd)
    }

    pub fn made_progress(&self) -> bool {
        self.consumed > 0 || self.produced > 0
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("data| {0}")]
    Data(String),
    #[error("dictionary| {0:#010x}")]
    NeedDictionary(u32),
    #[error("memory")]
    Memory,
    #[error("version")]
    Version,
    // internal state clobbered, never valid
    #[error("stream")]
    Stream,
}

/// Incremental inflate capability driven by the chunked driver.
///
/// `step` must consume input and fill output until either the output
/// slice is full, the input slice is exhausted or the stream ended. `end`
/// releases whatever the engine holds and is called exactly once by the
/// owning session.
pub trait Engine: Sized {
    fn init(framing: Framing) -> Result<Self, EngineError>;

    fn step(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<Step, EngineError>;

    fn end(&mut self) {}
}
