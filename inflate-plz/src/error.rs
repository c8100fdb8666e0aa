use std::io::Error;
use thiserror::Error;

use crate::engine::EngineError;

// zlib status codes, kept for harnesses that speak the numeric contract
pub const Z_OK: i32 = 0;
pub const Z_ERRNO: i32 = -1;
pub const Z_DATA_ERROR: i32 = -3;
pub const Z_MEM_ERROR: i32 = -4;
pub const Z_VERSION_ERROR: i32 = -6;

#[derive(Debug, Error)]
pub enum InflateError {
    // corrupt, truncated or dictionary-dependent stream
    #[error("malformed| {0}")]
    MalformedInput(String),
    #[error("memory| engine failed to allocate")]
    OutOfMemory,
    #[error("version| engine interface mismatch")]
    VersionMismatch,
    // source read or sink write
    #[error("io| {0}")]
    Io(Error),
}

impl InflateError {
    pub fn truncated() -> Self {
        InflateError::MalformedInput("input ended before end of stream".into())
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, InflateError::MalformedInput(_))
    }

    pub fn is_io(&self) -> bool {
        matches!(self, InflateError::Io(_))
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            InflateError::MalformedInput(_) => Outcome::MalformedInput,
            InflateError::OutOfMemory => Outcome::OutOfMemory,
            InflateError::VersionMismatch => Outcome::VersionMismatch,
            InflateError::Io(_) => Outcome::IoFailure,
        }
    }
}

impl From<EngineError> for InflateError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Data(msg) => InflateError::MalformedInput(msg),
            EngineError::NeedDictionary(adler) => InflateError::MalformedInput(
                format!("preset dictionary {adler:#010x} required"),
            ),
            EngineError::Memory => InflateError::OutOfMemory,
            EngineError::Version => InflateError::VersionMismatch,
            EngineError::Stream => {
                InflateError::MalformedInput("inflate state corrupted".into())
            }
        }
    }
}

/// Closed set of results a caller can observe for one decompression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    MalformedInput,
    OutOfMemory,
    VersionMismatch,
    IoFailure,
}

impl Outcome {
    /// zlib compatible status code.
    pub fn code(&self) -> i32 {
        match self {
            Outcome::Success => Z_OK,
            Outcome::MalformedInput => Z_DATA_ERROR,
            Outcome::OutOfMemory => Z_MEM_ERROR,
            Outcome::VersionMismatch => Z_VERSION_ERROR,
            Outcome::IoFailure => Z_ERRNO,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl<T> From<&Result<T, InflateError>> for Outcome {
    fn from(result: &Result<T, InflateError>) -> Self {
        match result {
            Ok(_) => Outcome::Success,
            Err(e) => e.outcome(),
        }
    }
}
