use std::str::FromStr;

use thiserror::Error;

pub const RAW: &str = "raw";
pub const DEFLATE: &str = "deflate";
pub const ZLIB: &str = "zlib";
pub const GZIP: &str = "gzip";

/// Container around the deflate stream. Chosen by the caller, never
/// sniffed from the input.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Framing {
    /// Bare RFC 1951 stream.
    Raw,
    /// RFC 1950 header and adler32 trailer. Same as the http "deflate"
    /// content coding.
    Zlib,
    /// RFC 1952 member header and crc32/isize trailer.
    #[default]
    Gzip,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown framing| {0}")]
pub struct UnknownFraming(pub String);

impl AsRef<str> for Framing {
    fn as_ref(&self) -> &str {
        match self {
            Framing::Raw => RAW,
            Framing::Zlib => ZLIB,
            Framing::Gzip => GZIP,
        }
    }
}

impl FromStr for Framing {
    type Err = UnknownFraming;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            RAW => Ok(Framing::Raw),
            ZLIB | DEFLATE => Ok(Framing::Zlib),
            GZIP => Ok(Framing::Gzip),
            _ => Err(UnknownFraming(s.to_string())),
        }
    }
}

impl std::fmt::Display for Framing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}
