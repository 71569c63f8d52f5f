//! Error types for the codec and its surface adapters.

use std::fmt;
use std::io;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Fixed-width integer kinds the primitive codec knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    /// Raw unsigned byte, 1 byte on the wire
    Byte,
    /// Signed 32-bit, 4 bytes big-endian
    I32,
    /// Signed 64-bit, 8 bytes big-endian
    I64,
}

impl IntKind {
    /// Encoded width in bytes
    #[inline(always)]
    pub const fn width(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::I32 => 4,
            Self::I64 => 8,
        }
    }

    /// Inclusive representable range
    pub const fn range(self) -> (i128, i128) {
        match self {
            Self::Byte => (0, u8::MAX as i128),
            Self::I32 => (i32::MIN as i128, i32::MAX as i128),
            Self::I64 => (i64::MIN as i128, i64::MAX as i128),
        }
    }

    /// Checks `value` against the representable range of this kind.
    pub fn check(self, value: i128) -> Result<()> {
        let (min, max) = self.range();
        if value < min || value > max {
            return Err(Error::Range { value, kind: self });
        }
        Ok(())
    }
}

impl fmt::Display for IntKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Byte => f.write_str("byte"),
            Self::I32 => f.write_str("i32"),
            Self::I64 => f.write_str("i64"),
        }
    }
}

/// Everything that can go wrong while encoding, decoding or persisting a surface.
///
/// After any error the handler's cursor position is unspecified; discard the handler.
#[derive(Debug, Error)]
pub enum Error {
    /// The cursor would run past the last channel byte of the surface.
    #[error("out of space: {requested} byte(s) at offset {offset} exceed capacity {capacity}")]
    OutOfSpace {
        offset: usize,
        requested: usize,
        capacity: usize,
    },

    /// Integer does not fit the target width.
    #[error("value {value} is out of range for {kind}")]
    Range { value: i128, kind: IntKind },

    /// String bytes are not valid UTF-8.
    #[error("invalid utf-8 in string payload: {0}")]
    Utf8(#[from] FromUtf8Error),

    /// A length or count prefix that cannot describe a real payload.
    #[error("invalid length prefix {len}")]
    InvalidLength { len: i32 },

    /// Dispatch could not route a value to the requested codec.
    #[error("cannot encode {value} as {descriptor}")]
    UnsupportedType { value: String, descriptor: String },

    /// Surface header could not be parsed.
    #[error("malformed surface header: {0}")]
    MalformedHeader(String),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    /// True for the errors raised while decoding payload bytes.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Utf8(_) | Self::InvalidLength { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
