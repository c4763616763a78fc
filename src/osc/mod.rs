//! OSC 1.0 addressed messages.
//!
//! Only single messages are handled; bundles are rejected by the decoder.
//! Storage is fixed-capacity so a message never allocates.
//!
//! ```text
//! ┌──────────────────┬───────────────────┬──────────────────────┐
//! │ Address (padded) │ Type tags (padded)│ Arguments (BE, 4B al)│
//! │ "/device/\0\0\0\0"│ ",i\0\0"          │ 00 00 00 03          │
//! └──────────────────┴───────────────────┴──────────────────────┘
//! ```

pub mod codec;

use core::fmt;

pub use codec::{decode, encode};

/// Longest accepted address pattern (bytes, excluding terminator).
pub const MAX_ADDRESS_LEN: usize = 64;
/// Most arguments carried by one message.
pub const MAX_ARGS: usize = 4;
/// Longest accepted string argument.
pub const MAX_STRING_LEN: usize = 64;
/// Largest datagram the receiver reads.
pub const MAX_PACKET_SIZE: usize = 512;

pub type OscAddress = heapless::String<MAX_ADDRESS_LEN>;

/// A single typed argument.
#[derive(Debug, Clone, PartialEq)]
pub enum OscArg {
    Int(i32),
    Float(f32),
    Str(heapless::String<MAX_STRING_LEN>),
}

impl OscArg {
    /// OSC type tag character.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Int(_) => b'i',
            Self::Float(_) => b'f',
            Self::Str(_) => b's',
        }
    }
}

/// An addressed message: path-like address plus typed arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct OscMessage {
    address: OscAddress,
    args: heapless::Vec<OscArg, MAX_ARGS>,
}

impl OscMessage {
    /// Empty message.  The address must start with `/`.
    pub fn new(address: &str) -> Result<Self, OscError> {
        if !address.starts_with('/') {
            return Err(OscError::BadAddress);
        }
        let mut a = OscAddress::new();
        a.push_str(address).map_err(|_| OscError::TooLong)?;
        Ok(Self {
            address: a,
            args: heapless::Vec::new(),
        })
    }

    /// Message with a single `int32` argument.
    pub fn with_int(address: &str, value: i32) -> Result<Self, OscError> {
        let mut msg = Self::new(address)?;
        msg.push(OscArg::Int(value))?;
        Ok(msg)
    }

    pub fn push(&mut self, arg: OscArg) -> Result<(), OscError> {
        self.args.push(arg).map_err(|_| OscError::TooManyArgs)
    }

    pub fn address(&self) -> &str {
        self.address.as_str()
    }

    pub fn args(&self) -> &[OscArg] {
        &self.args
    }

    /// Exact address comparison (no pattern wildcards).
    pub fn full_match(&self, address: &str) -> bool {
        self.address.as_str() == address
    }

    /// Integer argument at `index`, if present and of type `i`.
    pub fn int(&self, index: usize) -> Option<i32> {
        match self.args.get(index) {
            Some(OscArg::Int(v)) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for OscMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)?;
        for arg in &self.args {
            match arg {
                OscArg::Int(v) => write!(f, " {}", v)?,
                OscArg::Float(v) => write!(f, " {:.3}", v)?,
                OscArg::Str(s) => write!(f, " \"{}\"", s)?,
            }
        }
        Ok(())
    }
}

/// Codec failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscError {
    /// Zero-length packet.
    Empty,
    /// `#bundle` packets are not supported.
    Bundle,
    /// Address missing, not `/`-prefixed, or not UTF-8.
    BadAddress,
    /// Type tag string does not start with `,` or is not ASCII.
    BadTypeTag,
    /// Type tag the decoder does not understand.
    UnsupportedTag(u8),
    /// Packet ended before a field was complete.
    Truncated,
    /// Address or string argument exceeds fixed capacity.
    TooLong,
    /// More than [`MAX_ARGS`] arguments.
    TooManyArgs,
    /// Output buffer cannot hold the encoded message.
    BufferTooSmall,
    /// Expected argument absent or of the wrong type.
    MissingArgument,
}

impl fmt::Display for OscError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty packet"),
            Self::Bundle => write!(f, "bundles not supported"),
            Self::BadAddress => write!(f, "malformed address"),
            Self::BadTypeTag => write!(f, "malformed type tag string"),
            Self::UnsupportedTag(t) => write!(f, "unsupported type tag '{}'", *t as char),
            Self::Truncated => write!(f, "packet truncated"),
            Self::TooLong => write!(f, "field exceeds capacity"),
            Self::TooManyArgs => write!(f, "too many arguments"),
            Self::BufferTooSmall => write!(f, "output buffer too small"),
            Self::MissingArgument => write!(f, "missing or mistyped argument"),
        }
    }
}

impl std::error::Error for OscError {}
