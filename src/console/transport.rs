//! Transport abstraction for the control channel.
//!
//! Concrete implementations:
//! - UART2 console on ESP32 (`adapters::console::UartConsole`)
//! - TCP console for host simulation (`adapters::console::TcpConsole`)
//! - [`NullTransport`] when no channel is wired
//!
//! The command handler is generic over `Transport`, so swapping the
//! channel requires no change to command processing.

/// Byte-oriented, non-blocking transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns 0 if no data is available; never blocks.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write all of `data` to the transport.
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Returns `true` once after the peer went away since the last call.
    /// Channels without sessions never disconnect.
    fn take_disconnected(&mut self) -> bool {
        false
    }

    /// Write one text line followed by `\n`.
    fn write_line(&mut self, line: &str) -> Result<(), Self::Error> {
        self.write(line.as_bytes())?;
        self.write(b"\n")
    }
}

/// Errors from the concrete console transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// No peer attached to the channel.
    NotConnected,
    /// Underlying driver or socket failure.
    Io,
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected"),
            Self::Io => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for TransportError {}

/// A transport that discards all writes and never reads.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = core::convert::Infallible;

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(0)
    }

    fn write(&mut self, _data: &[u8]) -> Result<(), Self::Error> {
        Ok(())
    }
}
