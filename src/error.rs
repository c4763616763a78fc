//! Unified error type for the bridge firmware.
//!
//! Each port has its own error enum; bring-up code funnels them into
//! [`Error`] so `main` handles every failure the same way.  All variants
//! are `Copy`.

use core::fmt;

use crate::app::ports::{SocketError, StorageError};
use crate::console::transport::TransportError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Non-volatile storage could not be opened or written.
    Storage(StorageError),
    /// The UDP socket could not be bound or used.
    Socket(SocketError),
    /// The control console could not be opened.
    Transport(TransportError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Socket(e) => write!(f, "socket: {e}"),
            Self::Transport(e) => write!(f, "console: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<SocketError> for Error {
    fn from(e: SocketError) -> Self {
        Self::Socket(e)
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
