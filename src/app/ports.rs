//! Port traits: the hexagonal boundary between bridge logic and the platform.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ BridgeService (domain)
//! ```
//!
//! Driven adapters (NVS, UDP socket, switch, Ethernet, event sinks)
//! implement these traits.  [`BridgeService`](super::service::BridgeService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use core::fmt;
use core::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use crate::config::NetworkConfig;

/// Full 6-byte hardware address.
pub type MacAddress = [u8; 6];

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the network configuration.
///
/// Callers validate values before [`save`](ConfigPort::save); the port
/// stores whatever it is given.
pub trait ConfigPort {
    /// Load configuration.  Any missing or unreadable key falls back to
    /// its compiled-in default.
    fn load(&self) -> NetworkConfig;

    /// Persist all five fields.  Keys are written one by one, so a power
    /// loss mid-save can leave a mix of old and new values.
    fn save(&mut self, config: &NetworkConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Namespaced key-value storage.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write (overwrite) a value.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Datagram port (domain ↔ UDP)
// ───────────────────────────────────────────────────────────────

/// Connectionless, non-blocking datagram socket.
pub trait DatagramPort {
    /// Receive one pending datagram into `buf`.
    /// Returns `Ok(None)` immediately when nothing is pending.
    fn try_recv(&mut self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>, SocketError>;

    /// Send one datagram.  Fire-and-forget: no delivery guarantee.
    fn send_to(&mut self, data: &[u8], dest: SocketAddrV4) -> Result<(), SocketError>;
}

// ───────────────────────────────────────────────────────────────
// Network interface port (link state, identity)
// ───────────────────────────────────────────────────────────────

/// Read-only view of the Ethernet interface.
pub trait NetworkPort {
    /// `true` while the interface is up with an address.
    fn link_up(&self) -> bool;

    /// Address currently assigned to the interface.
    fn local_ip(&self) -> Option<Ipv4Addr>;

    /// Hardware address of the interface.
    fn mac(&self) -> MacAddress;
}

// ───────────────────────────────────────────────────────────────
// Switch port (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Debounced physical input.
pub trait SwitchPort {
    /// Sample the input.  Returns `true` once per accepted rising edge.
    fn poll_edge(&mut self, now_ms: u32) -> bool;
}

// ───────────────────────────────────────────────────────────────
// System port (fatal handler)
// ───────────────────────────────────────────────────────────────

/// Process-level control used by the fatal error path.
pub trait SystemPort {
    /// Restart the device.  On hardware this does not return.
    fn restart(&mut self, reason: &'static str);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The backing store rejected a write.
    Storage(StorageError),
    /// A value could not be encoded.
    Encode,
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Generic I/O error.
    IoError,
}

/// Errors from [`DatagramPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketError {
    /// The OS socket call failed.
    Io(std::io::ErrorKind),
}

impl From<StorageError> for ConfigError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<std::io::Error> for SocketError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.kind())
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "storage: {}", e),
            Self::Encode => write!(f, "encode failed"),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl fmt::Display for SocketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(kind) => write!(f, "socket I/O: {}", kind),
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for StorageError {}
impl std::error::Error for SocketError {}
