//! Outbound application events.
//!
//! [`BridgeService`](super::service::BridgeService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them; in firmware they go to the serial log.

use core::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use crate::config::NetworkConfig;
use crate::osc::{OscAddress, OscError};

use super::commands::ConfigField;
use super::ports::{ConfigError, SocketError};

/// Structured events emitted by the bridge core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service has started with the loaded configuration.
    Started(NetworkConfig),

    /// A command changed a setting and it was persisted.
    ConfigChanged { field: ConfigField, config: NetworkConfig },

    /// A setting changed in memory but could not be persisted.
    ConfigSaveFailed { field: ConfigField, error: ConfigError },

    /// Latch went Idle → Fired; trigger and connect messages were sent.
    Triggered { value: i32, target: SocketAddrV4 },

    /// Trigger received while already Fired; nothing sent.
    TriggerIgnored { value: i32 },

    /// Trigger value outside the target table.
    TriggerOutOfRange { value: i32 },

    /// Switch edge accepted; latch reset and clear messages sent.
    Cleared { sent: usize },

    /// Inbound OSC address did not match the trigger address.
    UnmatchedAddress { address: OscAddress, from: SocketAddr },

    /// Inbound datagram could not be decoded.
    MalformedPacket { error: OscError, from: SocketAddr },

    /// An outbound datagram could not be sent.
    SendFailed { dest: SocketAddrV4, error: SocketError },

    /// The Ethernet interface came up.
    LinkUp(Option<Ipv4Addr>),

    /// The Ethernet interface went down; a restart follows.
    LinkLost,
}
