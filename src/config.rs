//! Network configuration and compile-time bridge constants.
//!
//! [`NetworkConfig`] holds the five persisted settings.  Everything else
//! (target table, connect peer, OSC addresses, debounce interval) is fixed
//! at build time.

use core::net::{Ipv4Addr, SocketAddrV4};

use serde::{Deserialize, Serialize};

/// Name announced on the control channel and in the boot banner.
pub const DEVICE_NAME: &str = "BCG_MASTER";

/// Hostname assigned to the Ethernet interface.
pub const HOSTNAME: &str = "esp32-ethernet";

/// Echo every received control line back to the sender.
pub const ECHO_COMMANDS: bool = true;

/// Minimum time between accepted switch edges.
pub const DEBOUNCE_MS: u32 = 500;

/// Per-iteration yield of the main loop so the RTOS idle task can run.
pub const LOOP_YIELD_MS: u32 = 1;

/// TCP port of the host-simulation control console.
pub const HOST_CONSOLE_PORT: u16 = 2323;

// ── OSC addresses ─────────────────────────────────────────────

/// Inbound trigger address, also used for the per-target trigger broadcast.
pub const OSC_TRIGGER_ADDR: &str = "/device/";
/// Sent to the connect peer alongside every trigger.
pub const OSC_CONNECT_ADDR: &str = "/column/1/connect";
/// Sent to every target when the switch resets the latch.
pub const OSC_CLEAR_ADDR: &str = "/clear/";
/// Payload of the connect message.
pub const OSC_CONNECT_VALUE: i32 = 1;

// ── Targets ───────────────────────────────────────────────────

/// Number of entries in [`TARGETS`].
pub const TARGET_COUNT: usize = 8;

/// Per-index outbound destinations.  Trigger value `v` maps to `TARGETS[v - 1]`.
pub const TARGETS: [Ipv4Addr; TARGET_COUNT] = [
    Ipv4Addr::new(192, 168, 1, 101),
    Ipv4Addr::new(192, 168, 1, 102),
    Ipv4Addr::new(192, 168, 1, 103),
    Ipv4Addr::new(192, 168, 1, 104),
    Ipv4Addr::new(192, 168, 1, 105),
    Ipv4Addr::new(192, 168, 1, 106),
    Ipv4Addr::new(192, 168, 1, 107),
    Ipv4Addr::new(192, 168, 1, 108),
];

/// Show-control PC that receives the connect message.
pub const CONNECT_PEER: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 200);

/// Target index that receives a second clear after the full sweep.
/// Deployed peers rely on it, so it stays.
pub const CLEAR_REPEAT_INDEX: usize = 1;

// ── Persisted settings ────────────────────────────────────────

pub const DEFAULT_LOCAL_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 99);
pub const DEFAULT_SUBNET_MASK: Ipv4Addr = Ipv4Addr::new(255, 255, 255, 0);
pub const DEFAULT_GATEWAY: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 1);
pub const DEFAULT_IN_PORT: u16 = 7001;
pub const DEFAULT_OUT_PORT: u16 = 7000;

/// Network settings persisted in NVS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Static address of the Ethernet interface.
    pub local_ip: Ipv4Addr,
    pub subnet_mask: Ipv4Addr,
    pub gateway: Ipv4Addr,
    /// UDP port the inbound OSC socket listens on.
    pub in_port: u16,
    /// UDP destination port for every outbound OSC message.
    pub out_port: u16,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            local_ip: DEFAULT_LOCAL_IP,
            subnet_mask: DEFAULT_SUBNET_MASK,
            gateway: DEFAULT_GATEWAY,
            in_port: DEFAULT_IN_PORT,
            out_port: DEFAULT_OUT_PORT,
        }
    }
}

impl NetworkConfig {
    /// Prefix length of the subnet mask (number of leading one bits).
    pub fn prefix_len(&self) -> u8 {
        u32::from(self.subnet_mask).leading_ones() as u8
    }

    /// Outbound destination for a target table index.
    pub fn target_addr(&self, index: usize) -> Option<SocketAddrV4> {
        TARGETS
            .get(index)
            .map(|ip| SocketAddrV4::new(*ip, self.out_port))
    }

    /// Outbound destination of the connect peer.
    pub fn connect_addr(&self) -> SocketAddrV4 {
        SocketAddrV4::new(CONNECT_PEER, self.out_port)
    }
}

/// Parse a port argument.  Accepts decimal `1..=65535` only.
pub fn parse_port(arg: &str) -> Option<u16> {
    let n: i64 = arg.trim().parse().ok()?;
    if (1..=65535).contains(&n) {
        Some(n as u16)
    } else {
        None
    }
}

/// Parse a dotted-quad IPv4 address.
pub fn parse_addr(arg: &str) -> Option<Ipv4Addr> {
    arg.trim().parse().ok()
}
