//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each application event as one
//! tagged log line (UART on the device, stderr on the host).

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(c) => {
                info!(
                    "CFG | ip={}/{} gw={} in={} out={}",
                    c.local_ip,
                    c.prefix_len(),
                    c.gateway,
                    c.in_port,
                    c.out_port
                );
            }
            AppEvent::ConfigChanged { field, config } => {
                info!(
                    "CFG | {} saved (in={} out={})",
                    field.label(),
                    config.in_port,
                    config.out_port
                );
            }
            AppEvent::ConfigSaveFailed { field, error: e } => {
                error!("CFG | {} not persisted: {}", field.label(), e);
            }
            AppEvent::Triggered { value, target } => {
                info!("TRIG | fired v={} -> {}", value, target);
            }
            AppEvent::TriggerIgnored { value } => {
                info!("TRIG | latched, ignoring v={}", value);
            }
            AppEvent::TriggerOutOfRange { value } => {
                warn!("TRIG | v={} out of range, dropped", value);
            }
            AppEvent::Cleared { sent } => {
                info!("TRIG | reset, {} clears sent", sent);
            }
            AppEvent::UnmatchedAddress { address, from } => {
                info!(
                    "OSC | Received OSC message with unmatched address. ({} from {})",
                    address, from
                );
            }
            AppEvent::MalformedPacket { error: e, from } => {
                warn!("OSC | dropped packet from {}: {}", from, e);
            }
            AppEvent::SendFailed { dest, error: e } => {
                warn!("OSC | send to {} failed: {}", dest, e);
            }
            AppEvent::LinkUp(ip) => match ip {
                Some(ip) => info!("LINK | up, ip={}", ip),
                None => info!("LINK | up, no address yet"),
            },
            AppEvent::LinkLost => {
                error!("LINK | down");
            }
        }
    }
}
