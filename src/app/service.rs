//! Bridge service: the hexagonal core.
//!
//! [`BridgeService`] owns the network configuration, the trigger latch,
//! the control-line decoder and the link monitor.  Every tick it runs the
//! handlers in a fixed order; all I/O goes through the port traits carried
//! in [`BridgeIo`], so the whole service runs against mock adapters in
//! tests.
//!
//! ```text
//!  SwitchPort ───▶ ┌──────────────────────────┐ ──▶ DatagramPort (out)
//!  Transport  ◀──▶ │      BridgeService        │ ──▶ ConfigPort
//!  DatagramPort ─▶ │ latch · commands · link   │ ──▶ EventSink
//!  NetworkPort ──▶ └──────────────────────────┘ ──▶ SystemPort
//! ```

use core::fmt::Display;
use core::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use log::{debug, error, info, warn};

use crate::config::{
    parse_addr, parse_port, NetworkConfig, ECHO_COMMANDS, OSC_CLEAR_ADDR, OSC_CONNECT_ADDR,
    OSC_CONNECT_VALUE, OSC_TRIGGER_ADDR,
};
use crate::console::codec::LineDecoder;
use crate::console::transport::Transport;
use crate::osc::{self, OscError, OscMessage, MAX_PACKET_SIZE};

use super::commands::{self, AddressField, Command, ConfigField, PortField, HELP_TEXT};
use super::events::AppEvent;
use super::link::{LinkEvent, LinkMonitor};
use super::ports::{
    ConfigPort, DatagramPort, EventSink, MacAddress, NetworkPort, SwitchPort, SystemPort,
};
use super::trigger::{clear_sequence, LatchState, TriggerController, TriggerOutcome};

/// Bytes read from the control channel per tick.
const CONSOLE_CHUNK: usize = 64;

// ───────────────────────────────────────────────────────────────
// Port bundle
// ───────────────────────────────────────────────────────────────

/// Borrowed adapters for one tick.
pub struct BridgeIo<'a, U, T, C, W, N, Y, E> {
    pub udp: &'a mut U,
    pub console: &'a mut T,
    pub store: &'a mut C,
    pub switch: &'a mut W,
    pub net: &'a N,
    pub system: &'a mut Y,
    pub sink: &'a mut E,
}

// ───────────────────────────────────────────────────────────────
// BridgeService
// ───────────────────────────────────────────────────────────────

pub struct BridgeService {
    config: NetworkConfig,
    trigger: TriggerController,
    decoder: LineDecoder,
    link: LinkMonitor,
    echo: bool,
}

impl BridgeService {
    /// Build the service around an already-loaded configuration.
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            config,
            trigger: TriggerController::new(),
            decoder: LineDecoder::new(),
            link: LinkMonitor::new(),
            echo: ECHO_COMMANDS,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        info!(
            "BridgeService started: in_port={} out_port={}",
            self.config.in_port, self.config.out_port
        );
        sink.emit(&AppEvent::Started(self.config));
    }

    /// Override command echo (on by default when `ECHO_COMMANDS` is set).
    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn trigger_state(&self) -> LatchState {
        self.trigger.state()
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// One loop iteration: switch, control channel, inbound OSC, link.
    pub fn tick<U, T, C, W, N, Y, E>(
        &mut self,
        now_ms: u32,
        io: &mut BridgeIo<'_, U, T, C, W, N, Y, E>,
    ) where
        U: DatagramPort,
        T: Transport,
        C: ConfigPort,
        W: SwitchPort,
        N: NetworkPort,
        Y: SystemPort,
        E: EventSink,
    {
        self.poll_switch(now_ms, io.switch, io.udp, io.sink);
        self.poll_console(io.console, io.store, io.net, io.sink);
        self.poll_osc(io.udp, io.sink);
        self.poll_link(io.net, io.system, io.sink);
    }

    // ── Switch ────────────────────────────────────────────────

    /// Sample the switch; an accepted edge re-arms the latch and clears
    /// every target.
    pub fn poll_switch(
        &mut self,
        now_ms: u32,
        switch: &mut impl SwitchPort,
        udp: &mut impl DatagramPort,
        sink: &mut impl EventSink,
    ) {
        if !switch.poll_edge(now_ms) {
            return;
        }
        info!("Switch pressed");
        self.trigger.on_reset();

        let mut sent = 0;
        for index in clear_sequence() {
            let Some(dest) = self.config.target_addr(index) else {
                continue;
            };
            // Indices are below TARGET_COUNT, so the cast is lossless.
            if self.send(udp, sink, OSC_CLEAR_ADDR, index as i32, dest) {
                sent += 1;
            }
        }
        sink.emit(&AppEvent::Cleared { sent });
    }

    // ── Inbound OSC ───────────────────────────────────────────

    /// Read at most one pending datagram and act on it.
    pub fn poll_osc(&mut self, udp: &mut impl DatagramPort, sink: &mut impl EventSink) {
        let mut buf = [0u8; MAX_PACKET_SIZE];
        match udp.try_recv(&mut buf) {
            Ok(Some((len, from))) => self.handle_datagram(&buf[..len], from, udp, sink),
            Ok(None) => {}
            Err(e) => warn!("OSC receive failed: {}", e),
        }
    }

    /// Decode one datagram and feed the trigger latch.
    pub fn handle_datagram(
        &mut self,
        data: &[u8],
        from: SocketAddr,
        udp: &mut impl DatagramPort,
        sink: &mut impl EventSink,
    ) {
        let msg = match osc::decode(data) {
            Ok(m) => m,
            Err(error) => {
                sink.emit(&AppEvent::MalformedPacket { error, from });
                return;
            }
        };

        if !msg.full_match(OSC_TRIGGER_ADDR) {
            let mut address = osc::OscAddress::new();
            // Decoded addresses already fit the same capacity.
            let _ = address.push_str(msg.address());
            sink.emit(&AppEvent::UnmatchedAddress { address, from });
            return;
        }

        let Some(value) = msg.int(0) else {
            sink.emit(&AppEvent::MalformedPacket {
                error: OscError::MissingArgument,
                from,
            });
            return;
        };

        match self.trigger.on_trigger(value) {
            TriggerOutcome::Fire { index } => {
                let Some(target) = self.config.target_addr(index) else {
                    return;
                };
                self.send(udp, sink, OSC_TRIGGER_ADDR, value, target);
                let peer = self.config.connect_addr();
                self.send(udp, sink, OSC_CONNECT_ADDR, OSC_CONNECT_VALUE, peer);
                sink.emit(&AppEvent::Triggered { value, target });
            }
            TriggerOutcome::Latched => sink.emit(&AppEvent::TriggerIgnored { value }),
            TriggerOutcome::OutOfRange => sink.emit(&AppEvent::TriggerOutOfRange { value }),
        }
    }

    /// Encode and send a single-int message.  Failures are reported and
    /// swallowed; returns whether the datagram left.
    fn send(
        &self,
        udp: &mut impl DatagramPort,
        sink: &mut impl EventSink,
        address: &str,
        value: i32,
        dest: SocketAddrV4,
    ) -> bool {
        let mut buf = [0u8; MAX_PACKET_SIZE];
        let encoded = OscMessage::with_int(address, value)
            .and_then(|m| osc::encode(&m, &mut buf).map(|len| (m, len)));
        let (msg, len) = match encoded {
            Ok(pair) => pair,
            Err(e) => {
                error!("OSC encode failed for {}: {}", address, e);
                return false;
            }
        };
        match udp.send_to(&buf[..len], dest) {
            Ok(()) => {
                debug!("OSC -> {} {}", dest, msg);
                true
            }
            Err(error) => {
                sink.emit(&AppEvent::SendFailed { dest, error });
                false
            }
        }
    }

    // ── Control channel ───────────────────────────────────────

    /// Read one chunk from the control channel and run every completed line.
    pub fn poll_console<T: Transport>(
        &mut self,
        console: &mut T,
        store: &mut impl ConfigPort,
        net: &impl NetworkPort,
        sink: &mut impl EventSink,
    ) {
        let mut buf = [0u8; CONSOLE_CHUNK];
        let read = console.read(&mut buf);
        if console.take_disconnected() {
            // A partial line never carries over to the next peer.
            debug!("Console: peer left, dropping {} buffered bytes", self.decoder.pending());
            self.decoder.reset();
        }
        let n = match read {
            Ok(0) => return,
            Ok(n) => n,
            Err(e) => {
                warn!("Console read failed: {:?}", e);
                return;
            }
        };

        let mut decoder = core::mem::take(&mut self.decoder);
        decoder.feed(&buf[..n], |line| {
            self.handle_line(line, console, store, net, sink);
        });
        self.decoder = decoder;
    }

    /// Execute one raw control line and write the replies.
    pub fn handle_line<T: Transport>(
        &mut self,
        line: &str,
        console: &mut T,
        store: &mut impl ConfigPort,
        net: &impl NetworkPort,
        sink: &mut impl EventSink,
    ) {
        let trimmed = line.trim();
        match commands::parse(trimmed) {
            Some(cmd) => self.execute(cmd, console, store, net, sink),
            None => debug!("Console: ignored {:?}", trimmed),
        }
        if self.echo {
            reply(console, trimmed);
        }
    }

    fn execute<T: Transport>(
        &mut self,
        cmd: Command<'_>,
        console: &mut T,
        store: &mut impl ConfigPort,
        net: &impl NetworkPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            Command::SetAddress { field, arg } => {
                let label = field.label();
                let Some(addr) = parse_addr(arg) else {
                    reply(console, &format!("❌ Invalid {} format.", label));
                    return;
                };
                match field {
                    AddressField::Ip => self.config.local_ip = addr,
                    AddressField::Subnet => self.config.subnet_mask = addr,
                    AddressField::Gateway => self.config.gateway = addr,
                }
                let ok = format!("✅ {} updated and saved.", label);
                self.persist(ConfigField::Address(field), &ok, console, store, sink);
            }
            Command::SetPort { field, arg } => {
                let Some(port) = parse_port(arg) else {
                    reply(console, "❌ Invalid port. Must be between 1 and 65535.");
                    return;
                };
                match field {
                    PortField::In => self.config.in_port = port,
                    PortField::Out => self.config.out_port = port,
                }
                let ok = format!("✅ {} set to {} and saved.", field.label(), port);
                self.persist(ConfigField::Port(field), &ok, console, store, sink);
            }
            Command::Get => {
                let c = &self.config;
                reply(console, &format!("IP: {}", c.local_ip));
                reply(console, &format!("Subnet: {}", c.subnet_mask));
                reply(console, &format!("Gateway: {}", c.gateway));
                reply(console, &format!("In Port: {}", c.in_port));
                reply(console, &format!("Out Port: {}", c.out_port));
            }
            Command::ShowIp => {
                let ip = net.local_ip().unwrap_or(Ipv4Addr::UNSPECIFIED);
                reply(console, &format!("ETH IP: {}", ip));
            }
            Command::ShowMac => {
                reply(console, &format!("ETH MAC: {}", MacDisplay(net.mac())));
            }
            Command::Help => {
                info!("{}", HELP_TEXT);
                for line in HELP_TEXT.lines() {
                    reply(console, line.trim_start());
                }
            }
        }
    }

    /// Save after an in-memory change.  The change stands either way.
    fn persist<T: Transport>(
        &mut self,
        field: ConfigField,
        ok_reply: &str,
        console: &mut T,
        store: &mut impl ConfigPort,
        sink: &mut impl EventSink,
    ) {
        match store.save(&self.config) {
            Ok(()) => {
                reply(console, ok_reply);
                sink.emit(&AppEvent::ConfigChanged {
                    field,
                    config: self.config,
                });
            }
            Err(error) => {
                reply(
                    console,
                    &format!("❌ {} updated but not saved: {}", field.label(), error),
                );
                sink.emit(&AppEvent::ConfigSaveFailed { field, error });
            }
        }
    }

    // ── Link ──────────────────────────────────────────────────

    /// Sample the interface.  Losing the link restarts the device.
    pub fn poll_link(
        &mut self,
        net: &impl NetworkPort,
        system: &mut impl SystemPort,
        sink: &mut impl EventSink,
    ) {
        match self.link.poll(net.link_up()) {
            Some(LinkEvent::Connected) => sink.emit(&AppEvent::LinkUp(net.local_ip())),
            Some(LinkEvent::Disconnected) => {
                sink.emit(&AppEvent::LinkLost);
                error!("ERROR: No Ethernet connection - Restarting...");
                system.restart("ethernet link lost");
            }
            None => {}
        }
    }
}

fn reply<T: Transport>(console: &mut T, line: &str) {
    if let Err(e) = console.write_line(line) {
        warn!("Console write failed: {:?}", e);
    }
}

/// `AA:BB:CC:DD:EE:FF` rendering of a hardware address.
pub struct MacDisplay(pub MacAddress);

impl Display for MacDisplay {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let m = &self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            m[0], m[1], m[2], m[3], m[4], m[5]
        )
    }
}
