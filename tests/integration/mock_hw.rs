//! Mock adapters for integration tests.
//!
//! Each mock records every call so tests can assert on the full history
//! (datagrams sent, console replies, restarts) without sockets or GPIO.

use std::collections::{HashMap, VecDeque};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use oscbridge::adapters::nvs::{load_config, save_config};
use oscbridge::app::events::AppEvent;
use oscbridge::app::ports::{
    ConfigError, ConfigPort, DatagramPort, EventSink, MacAddress, NetworkPort, SocketError,
    StorageError, StoragePort, SwitchPort, SystemPort,
};
use oscbridge::config::NetworkConfig;
use oscbridge::console::transport::Transport;
use oscbridge::osc::{self, OscMessage};

// ── MockUdp ───────────────────────────────────────────────────

/// Datagram port with a scripted inbound queue and a log of sends.
#[derive(Default)]
pub struct MockUdp {
    pub inbound: VecDeque<(Vec<u8>, SocketAddr)>,
    pub sent: Vec<(SocketAddrV4, Vec<u8>)>,
    pub fail_sends: bool,
}

#[allow(dead_code)]
impl MockUdp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an encoded single-int message from a fixed sender.
    pub fn push_int(&mut self, address: &str, value: i32) {
        let msg = OscMessage::with_int(address, value).unwrap();
        let mut buf = [0u8; 128];
        let n = osc::encode(&msg, &mut buf).unwrap();
        self.push_raw(&buf[..n]);
    }

    pub fn push_raw(&mut self, data: &[u8]) {
        let from = SocketAddr::from(([192, 168, 1, 50], 9000));
        self.inbound.push_back((data.to_vec(), from));
    }

    /// Decoded view of every datagram sent so far.
    pub fn sent_messages(&self) -> Vec<(SocketAddrV4, OscMessage)> {
        self.sent
            .iter()
            .map(|(dest, bytes)| (*dest, osc::decode(bytes).unwrap()))
            .collect()
    }
}

impl DatagramPort for MockUdp {
    fn try_recv(&mut self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>, SocketError> {
        match self.inbound.pop_front() {
            Some((data, from)) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                Ok(Some((n, from)))
            }
            None => Ok(None),
        }
    }

    fn send_to(&mut self, data: &[u8], dest: SocketAddrV4) -> Result<(), SocketError> {
        if self.fail_sends {
            return Err(SocketError::Io(std::io::ErrorKind::ConnectionRefused));
        }
        self.sent.push((dest, data.to_vec()));
        Ok(())
    }
}

// ── MockConsole ───────────────────────────────────────────────

/// Transport fed from a byte queue; writes are captured as text.
/// Setting `disconnected` reports one peer disconnect on the next poll.
#[derive(Default)]
pub struct MockConsole {
    pub input: VecDeque<u8>,
    pub output: Vec<u8>,
    pub disconnected: bool,
}

#[allow(dead_code)]
impl MockConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_line(&mut self, line: &str) {
        self.input.extend(line.as_bytes());
        self.input.push_back(b'\n');
    }

    /// Captured output split into lines; clears the capture.
    pub fn take_lines(&mut self) -> Vec<String> {
        let text = String::from_utf8(std::mem::take(&mut self.output)).unwrap();
        text.lines().map(str::to_string).collect()
    }
}

impl Transport for MockConsole {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let mut n = 0;
        while n < buf.len() {
            match self.input.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), ()> {
        self.output.extend_from_slice(data);
        Ok(())
    }

    fn take_disconnected(&mut self) -> bool {
        std::mem::take(&mut self.disconnected)
    }
}

// ── MockStore ─────────────────────────────────────────────────

/// Key-value store backing a real config codec; can be made to fail.
#[derive(Default)]
pub struct MockStore {
    store: HashMap<String, Vec<u8>>,
    pub fail_writes: bool,
    pub saves: usize,
}

#[allow(dead_code)]
impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_count(&self) -> usize {
        self.store.len()
    }
}

impl StoragePort for MockStore {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        match self.store.get(&format!("{}::{}", namespace, key)) {
            Some(v) => {
                let n = v.len().min(buf.len());
                buf[..n].copy_from_slice(&v[..n]);
                Ok(n)
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Full);
        }
        self.store
            .insert(format!("{}::{}", namespace, key), data.to_vec());
        Ok(())
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        self.store.remove(&format!("{}::{}", namespace, key));
        Ok(())
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.store.contains_key(&format!("{}::{}", namespace, key))
    }
}

impl ConfigPort for MockStore {
    fn load(&self) -> NetworkConfig {
        load_config(self)
    }

    fn save(&mut self, config: &NetworkConfig) -> Result<(), ConfigError> {
        self.saves += 1;
        save_config(self, config)
    }
}

// ── MockNet ───────────────────────────────────────────────────

pub struct MockNet {
    pub up: bool,
    pub ip: Option<Ipv4Addr>,
    pub mac: MacAddress,
}

impl Default for MockNet {
    fn default() -> Self {
        Self {
            up: true,
            ip: Some(Ipv4Addr::new(192, 168, 1, 99)),
            mac: [0x24, 0x0A, 0xC4, 0x12, 0x34, 0x56],
        }
    }
}

impl NetworkPort for MockNet {
    fn link_up(&self) -> bool {
        self.up
    }

    fn local_ip(&self) -> Option<Ipv4Addr> {
        self.ip
    }

    fn mac(&self) -> MacAddress {
        self.mac
    }
}

// ── MockSwitch ────────────────────────────────────────────────

/// Switch that reports an edge on the ticks the test arms.
#[derive(Default)]
pub struct MockSwitch {
    pub pending: bool,
}

impl SwitchPort for MockSwitch {
    fn poll_edge(&mut self, _now_ms: u32) -> bool {
        std::mem::take(&mut self.pending)
    }
}

// ── MockSystem ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockSystem {
    pub restarts: Vec<&'static str>,
}

impl SystemPort for MockSystem {
    fn restart(&mut self, reason: &'static str) {
        self.restarts.push(reason);
    }
}

// ── LogSink ───────────────────────────────────────────────────

#[derive(Default)]
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
