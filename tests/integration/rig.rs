//! Test rig: a [`BridgeService`] wired to the full set of mocks.

use oscbridge::app::service::{BridgeIo, BridgeService};
use oscbridge::config::NetworkConfig;

use crate::mock_hw::{LogSink, MockConsole, MockNet, MockStore, MockSwitch, MockSystem, MockUdp};

pub struct Rig {
    pub service: BridgeService,
    pub udp: MockUdp,
    pub console: MockConsole,
    pub store: MockStore,
    pub switch: MockSwitch,
    pub net: MockNet,
    pub system: MockSystem,
    pub sink: LogSink,
    pub now_ms: u32,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::with_config(NetworkConfig::default())
    }

    pub fn with_config(config: NetworkConfig) -> Self {
        let mut sink = LogSink::new();
        let mut service = BridgeService::new(config);
        service.set_echo(false);
        service.start(&mut sink);
        Self {
            service,
            udp: MockUdp::new(),
            console: MockConsole::new(),
            store: MockStore::new(),
            switch: MockSwitch::default(),
            net: MockNet::default(),
            system: MockSystem::default(),
            sink,
            now_ms: 0,
        }
    }

    /// One loop iteration, advancing the clock by 1 ms.
    pub fn tick(&mut self) {
        self.now_ms = self.now_ms.wrapping_add(1);
        let mut io = BridgeIo {
            udp: &mut self.udp,
            console: &mut self.console,
            store: &mut self.store,
            switch: &mut self.switch,
            net: &self.net,
            system: &mut self.system,
            sink: &mut self.sink,
        };
        self.service.tick(self.now_ms, &mut io);
    }

    /// Tick until the inbound queue and console input are drained.
    pub fn settle(&mut self) {
        for _ in 0..64 {
            self.tick();
            if self.udp.inbound.is_empty() && self.console.input.is_empty() {
                break;
            }
        }
    }

    /// Type a line on the console, process it, and return the replies.
    pub fn command(&mut self, line: &str) -> Vec<String> {
        self.console.type_line(line);
        self.settle();
        self.console.take_lines()
    }

    pub fn press_switch(&mut self) {
        self.switch.pending = true;
        self.tick();
    }
}
