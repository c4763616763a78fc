//! OSC trigger bridge: main entry point.
//!
//! Hexagonal architecture around a single cooperative loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  UdpOscSocket    UartConsole/TcpConsole   NvsAdapter           │
//! │  (DatagramPort)  (Transport)              (Config+Storage)     │
//! │  EspEthernet     SwitchDriver             LogEventSink         │
//! │  (NetworkPort)   (SwitchPort)             (EventSink)          │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            BridgeService (pure logic)                  │    │
//! │  │  trigger latch · command table · link monitor          │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use oscbridge::adapters::log_sink::LogEventSink;
use oscbridge::adapters::nvs::NvsAdapter;
use oscbridge::adapters::system::Restarter;
use oscbridge::adapters::time::MonotonicClock;
use oscbridge::adapters::udp::UdpOscSocket;
use oscbridge::app::ports::{ConfigPort, DatagramPort, NetworkPort, SwitchPort};
use oscbridge::app::service::{BridgeIo, BridgeService};
use oscbridge::config::{DEVICE_NAME, LOOP_YIELD_MS};
use oscbridge::console::transport::Transport;
use oscbridge::drivers::watchdog::Watchdog;
use oscbridge::pins::SWITCH_GPIO;
use oscbridge::Error;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Bootstrap ──────────────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }
    #[cfg(not(target_os = "espidf"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("╔══════════════════════════════════════╗");
    info!("║  {} v{}", DEVICE_NAME, env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let nvs = NvsAdapter::new().map_err(Error::from)?;
    let config = nvs.load();

    // ── 3. Platform bring-up ──────────────────────────────────
    platform::run(nvs, config)
}

/// Shared loop: tick the service, feed the watchdog, yield.
fn run_bridge<U, T, C, W, N>(
    config: oscbridge::config::NetworkConfig,
    mut udp: U,
    mut console: T,
    mut store: C,
    mut switch: W,
    net: N,
) -> Result<()>
where
    U: DatagramPort,
    T: Transport,
    C: ConfigPort,
    W: SwitchPort,
    N: NetworkPort,
{
    let watchdog = Watchdog::new();
    let clock = MonotonicClock::new();
    let mut sink = LogEventSink::new();
    let mut system = Restarter::new();

    let mut service = BridgeService::new(config);
    service.start(&mut sink);
    info!("{} ready on GPIO{} switch. Entering loop.", DEVICE_NAME, SWITCH_GPIO);

    loop {
        let mut io = BridgeIo {
            udp: &mut udp,
            console: &mut console,
            store: &mut store,
            switch: &mut switch,
            net: &net,
            system: &mut system,
            sink: &mut sink,
        };
        service.tick(clock.uptime_ms(), &mut io);
        watchdog.feed();

        #[cfg(target_os = "espidf")]
        esp_idf_hal::delay::FreeRtos::delay_ms(LOOP_YIELD_MS);
        #[cfg(not(target_os = "espidf"))]
        std::thread::sleep(std::time::Duration::from_millis(u64::from(LOOP_YIELD_MS)));
    }
}

#[cfg(target_os = "espidf")]
mod platform {
    use esp_idf_hal::gpio::{PinDriver, Pull};
    use esp_idf_hal::peripherals::Peripherals;
    use esp_idf_svc::eventloop::EspSystemEventLoop;

    use oscbridge::adapters::console::UartConsole;
    use oscbridge::adapters::ethernet::{EspEthernet, EthPins};
    use oscbridge::config::NetworkConfig;
    use oscbridge::drivers::switch::SwitchDriver;
    use oscbridge::pins::{LOG_UART_RX_GPIO, LOG_UART_TX_GPIO};

    use super::*;

    pub fn run(nvs: NvsAdapter, config: NetworkConfig) -> Result<()> {
        let peripherals = Peripherals::take()?;
        let sysloop = EspSystemEventLoop::take()?;
        let pins = peripherals.pins;

        let eth = EspEthernet::start(
            peripherals.mac,
            EthPins {
                rxd0: pins.gpio25,
                rxd1: pins.gpio26,
                crs_dv: pins.gpio27,
                mdc: pins.gpio23,
                txd1: pins.gpio22,
                tx_en: pins.gpio21,
                txd0: pins.gpio19,
                mdio: pins.gpio18,
                clk_in: pins.gpio0,
                power: pins.gpio16,
            },
            sysloop,
            &config,
        )?;

        let udp = UdpOscSocket::bind(config.in_port).map_err(Error::from)?;
        let console = UartConsole::new(peripherals.uart2, pins.gpio17, pins.gpio5)?;

        let mut pin = PinDriver::input(pins.gpio4)?;
        pin.set_pull(Pull::Up)?;
        let switch = SwitchDriver::new(pin);

        info!(
            "Console: {} on UART2, log on UART0 (TX {} RX {})",
            DEVICE_NAME, LOG_UART_TX_GPIO, LOG_UART_RX_GPIO
        );
        run_bridge(config, udp, console, nvs, switch, eth)
    }
}

#[cfg(not(target_os = "espidf"))]
mod platform {
    use oscbridge::adapters::console::TcpConsole;
    use oscbridge::adapters::ethernet::SimEthernet;
    use oscbridge::config::{NetworkConfig, HOST_CONSOLE_PORT};
    use oscbridge::drivers::switch::{SimPin, SwitchDriver};

    use super::*;

    pub fn run(nvs: NvsAdapter, config: NetworkConfig) -> Result<()> {
        let eth = SimEthernet::start(&config);
        let udp = UdpOscSocket::bind(config.in_port).map_err(Error::from)?;
        let console = TcpConsole::bind(HOST_CONSOLE_PORT).map_err(Error::from)?;
        let switch = SwitchDriver::new(SimPin);

        info!("Console: {} on TCP {}", DEVICE_NAME, HOST_CONSOLE_PORT);
        run_bridge(config, udp, console, nvs, switch, eth)
    }
}
