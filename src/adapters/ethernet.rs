//! Ethernet interface adapter.
//!
//! Implements [`NetworkPort`].
//!
//! - **`target_os = "espidf"`**: ESP32 EMAC with an RMII LAN87xx PHY,
//!   static IPv4 settings from [`NetworkConfig`], hostname `esp32-ethernet`.
//! - **all other targets**: [`SimEthernet`], an always-up interface that
//!   reports the configured address and a fixed MAC.

use core::net::Ipv4Addr;

use log::info;

use crate::app::ports::{MacAddress, NetworkPort};
use crate::config::NetworkConfig;

#[cfg(target_os = "espidf")]
pub use esp::{EspEthernet, EthPins};

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_hal::gpio;
    use esp_idf_hal::mac::MAC;
    use esp_idf_svc::eth::{BlockingEth, EspEth, EthDriver, RmiiClockConfig, RmiiEth, RmiiEthChipset};
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::ipv4::{self, Mask, Subnet};
    use esp_idf_svc::netif::{EspNetif, NetifConfiguration};
    use esp_idf_sys::EspError;
    use log::warn;

    use super::*;
    use crate::config::HOSTNAME;
    use crate::pins::{ETH_MDC_GPIO, ETH_MDIO_GPIO, ETH_PHY_ADDR, ETH_POWER_GPIO};

    /// Board pins consumed by the EMAC.  RMII data lines are fixed by the
    /// silicon; MDC/MDIO and the PHY power pin follow `pins.rs`.
    pub struct EthPins {
        pub rxd0: gpio::Gpio25,
        pub rxd1: gpio::Gpio26,
        pub crs_dv: gpio::Gpio27,
        pub mdc: gpio::Gpio23,
        pub txd1: gpio::Gpio22,
        pub tx_en: gpio::Gpio21,
        pub txd0: gpio::Gpio19,
        pub mdio: gpio::Gpio18,
        pub clk_in: gpio::Gpio0,
        pub power: gpio::Gpio16,
    }

    pub struct EspEthernet {
        eth: BlockingEth<EspEth<'static, RmiiEth>>,
    }

    impl EspEthernet {
        /// Bring the interface up with a static address.
        ///
        /// Returns once the driver has started.  A missing cable is not
        /// an error here; the link monitor reports it later.
        pub fn start(
            mac: MAC,
            pins: EthPins,
            sysloop: EspSystemEventLoop,
            config: &NetworkConfig,
        ) -> Result<Self, EspError> {
            let driver = EthDriver::new_rmii(
                mac,
                pins.rxd0,
                pins.rxd1,
                pins.crs_dv,
                pins.mdc,
                pins.txd1,
                pins.tx_en,
                pins.txd0,
                pins.mdio,
                RmiiClockConfig::<gpio::Gpio0, gpio::Gpio16, gpio::Gpio17>::Input(pins.clk_in),
                Some(pins.power),
                RmiiEthChipset::LAN87XX,
                Some(ETH_PHY_ADDR),
                sysloop.clone(),
            )?;
            info!(
                "EspEthernet: LAN87xx phy {} (MDC {}, MDIO {}, power {})",
                ETH_PHY_ADDR, ETH_MDC_GPIO, ETH_MDIO_GPIO, ETH_POWER_GPIO
            );

            let netif_conf = NetifConfiguration {
                ip_configuration: Some(ipv4::Configuration::Client(
                    ipv4::ClientConfiguration::Fixed(ipv4::ClientSettings {
                        ip: config.local_ip,
                        subnet: Subnet {
                            gateway: config.gateway,
                            mask: Mask(config.prefix_len()),
                        },
                        dns: None,
                        secondary_dns: None,
                    }),
                )),
                ..NetifConfiguration::eth_default_client()
            };

            let mut eth = EspEth::wrap_all(driver, EspNetif::new_with_conf(&netif_conf)?)?;
            eth.netif_mut().set_hostname(HOSTNAME)?;

            let mut eth = BlockingEth::wrap(eth, sysloop)?;
            eth.start()?;
            info!("EspEthernet: started, hostname {}", HOSTNAME);

            if let Err(e) = eth.wait_netif_up() {
                warn!("EspEthernet: interface not up yet: {}", e);
            }

            let this = Self { eth };
            info!(
                "EspEthernet: ETH IP: {:?}, ETH MAC: {:02X?}",
                this.local_ip(),
                this.mac()
            );
            Ok(this)
        }
    }

    impl NetworkPort for EspEthernet {
        fn link_up(&self) -> bool {
            self.eth.is_connected().unwrap_or(false)
        }

        fn local_ip(&self) -> Option<Ipv4Addr> {
            self.eth
                .eth()
                .netif()
                .get_ip_info()
                .ok()
                .map(|info| info.ip)
                .filter(|ip| !ip.is_unspecified())
        }

        fn mac(&self) -> MacAddress {
            self.eth.eth().netif().get_mac().unwrap_or([0; 6])
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Simulation
// ───────────────────────────────────────────────────────────────

/// MAC reported by the simulated interface.
pub const SIM_MAC: MacAddress = [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE];

/// Host stand-in for the Ethernet interface.
pub struct SimEthernet {
    ip: Ipv4Addr,
    up: bool,
}

impl SimEthernet {
    pub fn start(config: &NetworkConfig) -> Self {
        info!(
            "SimEthernet: ip={}/{} gw={} (simulated)",
            config.local_ip,
            config.prefix_len(),
            config.gateway
        );
        Self {
            ip: config.local_ip,
            up: true,
        }
    }

    /// Force the simulated link state.
    pub fn set_link(&mut self, up: bool) {
        self.up = up;
    }
}

impl NetworkPort for SimEthernet {
    fn link_up(&self) -> bool {
        self.up
    }

    fn local_ip(&self) -> Option<Ipv4Addr> {
        self.up.then_some(self.ip)
    }

    fn mac(&self) -> MacAddress {
        SIM_MAC
    }
}
