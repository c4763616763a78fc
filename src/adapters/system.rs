//! Fatal handler adapter.
//!
//! Implements [`SystemPort`].  On the device a restart goes through
//! `esp_restart()` and never returns; the host simulation exits the
//! process with a non-zero status so a supervisor can relaunch it.

use log::error;

use crate::app::ports::SystemPort;

#[derive(Default)]
pub struct Restarter;

impl Restarter {
    pub fn new() -> Self {
        Self
    }
}

impl SystemPort for Restarter {
    fn restart(&mut self, reason: &'static str) {
        error!("Restarting: {}", reason);

        #[cfg(target_os = "espidf")]
        esp_idf_hal::reset::restart();

        #[cfg(not(target_os = "espidf"))]
        std::process::exit(1);
    }
}
