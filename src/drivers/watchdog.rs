//! Task watchdog (TWDT) for the bridge loop.
//!
//! The loop must call [`Watchdog::feed`] at least once every
//! [`TIMEOUT_MS`]; a stalled loop panics the TWDT and the chip reboots.
//! Host builds arm nothing.

use log::{info, warn};

/// Stall budget before the TWDT fires.
pub const TIMEOUT_MS: u32 = 5_000;

pub struct Watchdog {
    armed: bool,
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}

impl Watchdog {
    /// Subscribe the calling task.  Failure leaves the loop unwatched
    /// and is only logged.
    pub fn new() -> Self {
        let armed = match arm() {
            Ok(()) => {
                info!("Watchdog: armed, {} ms", TIMEOUT_MS);
                true
            }
            Err(e) => {
                warn!("Watchdog: not armed: {}", e);
                false
            }
        };
        Self { armed }
    }

    pub fn feed(&self) {
        if self.armed {
            kick();
        }
    }
}

#[cfg(target_os = "espidf")]
fn arm() -> Result<(), esp_idf_svc::sys::EspError> {
    use esp_idf_svc::sys::{esp, esp_task_wdt_add, esp_task_wdt_config_t, esp_task_wdt_reconfigure};

    let config = esp_task_wdt_config_t {
        timeout_ms: TIMEOUT_MS,
        idle_core_mask: 0,
        trigger_panic: true,
    };
    // SAFETY: called from the main task; `config` outlives the call.
    if let Err(e) = esp!(unsafe { esp_task_wdt_reconfigure(&config) }) {
        // The IDF startup code may own the TWDT already; keep its settings.
        warn!("Watchdog: keeping existing TWDT config ({})", e);
    }
    // SAFETY: a null handle subscribes the calling task.
    esp!(unsafe { esp_task_wdt_add(core::ptr::null_mut()) })
}

#[cfg(target_os = "espidf")]
fn kick() {
    // SAFETY: only reached after the task subscribed in `arm`.
    unsafe {
        esp_idf_svc::sys::esp_task_wdt_reset();
    }
}

#[cfg(not(target_os = "espidf"))]
fn arm() -> Result<(), core::convert::Infallible> {
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn kick() {}
