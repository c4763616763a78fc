//! Debounced reset switch.
//!
//! ## Hardware
//!
//! Momentary switch on GPIO4 with the internal pull-up enabled.  The
//! line reads high while the switch is pressed.
//!
//! ## Edge acceptance
//!
//! | Sample             | Condition                                  | Result   |
//! |--------------------|--------------------------------------------|----------|
//! | first              | —                                          | record   |
//! | low → high         | no edge accepted yet, or ≥ 500 ms since    | accepted |
//! | low → high         | < 500 ms since last accepted edge          | dropped  |
//! | high → high, → low | —                                          | none     |
//!
//! Time arithmetic wraps, so a clock rollover does not lock the switch out.

use embedded_hal::digital::InputPin;
use log::warn;

use crate::app::ports::SwitchPort;
use crate::config::DEBOUNCE_MS;

pub struct SwitchDriver<P> {
    pin: P,
    debounce_ms: u32,
    last_level: Option<bool>,
    last_accepted_ms: Option<u32>,
}

impl<P: InputPin> SwitchDriver<P> {
    pub fn new(pin: P) -> Self {
        Self::with_debounce(pin, DEBOUNCE_MS)
    }

    pub fn with_debounce(pin: P, debounce_ms: u32) -> Self {
        Self {
            pin,
            debounce_ms,
            last_level: None,
            last_accepted_ms: None,
        }
    }

    /// Pure edge rule, separated from pin I/O.
    fn accept(&mut self, level: bool, now_ms: u32) -> bool {
        let prev = self.last_level.replace(level);
        if prev != Some(false) || !level {
            return false;
        }
        let due = match self.last_accepted_ms {
            None => true,
            Some(t) => now_ms.wrapping_sub(t) >= self.debounce_ms,
        };
        if due {
            self.last_accepted_ms = Some(now_ms);
        }
        due
    }
}

impl<P: InputPin> SwitchPort for SwitchDriver<P> {
    fn poll_edge(&mut self, now_ms: u32) -> bool {
        match self.pin.is_high() {
            Ok(level) => self.accept(level, now_ms),
            Err(e) => {
                warn!("Switch: pin read failed: {:?}", e);
                false
            }
        }
    }
}

/// Host stand-in for the switch line: never pressed.
#[cfg(not(target_os = "espidf"))]
pub struct SimPin;

#[cfg(not(target_os = "espidf"))]
impl embedded_hal::digital::ErrorType for SimPin {
    type Error = core::convert::Infallible;
}

#[cfg(not(target_os = "espidf"))]
impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }
}
