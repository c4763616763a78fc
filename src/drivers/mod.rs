//! Board-level drivers: the reset switch and the task watchdog.

pub mod switch;
pub mod watchdog;
