//! Application core: pure bridge logic, zero I/O.
//!
//! The trigger latch, the control command table and the link watchdog
//! live here.  All interaction with sockets, flash and GPIO happens through
//! **port traits** defined in [`ports`], keeping this layer testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod link;
pub mod ports;
pub mod service;
pub mod trigger;
