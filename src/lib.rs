//! OSC trigger bridge firmware library.
//!
//! Exposes the pure-logic modules for integration testing and the
//! adapters used by the binary.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod console;
pub mod drivers;
pub mod error;
pub mod osc;
pub mod pins;

pub use error::{Error, Result};
