//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to                      |
//! |------------|---------------|----------------------------------|
//! | `console`  | Transport     | UART2 / host TCP console         |
//! | `ethernet` | NetworkPort   | ESP32 EMAC + LAN87xx / simulated |
//! | `log_sink` | EventSink     | Serial log output                |
//! | `nvs`      | ConfigPort    | NVS / in-memory store            |
//! |            | StoragePort   |                                  |
//! | `system`   | SystemPort    | `esp_restart` / process exit     |
//! | `time`     | —             | ESP32 system timer               |
//! | `udp`      | DatagramPort  | lwIP / host UDP socket           |

pub mod console;
pub mod ethernet;
pub mod log_sink;
pub mod nvs;
pub mod system;
pub mod time;
pub mod udp;
