//! GPIO / PHY assignments for the WT32-ETH01 style bridge board.
//!
//! The RMII data lines are fixed by the ESP32 EMAC and are passed to the
//! driver as typed peripherals in `adapters::ethernet`; only the numbers
//! that vary per board live here.

// ---------------------------------------------------------------------------
// Trigger reset switch
// ---------------------------------------------------------------------------

/// Momentary switch, input with internal pull-up.
pub const SWITCH_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Ethernet PHY (LAN8720, external 50 MHz clock on GPIO0)
// ---------------------------------------------------------------------------

/// SMI address of the PHY.
pub const ETH_PHY_ADDR: u32 = 1;
/// Oscillator enable / PHY power.
pub const ETH_POWER_GPIO: i32 = 16;
pub const ETH_MDC_GPIO: i32 = 23;
pub const ETH_MDIO_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// Serial lines
// ---------------------------------------------------------------------------

/// UART0 carries the ESP-IDF log output (USB serial bridge).
pub const LOG_UART_TX_GPIO: i32 = 1;
pub const LOG_UART_RX_GPIO: i32 = 3;

/// UART2 carries the control console, on the board's TXD2/RXD2 header pins.
pub const CONSOLE_UART_TX_GPIO: i32 = 17;
pub const CONSOLE_UART_RX_GPIO: i32 = 5;
pub const UART_BAUD: u32 = 115_200;
