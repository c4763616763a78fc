//! Control console adapters.
//!
//! Both implement [`Transport`] with non-blocking reads that return
//! `Ok(0)` when nothing is pending.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: [`UartConsole`] on UART2, `NON_BLOCK`
//!   reads.  UART0 stays with the log output so replies never interleave
//!   with log records.
//! - **all other targets**: [`TcpConsole`], a single-client plaintext TCP
//!   server.  Connect with `nc localhost 2323`.

use log::{info, warn};

use crate::console::transport::{Transport, TransportError};

// ───────────────────────────────────────────────────────────────
// UART (ESP-IDF)
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use uart::UartConsole;

#[cfg(target_os = "espidf")]
mod uart {
    use esp_idf_hal::delay::NON_BLOCK;
    use esp_idf_hal::gpio::{AnyIOPin, InputPin, OutputPin};
    use esp_idf_hal::peripheral::Peripheral;
    use esp_idf_hal::uart::{config::Config, Uart, UartDriver};
    use esp_idf_hal::units::Hertz;
    use esp_idf_sys::EspError;

    use super::*;
    use crate::pins::{CONSOLE_UART_RX_GPIO, CONSOLE_UART_TX_GPIO, UART_BAUD};

    pub struct UartConsole<'d> {
        uart: UartDriver<'d>,
    }

    impl<'d> UartConsole<'d> {
        pub fn new<U: Uart>(
            uart: impl Peripheral<P = U> + 'd,
            tx: impl Peripheral<P = impl OutputPin> + 'd,
            rx: impl Peripheral<P = impl InputPin> + 'd,
        ) -> Result<Self, EspError> {
            let config = Config::default().baudrate(Hertz(UART_BAUD));
            let uart = UartDriver::new(
                uart,
                tx,
                rx,
                Option::<AnyIOPin>::None,
                Option::<AnyIOPin>::None,
                &config,
            )?;
            info!(
                "UartConsole: UART ready at {} baud (TX {}, RX {})",
                UART_BAUD, CONSOLE_UART_TX_GPIO, CONSOLE_UART_RX_GPIO
            );
            Ok(Self { uart })
        }
    }

    impl Transport for UartConsole<'_> {
        type Error = TransportError;

        fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
            self.uart.read(buf, NON_BLOCK).map_err(|e| {
                warn!("UartConsole: read failed: {}", e);
                TransportError::Io
            })
        }

        fn write(&mut self, mut data: &[u8]) -> Result<(), TransportError> {
            while !data.is_empty() {
                let n = self.uart.write(data).map_err(|_| TransportError::Io)?;
                data = &data[n..];
            }
            Ok(())
        }
    }
}

// ───────────────────────────────────────────────────────────────
// TCP (host simulation)
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub use tcp::TcpConsole;

#[cfg(not(target_os = "espidf"))]
mod tcp {
    use std::io::{ErrorKind, Read, Write};
    use std::net::{SocketAddr, TcpListener, TcpStream};

    use super::*;

    /// Single-client TCP console.  New clients are accepted lazily from
    /// [`read`](Transport::read); writes with no client are discarded.
    pub struct TcpConsole {
        listener: TcpListener,
        stream: Option<TcpStream>,
        /// Set when a client is dropped; cleared by `take_disconnected`.
        dropped: bool,
    }

    impl TcpConsole {
        /// Bind `0.0.0.0:<port>`; port `0` picks a free one.
        pub fn bind(port: u16) -> Result<Self, TransportError> {
            let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port)))
                .map_err(|_| TransportError::Io)?;
            listener
                .set_nonblocking(true)
                .map_err(|_| TransportError::Io)?;
            info!("TcpConsole: listening on TCP {}", port);
            Ok(Self {
                listener,
                stream: None,
                dropped: false,
            })
        }

        pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
            self.listener.local_addr().map_err(|_| TransportError::Io)
        }

        pub fn is_connected(&self) -> bool {
            self.stream.is_some()
        }

        fn drop_client(&mut self) {
            if self.stream.take().is_some() {
                self.dropped = true;
            }
        }

        fn accept(&mut self) {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    if stream.set_nonblocking(true).is_err() {
                        warn!("TcpConsole: failed to set non-blocking on client socket");
                        return;
                    }
                    info!("TcpConsole: client connected from {}", addr);
                    self.stream = Some(stream);
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {}
                Err(e) => warn!("TcpConsole: accept error: {}", e),
            }
        }
    }

    impl Transport for TcpConsole {
        type Error = TransportError;

        fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
            if self.stream.is_none() {
                self.accept();
            }
            let Some(stream) = self.stream.as_mut() else {
                return Ok(0);
            };
            match stream.read(buf) {
                Ok(0) => {
                    info!("TcpConsole: client disconnected");
                    self.drop_client();
                    Ok(0)
                }
                Ok(n) => Ok(n),
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => Ok(0),
                Err(_) => {
                    self.drop_client();
                    Err(TransportError::Io)
                }
            }
        }

        fn write(&mut self, data: &[u8]) -> Result<(), TransportError> {
            let Some(stream) = self.stream.as_mut() else {
                return Ok(());
            };
            if stream.write_all(data).is_err() {
                self.drop_client();
                return Err(TransportError::NotConnected);
            }
            Ok(())
        }

        fn take_disconnected(&mut self) -> bool {
            core::mem::take(&mut self.dropped)
        }
    }

}
