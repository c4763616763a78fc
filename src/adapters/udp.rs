//! UDP socket adapter for OSC traffic.
//!
//! One non-blocking `std::net::UdpSocket` bound to `0.0.0.0:<in_port>`
//! serves both directions.  ESP-IDF ships a `std` networking layer on top
//! of lwIP, so the same code runs on the device and on the host.

use std::io::ErrorKind;
use std::net::{SocketAddr, SocketAddrV4, UdpSocket};

use log::info;

use crate::app::ports::{DatagramPort, SocketError};

pub struct UdpOscSocket {
    socket: UdpSocket,
}

impl UdpOscSocket {
    /// Bind to `0.0.0.0:<port>` in non-blocking mode.  Port `0` lets the
    /// OS pick one (see [`local_addr`](Self::local_addr)).
    pub fn bind(port: u16) -> Result<Self, SocketError> {
        let socket = UdpSocket::bind(SocketAddr::from(([0, 0, 0, 0], port)))?;
        socket.set_nonblocking(true)?;
        info!("UdpOscSocket: listening on UDP {}", port);
        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, SocketError> {
        Ok(self.socket.local_addr()?)
    }
}

impl DatagramPort for UdpOscSocket {
    fn try_recv(&mut self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>, SocketError> {
        match self.socket.recv_from(buf) {
            Ok((n, from)) => Ok(Some((n, from))),
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn send_to(&mut self, data: &[u8], dest: SocketAddrV4) -> Result<(), SocketError> {
        self.socket.send_to(data, dest)?;
        Ok(())
    }
}
