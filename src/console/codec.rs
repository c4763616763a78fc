//! Newline-delimited line decoder.
//!
//! The decoder accumulates incoming bytes and yields complete lines.
//! A single `Transport::read` may return part of a line or several
//! lines at once; both are handled.  Lines longer than
//! [`MAX_LINE_LEN`] are dropped up to the next newline.

use log::warn;

/// Maximum accepted line length (bytes, excluding the newline).
pub const MAX_LINE_LEN: usize = 256;

/// Streaming line decoder.
pub struct LineDecoder {
    buf: heapless::Vec<u8, MAX_LINE_LEN>,
    /// Set after an overflow; cleared at the next newline.
    discarding: bool,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDecoder {
    pub fn new() -> Self {
        Self {
            buf: heapless::Vec::new(),
            discarding: false,
        }
    }

    /// Feed bytes into the decoder, calling `on_line` for every completed
    /// line.  Lines are passed untrimmed except for the newline itself.
    pub fn feed(&mut self, data: &[u8], mut on_line: impl FnMut(&str)) {
        for &byte in data {
            if byte == b'\n' {
                if self.discarding {
                    self.discarding = false;
                } else {
                    match core::str::from_utf8(&self.buf) {
                        Ok(line) => on_line(line),
                        Err(_) => warn!("Console: dropped non-UTF-8 line"),
                    }
                }
                self.buf.clear();
                continue;
            }

            if self.discarding {
                continue;
            }

            if self.buf.push(byte).is_err() {
                warn!("Console: line exceeds {} bytes, discarding", MAX_LINE_LEN);
                self.buf.clear();
                self.discarding = true;
            }
        }
    }

    /// Bytes buffered for the line in progress.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Drop any partial line (e.g. after the client disconnects).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.discarding = false;
    }
}
