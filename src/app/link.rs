//! Ethernet link edge detection.
//!
//! The interface is sampled once per loop iteration; only transitions are
//! reported.  A down edge is fatal to the bridge (the service restarts the
//! device), so [`LinkEvent::Disconnected`] is reported at most once per
//! up period.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    Connected,
    Disconnected,
}

#[derive(Debug, Default)]
pub struct LinkMonitor {
    /// Last sampled state; `None` before the first sample.
    last: Option<bool>,
}

impl LinkMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one sample.  The first sample reports `Connected` if up and
    /// nothing if down (the link may still be negotiating).
    pub fn poll(&mut self, up: bool) -> Option<LinkEvent> {
        let prev = self.last.replace(up);
        match (prev, up) {
            (None | Some(false), true) => Some(LinkEvent::Connected),
            (Some(true), false) => Some(LinkEvent::Disconnected),
            _ => None,
        }
    }
}
