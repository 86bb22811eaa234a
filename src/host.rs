//! Requests the app thread sends back to the host glue.
//!
//! The host glue drains [`HostRequests`] from its own thread (typically the UI
//! thread) and performs the platform calls the app thread cannot make itself.

use crossbeam::channel::{self, Receiver, Sender, TryIter};
use log::trace;

/// Vibration effect used as feedback when the soft keyboard opens
/// (`VibrationEffect.EFFECT_TICK`).
pub const KEYBOARD_VIBRATE_EFFECT: i32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest {
    ShowSoftInput,
    HideSoftInput,
    Vibrate { effect: i32 },
    /// The app thread stopped on an unrecoverable error.
    Failed { reason: String },
}

/// Sending half, owned by the app thread.
#[derive(Debug, Clone)]
pub struct HostSender(Sender<HostRequest>);

impl HostSender {
    /// Send a request; a host that stopped listening is not an error.
    pub fn send(&self, request: HostRequest) {
        trace!("Host request: {:?}", request);
        let _ = self.0.send(request);
    }
}

/// Receiving half, owned by the host glue.
#[derive(Debug, Clone)]
pub struct HostRequests(Receiver<HostRequest>);

impl HostRequests {
    pub fn try_recv(&self) -> Option<HostRequest> {
        self.0.try_recv().ok()
    }

    /// Every request queued so far, without blocking.
    pub fn try_iter(&self) -> TryIter<'_, HostRequest> {
        self.0.try_iter()
    }

    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<HostRequest> {
        self.0.recv_timeout(timeout).ok()
    }
}

pub fn request_channel() -> (HostSender, HostRequests) {
    let (tx, rx) = channel::unbounded();
    (HostSender(tx), HostRequests(rx))
}
