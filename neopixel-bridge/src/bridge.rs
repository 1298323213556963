//! Host bridge.
//!
//! Receives socket notifications from the relay and hands their payload to
//! the NeoPixel driver, one at a time, in arrival order.

use tokio::io::AsyncWrite;
use tokio_util::sync::CancellationToken;

use crate::driver::NeoPixel;
use crate::message::{SocketNotification, SocketReceiver};
use crate::tracing::prelude::*;

/// Forwards socket notifications to the device.
///
/// The bridge is the only owner of the driver, and with it the serial port.
pub struct HostBridge<W> {
    pixel: NeoPixel<W>,
    socket_rx: SocketReceiver,
}

impl<W: AsyncWrite + Unpin> HostBridge<W> {
    pub fn new(pixel: NeoPixel<W>, socket_rx: SocketReceiver) -> Self {
        Self { pixel, socket_rx }
    }

    /// Handle one socket notification.
    ///
    /// Write errors are logged and dropped. The relay never learns whether
    /// the device got the command, and a failed write does not stop later
    /// ones from being attempted.
    pub async fn socket_notification_received(&mut self, msg: SocketNotification) {
        match msg {
            SocketNotification::SetState(state) => {
                debug!(state = %state, "Setting state.");
                if let Err(e) = self.pixel.set_state(state).await {
                    error!(error = %e, "Failed to write state to device.");
                }
            }
        }
    }

    /// Run until the socket channel closes or `running` is cancelled.
    pub async fn run(mut self, running: CancellationToken) {
        trace!("Host bridge started.");

        loop {
            tokio::select! {
                _ = running.cancelled() => break,
                msg = self.socket_rx.recv() => match msg {
                    Some(msg) => self.socket_notification_received(msg).await,
                    None => break,
                },
            }
        }

        trace!("Host bridge stopped.");
    }
}
