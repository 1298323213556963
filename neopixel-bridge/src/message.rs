//! Messages carried on the socket channel between relay and bridge.
//!
//! The relay and the bridge never share state; the only thing passing between
//! them is a [`SocketNotification`]. The channel is unbounded so the relay
//! can hand off a message without waiting on the serial port, and messages
//! from one sender arrive in the order they were sent.

use std::fmt;

use tokio::sync::mpsc;

/// A desired device state, e.g. `rainbow` or `iss_alarm`.
///
/// Any string is accepted. The controller firmware decides what it means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateCommand(String);

impl StateCommand {
    /// State sent whenever the dashboard raises an alert.
    pub const ALARM: &'static str = "iss_alarm";

    pub fn new(state: impl Into<String>) -> Self {
        Self(state.into())
    }

    /// The alarm state.
    pub fn alarm() -> Self {
        Self::new(Self::ALARM)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for StateCommand {
    fn from(state: String) -> Self {
        Self(state)
    }
}

impl From<&str> for StateCommand {
    fn from(state: &str) -> Self {
        Self(state.to_owned())
    }
}

/// Notifications sent from the relay to the host bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketNotification {
    /// Put the device into the given state.
    SetState(StateCommand),
}

impl SocketNotification {
    /// Name of the notification as seen on the socket.
    pub fn name(&self) -> &'static str {
        match self {
            SocketNotification::SetState(_) => "set_state",
        }
    }
}

/// Sending half of the socket channel.
pub type SocketSender = mpsc::UnboundedSender<SocketNotification>;

/// Receiving half of the socket channel.
pub type SocketReceiver = mpsc::UnboundedReceiver<SocketNotification>;

/// Create the socket channel connecting one relay to one bridge.
pub fn socket_channel() -> (SocketSender, SocketReceiver) {
    mpsc::unbounded_channel()
}
