//! Notification relay.
//!
//! Listens to notifications from the dashboard and turns the two kinds we
//! care about into `set_state` socket notifications for the host bridge.
//! Everything else is dropped on the floor.

use serde_json::Value;
use strum::{AsRefStr, EnumString};

use crate::message::{SocketNotification, SocketSender, StateCommand};
use crate::tracing::prelude::*;

/// Dashboard notification names the relay reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
pub enum NotificationKind {
    /// Payload carries the new state in its `state` field.
    #[strum(serialize = "NeoPixel")]
    StateChange,

    /// Payload is ignored; the device goes to the alarm state.
    #[strum(serialize = "SHOW_ALERT")]
    Alert,
}

/// A dashboard notification after looking at its name and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// State change request. `state` is `None` when the payload has no
    /// string `state` field.
    StateChange { state: Option<String> },

    /// Alert raised somewhere on the dashboard.
    Alert,

    /// Any notification we do not handle, by name.
    Other(String),
}

impl Notification {
    /// Classify a notification by name and pull out what the relay needs
    /// from its payload.
    pub fn parse(name: &str, payload: &Value) -> Self {
        match name.parse::<NotificationKind>() {
            Ok(NotificationKind::StateChange) => Notification::StateChange {
                state: payload
                    .get("state")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
            },
            Ok(NotificationKind::Alert) => Notification::Alert,
            Err(_) => Notification::Other(name.to_owned()),
        }
    }

    /// The state command this notification maps to, if any.
    pub fn state_command(self) -> Option<StateCommand> {
        match self {
            Notification::StateChange { state } => state.map(StateCommand::from),
            Notification::Alert => Some(StateCommand::alarm()),
            Notification::Other(_) => None,
        }
    }
}

/// Relays dashboard notifications to the host bridge.
///
/// Cheap to clone; every clone feeds the same socket channel.
#[derive(Debug, Clone)]
pub struct NotificationRelay {
    socket_tx: SocketSender,
}

impl NotificationRelay {
    pub fn new(socket_tx: SocketSender) -> Self {
        Self { socket_tx }
    }

    /// Handle one dashboard notification.
    ///
    /// Sends at most one socket notification and never waits for the device.
    pub fn notification_received(&self, name: &str, payload: &Value) {
        let notification = Notification::parse(name, payload);
        trace!(?notification, "Notification received.");

        match notification {
            Notification::StateChange { state: None } => {
                warn!(notification = name, "Ignoring state change without a string `state` field.");
            }
            Notification::Other(name) => {
                trace!(notification = %name, "Ignoring unhandled notification.");
            }
            notification => {
                if let Some(state) = notification.state_command() {
                    self.send_socket_notification(SocketNotification::SetState(state));
                }
            }
        }
    }

    fn send_socket_notification(&self, msg: SocketNotification) {
        debug!(notification = msg.name(), ?msg, "Sending socket notification.");
        if let Err(e) = self.socket_tx.send(msg) {
            warn!(dropped = ?e.0, "Host bridge is gone, dropping socket notification.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{socket_channel, SocketReceiver};
    use serde_json::json;
    use test_case::test_case;

    fn drain(rx: &mut SocketReceiver) -> Vec<String> {
        let mut states = Vec::new();
        while let Ok(SocketNotification::SetState(state)) = rx.try_recv() {
            states.push(state.to_string());
        }
        states
    }

    #[test_case("NeoPixel", json!({"state": "rainbow"}), &["rainbow"]; "state change")]
    #[test_case("NeoPixel", json!({"state": "off", "extra": 1}), &["off"]; "state change extra fields")]
    #[test_case("NeoPixel", json!({"state": ""}), &[""]; "empty state forwarded")]
    #[test_case("SHOW_ALERT", json!({"title": "ISS overhead"}), &["iss_alarm"]; "alert with payload")]
    #[test_case("SHOW_ALERT", Value::Null, &["iss_alarm"]; "alert without payload")]
    #[test_case("SHOW_ALERT", json!({"state": "rainbow"}), &["iss_alarm"]; "alert ignores state")]
    #[test_case("unrelated-event", json!({"foo": 1}), &[]; "unrelated")]
    #[test_case("neopixel", json!({"state": "rainbow"}), &[]; "name is case sensitive")]
    #[test_case("NeoPixel", json!({}), &[]; "missing state")]
    #[test_case("NeoPixel", json!({"state": null}), &[]; "null state")]
    #[test_case("NeoPixel", json!({"state": 3}), &[]; "non string state")]
    #[test_case("NeoPixel", Value::Null, &[]; "no payload")]
    fn test_notification_received(name: &str, payload: Value, expect: &[&str]) {
        let (tx, mut rx) = socket_channel();
        let relay = NotificationRelay::new(tx);

        relay.notification_received(name, &payload);

        assert_eq!(drain(&mut rx), expect);
    }

    #[test]
    fn test_repeated_state_is_not_deduplicated() {
        let (tx, mut rx) = socket_channel();
        let relay = NotificationRelay::new(tx);
        let payload = json!({"state": "rainbow"});

        relay.notification_received("NeoPixel", &payload);
        relay.notification_received("NeoPixel", &payload);

        assert_eq!(drain(&mut rx), ["rainbow", "rainbow"]);
    }

    #[test]
    fn test_send_after_bridge_gone_does_not_panic() {
        let (tx, rx) = socket_channel();
        drop(rx);
        let relay = NotificationRelay::new(tx);

        relay.notification_received("SHOW_ALERT", &Value::Null);
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            Notification::parse("NeoPixel", &json!({"state": "blue"})),
            Notification::StateChange {
                state: Some("blue".into())
            }
        );
        assert_eq!(Notification::parse("SHOW_ALERT", &Value::Null), Notification::Alert);
        assert_eq!(
            Notification::parse("CLOCK_SECOND", &json!(12)),
            Notification::Other("CLOCK_SECOND".into())
        );
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(NotificationKind::StateChange.as_ref(), "NeoPixel");
        assert_eq!(NotificationKind::Alert.as_ref(), "SHOW_ALERT");
    }
}
