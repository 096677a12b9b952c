// Switchboard - An accessibility-first Mastodon client
// Copyright (C) 2025 Switchboard Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Router and haptics that forward to the UI as IPC events

use tokio::sync::broadcast;

use super::{Haptics, Router};
use crate::log_ipc;
use crate::models::{events, Destination, HapticKind, IpcMessage};

/// Publishes navigation requests to connected clients
pub struct EventRouter {
    events: broadcast::Sender<IpcMessage>,
}

impl EventRouter {
    pub fn new(events: broadcast::Sender<IpcMessage>) -> Self {
        Self { events }
    }
}

impl Router for EventRouter {
    fn navigate(&self, destination: Destination) {
        log_ipc!(event, events::NAVIGATE);
        // No subscriber means no UI is attached; nothing to navigate
        let _ = self.events.send(IpcMessage::event(
            events::NAVIGATE,
            serde_json::json!({ "destination": destination }),
        ));
    }

    fn handle_url(&self, url: &str) {
        log_ipc!(event, events::OPEN_URL);
        let _ = self.events.send(IpcMessage::event(
            events::OPEN_URL,
            serde_json::json!({ "url": url }),
        ));
    }
}

/// Publishes haptic signals to connected clients
pub struct EventHaptics {
    events: broadcast::Sender<IpcMessage>,
}

impl EventHaptics {
    pub fn new(events: broadcast::Sender<IpcMessage>) -> Self {
        Self { events }
    }
}

impl Haptics for EventHaptics {
    fn fire(&self, kind: HapticKind) {
        log_ipc!(event, events::HAPTIC);
        let _ = self.events.send(IpcMessage::event(
            events::HAPTIC,
            serde_json::json!({ "haptic": kind }),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_becomes_an_event() {
        let (tx, mut rx) = broadcast::channel(8);
        let router = EventRouter::new(tx.clone());
        router.navigate(Destination::AccountDetail { id: "42".to_string() });
        router.handle_url("https://example.social/@bob");

        let nav = rx.try_recv().unwrap();
        assert_eq!(nav.method.as_deref(), Some(events::NAVIGATE));
        let params = nav.params.unwrap();
        assert_eq!(params["destination"]["to"], "account_detail");
        assert_eq!(params["destination"]["id"], "42");

        let url = rx.try_recv().unwrap();
        assert_eq!(url.method.as_deref(), Some(events::OPEN_URL));
    }

    #[test]
    fn haptics_never_fail_without_listeners() {
        let (tx, rx) = broadcast::channel(1);
        drop(rx);
        EventHaptics::new(tx).fire(HapticKind::Success);
    }
}
