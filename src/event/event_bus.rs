// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus carrying controller events to the presentation context.

use tokio::sync::broadcast;

use super::ControllerEvent;

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Broadcast bus for controller events.
///
/// The bus is the mandatory boundary between the consumer context (which
/// mutates device state) and the presentation context: the router publishes
/// here and sinks receive on their own tasks. Publishing never blocks.
///
/// If a slow subscriber lets the channel fill up, that subscriber loses the
/// oldest events and receives a `RecvError::Lagged` on its next read; the
/// publisher is unaffected.
///
/// # Examples
///
/// ```
/// use lumisim::event::{ControllerEvent, EventBus};
/// use lumisim::types::Mode;
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(ControllerEvent::ModeChanged { mode: Mode::Manual });
///
/// let event = rx.try_recv().unwrap();
/// assert_eq!(event, ControllerEvent::ModeChanged { mode: Mode::Manual });
/// ```
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<ControllerEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to controller events.
    ///
    /// The receiver sees every event published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event to all subscribers.
    ///
    /// If there are no subscribers the event is silently discarded; the
    /// core does not care whether anything is watching.
    pub fn publish(&self, event: ControllerEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}
