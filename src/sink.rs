// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Notification sinks: the presentation side of the event bus.
//!
//! Sinks render controller events however they like; the core never calls
//! them synchronously. A [`SinkRegistry`] holds the attached sinks and a
//! dispatcher task ([`spawn_dispatcher`]) drains the event bus on its own
//! execution context, fanning each event out to every registered sink.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::event::{ControllerEvent, EventBus};

/// A consumer of controller events.
///
/// Implementations run on the dispatcher task, never on the consumer
/// context that mutates device state.
pub trait NotificationSink: Send + Sync {
    /// Renders one event.
    fn render(&self, event: &ControllerEvent);
}

/// Unique identifier for a registered sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SinkId(u64);

impl SinkId {
    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sink({})", self.0)
    }
}

/// Registry of attached notification sinks.
///
/// Thread-safe: sinks can be attached or detached from any task while the
/// dispatcher is fanning events out.
///
/// # Examples
///
/// ```
/// use lumisim::event::ControllerEvent;
/// use lumisim::sink::{ConsoleSink, SinkRegistry};
/// use lumisim::types::Mode;
///
/// let registry = SinkRegistry::new();
/// let id = registry.attach(ConsoleSink);
///
/// registry.dispatch(&ControllerEvent::ModeChanged { mode: Mode::Manual });
///
/// assert!(registry.detach(id));
/// ```
#[derive(Default)]
pub struct SinkRegistry {
    /// Counter for generating unique sink IDs.
    next_id: AtomicU64,
    sinks: RwLock<HashMap<SinkId, Arc<dyn NotificationSink>>>,
}

impl SinkRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a sink and returns its ID.
    pub fn attach(&self, sink: impl NotificationSink + 'static) -> SinkId {
        let id = SinkId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.sinks.write().insert(id, Arc::new(sink));
        id
    }

    /// Detaches a sink.
    ///
    /// Returns `true` if the sink was registered.
    pub fn detach(&self, id: SinkId) -> bool {
        self.sinks.write().remove(&id).is_some()
    }

    /// Returns the number of attached sinks.
    #[must_use]
    pub fn sink_count(&self) -> usize {
        self.sinks.read().len()
    }

    /// Fans one event out to every attached sink.
    pub fn dispatch(&self, event: &ControllerEvent) {
        let sinks: Vec<Arc<dyn NotificationSink>> = self.sinks.read().values().cloned().collect();
        for sink in sinks {
            sink.render(event);
        }
    }
}

impl std::fmt::Debug for SinkRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkRegistry")
            .field("sink_count", &self.sink_count())
            .finish()
    }
}

/// Spawns the dispatcher task bridging the event bus to the registry.
///
/// The task ends when the bus is dropped. A sink that falls behind loses the
/// oldest events (the bus logs how many) and keeps going.
pub fn spawn_dispatcher(bus: &EventBus, registry: Arc<SinkRegistry>) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => registry.dispatch(&event),
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "sink dispatcher lagged behind the event bus");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// Renders controller events as log lines.
///
/// This stands in for the operator display: light state, mode, schedule and
/// colour updates, gate rejections, and the one-shot recovery banner.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn render(&self, event: &ControllerEvent) {
        match event {
            ControllerEvent::ModeChanged { mode } => {
                tracing::info!(target: "lumisim::display", "mode set to {mode}");
            }
            ControllerEvent::LightsChanged { lights } => {
                tracing::info!(target: "lumisim::display", "lights are {lights}");
            }
            ControllerEvent::ScheduleChanged { schedule } => {
                // Prefer the clock interpretation when the tokens are times
                match (schedule.on().as_time(), schedule.off().as_time()) {
                    (Some(on), Some(off)) => {
                        tracing::info!(
                            target: "lumisim::display",
                            "schedule set: on at {on}, off at {off}"
                        );
                    }
                    _ => {
                        tracing::info!(
                            target: "lumisim::display",
                            "schedule set: {schedule}"
                        );
                    }
                }
            }
            ControllerEvent::ColourChanged { colour } => {
                tracing::info!(
                    target: "lumisim::display",
                    "colour set to {} ({})",
                    colour,
                    colour.to_hex_with_hash()
                );
            }
            ControllerEvent::CommandRejected {
                category,
                mode,
                reason,
            } => {
                tracing::warn!(
                    target: "lumisim::display",
                    "[BLOCKED] {category} - {reason} (current mode: {mode})"
                );
            }
            ControllerEvent::FullyRecovered { .. } => {
                tracing::info!(
                    target: "lumisim::display",
                    "SYSTEM FULLY RECOVERED - all settings restored"
                );
            }
        }
    }
}
