// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command routing: classification, gating, mutation, recovery.
//!
//! The [`CommandRouter`] is the single owner of [`DeviceState`]. It receives
//! every inbound `(topic, payload)` pair from the message bus, classifies the
//! topic, consults the [`ModeGate`], validates the payload, applies the
//! mutation, and publishes the resulting events. After any mutation that
//! actually moved the state it runs the recovery check.
//!
//! `handle` is infallible and never blocks: malformed input is logged and
//! dropped, gate rejections become events, and outbound echoes go through a
//! fire-and-forget channel.

use tokio::sync::mpsc;

use crate::command::{CommandCategory, TopicMap};
use crate::event::{ControllerEvent, EventBus};
use crate::gate::{GateDecision, ModeGate};
use crate::recovery::{RecoveryEvaluator, RecoveryTarget};
use crate::state::{DeviceState, StateChange};
use crate::types::{LightState, Mode, RgbColor, SchedulePair};

/// An outbound publish handed to the message bus, fire-and-forget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Full topic to publish on.
    pub topic: String,
    /// Raw payload.
    pub payload: String,
}

/// Routes inbound bus messages into state mutations and events.
///
/// # Examples
///
/// ```
/// use lumisim::command::TopicMap;
/// use lumisim::event::EventBus;
/// use lumisim::recovery::RecoveryTarget;
/// use lumisim::router::CommandRouter;
/// use lumisim::types::Mode;
///
/// let mut router = CommandRouter::new(
///     TopicMap::default(),
///     RecoveryTarget::default(),
///     EventBus::new(),
/// );
///
/// router.handle("home/lights/mode", "manual");
/// assert_eq!(router.state().mode(), Mode::Manual);
/// ```
#[derive(Debug)]
pub struct CommandRouter {
    topics: TopicMap,
    state: DeviceState,
    recovery: RecoveryEvaluator,
    events: EventBus,
    outbox: Option<mpsc::UnboundedSender<OutboundMessage>>,
}

impl CommandRouter {
    /// Creates a router with the initial device state.
    #[must_use]
    pub fn new(topics: TopicMap, target: RecoveryTarget, events: EventBus) -> Self {
        Self {
            topics,
            state: DeviceState::new(),
            recovery: RecoveryEvaluator::new(target),
            events,
            outbox: None,
        }
    }

    /// Attaches an outbox for fire-and-forget outbound publishes.
    ///
    /// Without an outbox the router simply skips echoes; state mutation and
    /// events are unaffected.
    #[must_use]
    pub fn with_outbox(mut self, outbox: mpsc::UnboundedSender<OutboundMessage>) -> Self {
        self.outbox = Some(outbox);
        self
    }

    /// Returns the current device state.
    #[must_use]
    pub const fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Returns `true` if the recovered signal has already fired.
    #[must_use]
    pub const fn is_recovered(&self) -> bool {
        self.recovery.is_recovered()
    }

    /// Handles one inbound message.
    ///
    /// Messages on unrecognized topics are ignored. Malformed payloads are
    /// logged and dropped without mutation. Gate rejections emit a
    /// [`ControllerEvent::CommandRejected`] and mutate nothing.
    pub fn handle(&mut self, topic: &str, payload: &str) {
        let Some(category) = self.topics.category(topic) else {
            tracing::trace!(topic = %topic, "ignoring message on unrecognized topic");
            return;
        };

        tracing::debug!(
            topic = %topic,
            payload = %payload,
            category = %category,
            "command received"
        );

        match category {
            CommandCategory::ModeChange => self.handle_mode_change(payload),
            CommandCategory::LightControl => self.handle_light_control(payload),
            CommandCategory::ScheduleChange => self.handle_schedule_change(payload),
            CommandCategory::ColourChange => self.handle_colour_change(payload),
            CommandCategory::StatusReport => self.handle_status_report(payload),
        }
    }

    /// Mode changes bypass the gate: they are how recovery from `Unknown`
    /// begins.
    fn handle_mode_change(&mut self, payload: &str) {
        let Ok(mode) = payload.parse::<Mode>() else {
            tracing::debug!(payload = %payload, "ignoring unrecognized mode payload");
            return;
        };

        self.commit(StateChange::Mode(mode));
    }

    fn handle_light_control(&mut self, payload: &str) {
        if !self.admit(CommandCategory::LightControl) {
            return;
        }

        let Ok(lights) = payload.parse::<LightState>() else {
            tracing::debug!(payload = %payload, "ignoring unrecognized light control payload");
            return;
        };

        if self.commit(StateChange::Lights(lights)) {
            self.echo_lights(lights);
        }
    }

    fn handle_schedule_change(&mut self, payload: &str) {
        if !self.admit(CommandCategory::ScheduleChange) {
            return;
        }

        match SchedulePair::parse(payload) {
            Ok(schedule) => {
                self.commit(StateChange::Schedule(schedule));
            }
            Err(error) => {
                tracing::debug!(payload = %payload, %error, "ignoring malformed schedule payload");
            }
        }
    }

    fn handle_colour_change(&mut self, payload: &str) {
        if !self.admit(CommandCategory::ColourChange) {
            return;
        }

        match RgbColor::from_triple(payload) {
            Ok(colour) => {
                self.commit(StateChange::Colour(colour));
            }
            Err(error) => {
                tracing::debug!(payload = %payload, %error, "ignoring malformed colour payload");
            }
        }
    }

    /// Status reports are trusted telemetry: never gated, applied directly.
    fn handle_status_report(&mut self, payload: &str) {
        let Ok(lights) = payload.parse::<LightState>() else {
            tracing::debug!(payload = %payload, "ignoring unrecognized status payload");
            return;
        };

        self.commit(StateChange::Lights(lights));
    }

    /// Consults the gate; on rejection emits the rejection event and returns
    /// `false`.
    fn admit(&mut self, category: CommandCategory) -> bool {
        let mode = self.state.mode();
        match ModeGate::decide(category, mode) {
            GateDecision::Admitted => true,
            GateDecision::Rejected(reason) => {
                tracing::info!(
                    category = %category,
                    mode = %mode,
                    reason = %reason,
                    "command rejected by mode gate"
                );
                self.events.publish(ControllerEvent::CommandRejected {
                    category,
                    mode,
                    reason,
                });
                false
            }
        }
    }

    /// Applies a change; on an actual state move publishes the matching
    /// event and runs the recovery check. Returns whether the state moved.
    fn commit(&mut self, change: StateChange) -> bool {
        let event = match &change {
            StateChange::Mode(mode) => ControllerEvent::ModeChanged { mode: *mode },
            StateChange::Lights(lights) => ControllerEvent::LightsChanged { lights: *lights },
            StateChange::Schedule(schedule) => ControllerEvent::ScheduleChanged {
                schedule: schedule.clone(),
            },
            StateChange::Colour(colour) => ControllerEvent::ColourChanged { colour: *colour },
        };

        if !self.state.apply(&change) {
            tracing::trace!(kind = change.kind(), "state already at target value");
            return false;
        }

        tracing::debug!(kind = change.kind(), "state updated");
        self.events.publish(event);

        if self.recovery.check(&self.state) {
            tracing::info!("device fully recovered");
            self.events.publish(ControllerEvent::FullyRecovered {
                state: self.state.clone(),
            });
        }

        true
    }

    /// Echoes an applied light state back onto the control topic.
    ///
    /// Fire-and-forget: a closed outbox is logged and the state mutation
    /// that triggered the echo stands.
    fn echo_lights(&self, lights: LightState) {
        let Some(outbox) = &self.outbox else {
            return;
        };

        let message = OutboundMessage {
            topic: self.topics.control.clone(),
            payload: lights.as_str().to_string(),
        };

        if let Err(error) = outbox.send(message) {
            tracing::warn!(%error, "failed to queue light state echo");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast;

    const MODE: &str = "home/lights/mode";
    const CONTROL: &str = "home/lights/control";
    const SCHEDULE: &str = "home/lights/schedule";
    const COLOUR: &str = "home/lights/colour";
    const STATUS: &str = "home/lights/status";

    fn router() -> (CommandRouter, broadcast::Receiver<ControllerEvent>) {
        let bus = EventBus::new();
        let rx = bus.subscribe();
        let router = CommandRouter::new(TopicMap::default(), RecoveryTarget::default(), bus);
        (router, rx)
    }

    fn drain(rx: &mut broadcast::Receiver<ControllerEvent>) -> Vec<ControllerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn unrecognized_topic_is_ignored() {
        let (mut router, mut rx) = router();

        router.handle("home/heater", "on");
        router.handle("", "manual");

        assert_eq!(*router.state(), DeviceState::new());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn mode_change_is_never_gated() {
        let (mut router, mut rx) = router();

        router.handle(MODE, "manual");
        assert_eq!(router.state().mode(), Mode::Manual);

        router.handle(MODE, "AUTOMATIC");
        assert_eq!(router.state().mode(), Mode::Automatic);

        let events = drain(&mut rx);
        assert_eq!(
            events,
            vec![
                ControllerEvent::ModeChanged { mode: Mode::Manual },
                ControllerEvent::ModeChanged {
                    mode: Mode::Automatic
                },
            ]
        );
    }

    #[test]
    fn unrecognized_mode_payload_leaves_mode_unchanged() {
        let (mut router, mut rx) = router();

        for payload in ["eco", "auto", "", "manuall", "unknown"] {
            router.handle(MODE, payload);
        }

        assert_eq!(router.state().mode(), Mode::Unknown);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn gated_categories_rejected_in_automatic() {
        let (mut router, mut rx) = router();
        router.handle(MODE, "automatic");
        drain(&mut rx);

        let before = router.state().clone();
        router.handle(CONTROL, "on");
        router.handle(SCHEDULE, "09:00,18:00");
        router.handle(COLOUR, "255,255,255");

        assert_eq!(*router.state(), before);

        let events = drain(&mut rx);
        assert_eq!(events.len(), 3);
        for event in &events {
            let ControllerEvent::CommandRejected { mode, reason, .. } = event else {
                panic!("expected rejection, got {event:?}");
            };
            assert_eq!(*mode, Mode::Automatic);
            assert_eq!(*reason, crate::gate::RejectReason::WrongMode(Mode::Automatic));
        }
    }

    #[test]
    fn colour_change_in_unknown_mode_has_distinct_reason() {
        let (mut router, mut rx) = router();

        router.handle(COLOUR, "255,255,255");

        assert!(router.state().colour().is_none());
        let events = drain(&mut rx);
        assert_eq!(
            events,
            vec![ControllerEvent::CommandRejected {
                category: CommandCategory::ColourChange,
                mode: Mode::Unknown,
                reason: crate::gate::RejectReason::ModeUnset,
            }]
        );
    }

    #[test]
    fn light_control_on_in_manual_mode() {
        let (mut router, mut rx) = router();
        router.handle(MODE, "manual");
        drain(&mut rx);

        router.handle(CONTROL, "ON");

        assert_eq!(router.state().lights(), LightState::On);
        assert_eq!(router.state().mode(), Mode::Manual);
        assert!(router.state().schedule().is_none());
        assert!(router.state().colour().is_none());

        let events = drain(&mut rx);
        assert_eq!(
            events,
            vec![ControllerEvent::LightsChanged {
                lights: LightState::On
            }]
        );

        // Repeating the same command is a no-op with no further event
        router.handle(CONTROL, "on");
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn malformed_light_payload_is_dropped() {
        let (mut router, mut rx) = router();
        router.handle(MODE, "manual");
        drain(&mut rx);

        router.handle(CONTROL, "toggle");
        router.handle(CONTROL, "1");

        assert_eq!(router.state().lights(), LightState::Off);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn schedule_tokens_assigned_as_is() {
        let (mut router, mut rx) = router();
        router.handle(MODE, "manual");
        drain(&mut rx);

        router.handle(SCHEDULE, "09:00, 18:00");

        let schedule = router.state().schedule().unwrap();
        assert_eq!(schedule.on(), "09:00");
        // The second token keeps its leading space - no trimming
        assert_eq!(schedule.off(), " 18:00");

        let events = drain(&mut rx);
        assert!(matches!(
            events.as_slice(),
            [ControllerEvent::ScheduleChanged { .. }]
        ));
    }

    #[test]
    fn malformed_schedule_leaves_both_slots_unchanged() {
        let (mut router, mut rx) = router();
        router.handle(MODE, "manual");
        router.handle(SCHEDULE, "09:00,18:00");
        drain(&mut rx);

        router.handle(SCHEDULE, "07:00");
        router.handle(SCHEDULE, "07:00,08:00,09:00");

        let schedule = router.state().schedule().unwrap();
        assert_eq!(schedule.on(), "09:00");
        assert_eq!(schedule.off(), "18:00");
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn colour_valid_and_invalid_payloads() {
        let (mut router, mut rx) = router();
        router.handle(MODE, "manual");
        drain(&mut rx);

        router.handle(COLOUR, "255,0,0");
        assert_eq!(router.state().colour(), Some(RgbColor::new(255, 0, 0)));

        // Out-of-range and wrong-arity payloads leave the colour unchanged
        router.handle(COLOUR, "256,0,0");
        router.handle(COLOUR, "1,2");
        assert_eq!(router.state().colour(), Some(RgbColor::new(255, 0, 0)));

        let events = drain(&mut rx);
        assert_eq!(
            events,
            vec![ControllerEvent::ColourChanged {
                colour: RgbColor::new(255, 0, 0)
            }]
        );
    }

    #[test]
    fn status_report_bypasses_gate() {
        let (mut first, mut rx) = router();
        first.handle(MODE, "automatic");
        first.handle(STATUS, "on");
        assert_eq!(first.state().lights(), LightState::On);

        // Still works while the mode is Unknown on a fresh router
        let (mut fresh, _fresh_rx) = router();
        fresh.handle(STATUS, "on");
        assert_eq!(fresh.state().lights(), LightState::On);

        let events = drain(&mut rx);
        assert!(events.contains(&ControllerEvent::LightsChanged {
            lights: LightState::On
        }));
    }

    #[test]
    fn recovery_fires_once_after_fourth_command() {
        let (mut router, mut rx) = router();

        router.handle(MODE, "Manual");
        router.handle(CONTROL, "on");
        router.handle(SCHEDULE, "09:00,18:00");
        assert!(!drain(&mut rx).iter().any(ControllerEvent::is_recovery));

        router.handle(COLOUR, "255,255,255");

        let events = drain(&mut rx);
        assert_eq!(
            events.last(),
            Some(&ControllerEvent::FullyRecovered {
                state: router.state().clone()
            })
        );
        assert!(router.is_recovered());

        // Further matching traffic must not re-fire the signal
        router.handle(CONTROL, "off");
        router.handle(CONTROL, "on");
        router.handle(SCHEDULE, "09:00,18:00");
        router.handle(COLOUR, "255,255,255");
        assert!(!drain(&mut rx).iter().any(ControllerEvent::is_recovery));
    }

    #[test]
    fn colour_first_reordering_requires_resend() {
        let (mut router, mut rx) = router();

        // Colour arrives while the mode is still Unknown: rejected
        router.handle(COLOUR, "255,255,255");
        assert!(drain(&mut rx).iter().any(ControllerEvent::is_rejection));

        router.handle(MODE, "Manual");
        router.handle(CONTROL, "on");
        router.handle(SCHEDULE, "09:00,18:00");

        // All other fields match, but the colour was never applied
        assert!(!drain(&mut rx).iter().any(ControllerEvent::is_recovery));
        assert!(!router.is_recovered());

        // Resending the colour completes recovery
        router.handle(COLOUR, "255,255,255");
        assert!(drain(&mut rx).iter().any(ControllerEvent::is_recovery));
    }

    #[test]
    fn recovery_requires_exact_schedule_text() {
        let (mut router, mut rx) = router();

        router.handle(MODE, "manual");
        router.handle(CONTROL, "on");
        router.handle(COLOUR, "255,255,255");
        // Same clock times, different text
        router.handle(SCHEDULE, "9:00,18:00");
        assert!(!drain(&mut rx).iter().any(ControllerEvent::is_recovery));

        router.handle(SCHEDULE, "09:00,18:00");
        assert!(drain(&mut rx).iter().any(ControllerEvent::is_recovery));
    }

    #[test]
    fn admitted_light_control_echoes_outbound() {
        let (tx, mut outbound) = mpsc::unbounded_channel();
        let bus = EventBus::new();
        let mut router =
            CommandRouter::new(TopicMap::default(), RecoveryTarget::default(), bus).with_outbox(tx);

        router.handle(MODE, "manual");
        router.handle(CONTROL, "on");

        let message = outbound.try_recv().unwrap();
        assert_eq!(message.topic, "home/lights/control");
        assert_eq!(message.payload, "on");

        // No echo for a no-op repeat
        router.handle(CONTROL, "on");
        assert!(outbound.try_recv().is_err());

        // No echo for a rejected command
        router.handle(MODE, "automatic");
        router.handle(CONTROL, "off");
        assert!(outbound.try_recv().is_err());
    }

    #[test]
    fn status_report_does_not_echo() {
        let (tx, mut outbound) = mpsc::unbounded_channel();
        let bus = EventBus::new();
        let mut router =
            CommandRouter::new(TopicMap::default(), RecoveryTarget::default(), bus).with_outbox(tx);

        router.handle(STATUS, "on");
        assert!(outbound.try_recv().is_err());
    }

    #[test]
    fn closed_outbox_does_not_roll_back_state() {
        let (tx, outbound) = mpsc::unbounded_channel();
        drop(outbound);

        let bus = EventBus::new();
        let mut router =
            CommandRouter::new(TopicMap::default(), RecoveryTarget::default(), bus).with_outbox(tx);

        router.handle(MODE, "manual");
        router.handle(CONTROL, "on");

        // The echo failed, the mutation stands
        assert_eq!(router.state().lights(), LightState::On);
    }
}
