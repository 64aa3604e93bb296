// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `lumisim` - a simulated smart-lighting device driven over MQTT.
//!
//! The simulator subscribes to a small set of command topics, maintains the
//! device state (mode, lights, schedule, colour), and applies a mode-based
//! admission policy to every inbound command: some commands are always
//! trusted, others only work in Manual mode, and colour changes are blocked
//! entirely until a mode has been set. When an external sequence of commands
//! restores every field to the configured target, a one-shot recovered
//! signal fires.
//!
//! # Architecture
//!
//! ```text
//! MQTT broker ── MqttLink ── CommandRouter ── ModeGate
//!                                │                │
//!                                ▼                ▼
//!                          DeviceState      CommandRejected
//!                                │
//!                                ▼
//!                        RecoveryEvaluator
//!                                │
//!                                ▼
//!                            EventBus ── sink dispatcher ── ConsoleSink
//! ```
//!
//! One consumer task drains the broker connection and feeds the router
//! serially; everything the presentation side sees crosses over the event
//! bus, never through a direct call.
//!
//! # Quick Start
//!
//! ```no_run
//! use lumisim::command::TopicMap;
//! use lumisim::event::EventBus;
//! use lumisim::protocol::MqttLink;
//! use lumisim::recovery::RecoveryTarget;
//! use lumisim::router::CommandRouter;
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> lumisim::Result<()> {
//!     let topics = TopicMap::default();
//!     let bus = EventBus::new();
//!     let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();
//!
//!     let router = CommandRouter::new(topics.clone(), RecoveryTarget::default(), bus.clone())
//!         .with_outbox(outbox_tx);
//!
//!     let link = MqttLink::builder().host("localhost").build().await?;
//!     link.subscribe_topics(&topics).await?;
//!     link.run(router, outbox_rx).await;
//!     Ok(())
//! }
//! ```
//!
//! # Driving the core without a broker
//!
//! The router is plain synchronous code, so tests (and embedders with their
//! own transport) can feed it directly:
//!
//! ```
//! use lumisim::command::TopicMap;
//! use lumisim::event::EventBus;
//! use lumisim::recovery::RecoveryTarget;
//! use lumisim::router::CommandRouter;
//! use lumisim::types::Mode;
//!
//! let mut router = CommandRouter::new(
//!     TopicMap::default(),
//!     RecoveryTarget::default(),
//!     EventBus::new(),
//! );
//!
//! router.handle("home/lights/mode", "manual");
//! router.handle("home/lights/control", "on");
//! assert_eq!(router.state().mode(), Mode::Manual);
//! assert!(router.state().lights().is_on());
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod gate;
pub mod protocol;
pub mod recovery;
pub mod router;
pub mod sink;
pub mod state;
pub mod types;

pub use command::{CommandCategory, TopicMap};
pub use config::SimulatorConfig;
pub use error::{ConfigError, Error, ParseError, ProtocolError, Result, ValueError};
pub use event::{ControllerEvent, EventBus};
pub use gate::{GateDecision, ModeGate, RejectReason};
pub use protocol::{MqttLink, MqttLinkBuilder};
pub use recovery::{RecoveryEvaluator, RecoveryTarget};
pub use router::{CommandRouter, OutboundMessage};
pub use sink::{ConsoleSink, NotificationSink, SinkRegistry};
pub use state::{DeviceState, StateChange};
pub use types::{LightState, Mode, RgbColor, SchedulePair, ScheduleSlot};
