// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for controller state changes and gating outcomes.
//!
//! The [`EventBus`] uses tokio's broadcast channel to hand
//! [`ControllerEvent`]s from the single consumer context to any number of
//! presentation subscribers. Rendering code must never be invoked
//! synchronously from the consumer context; this bus is the only crossing
//! point.
//!
//! # Examples
//!
//! ```
//! use lumisim::event::{ControllerEvent, EventBus};
//! use lumisim::types::Mode;
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(ControllerEvent::ModeChanged { mode: Mode::Manual });
//! assert!(rx.try_recv().is_ok());
//! ```

mod controller_event;
mod event_bus;

pub use controller_event::ControllerEvent;
pub use event_bus::EventBus;
