// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for the lighting device.
//!
//! This module provides type-safe representations of the values carried on
//! the command topics. Each type validates at construction time, so device
//! state can only ever hold well-formed values.
//!
//! # Types
//!
//! - [`Mode`] - Operating mode (Unknown/Manual/Automatic)
//! - [`LightState`] - On/off state of the lights
//! - [`RgbColor`] - RGB colour with 8-bit channels (0-255)
//! - [`ScheduleSlot`] / [`SchedulePair`] - Raw schedule tokens, lenient by
//!   design

mod light;
mod mode;
mod rgb_color;
mod schedule;

pub use light::LightState;
pub use mode::Mode;
pub use rgb_color::RgbColor;
pub use schedule::{SchedulePair, ScheduleSlot};
