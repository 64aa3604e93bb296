// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.

use crate::types::{LightState, Mode, RgbColor, SchedulePair};

use super::StateChange;

/// Tracked state of the lighting device.
///
/// A fresh device starts with mode `Unknown`, lights off, and no schedule or
/// colour configured. The state is owned by a single command router on the
/// consumer task and is not thread-safe; other contexts observe it only
/// through events.
///
/// # Examples
///
/// ```
/// use lumisim::state::DeviceState;
/// use lumisim::types::{LightState, Mode};
///
/// let state = DeviceState::new();
/// assert_eq!(state.mode(), Mode::Unknown);
/// assert_eq!(state.lights(), LightState::Off);
/// assert!(state.schedule().is_none());
/// assert!(state.colour().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeviceState {
    /// Operating mode. `Unknown` until an operator sets one.
    mode: Mode,
    /// Whether the lights are on.
    lights: LightState,
    /// Schedule pair, unset until a valid schedule payload arrives.
    schedule: Option<SchedulePair>,
    /// Colour, unset until a valid colour payload arrives.
    colour: Option<RgbColor>,
}

impl DeviceState {
    /// Creates the initial device state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the operating mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Sets the operating mode.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Gets the light state.
    #[must_use]
    pub const fn lights(&self) -> LightState {
        self.lights
    }

    /// Sets the light state.
    pub fn set_lights(&mut self, lights: LightState) {
        self.lights = lights;
    }

    /// Gets the schedule pair, if one has been set.
    #[must_use]
    pub fn schedule(&self) -> Option<&SchedulePair> {
        self.schedule.as_ref()
    }

    /// Replaces the schedule pair. Both slots always move together.
    pub fn set_schedule(&mut self, schedule: SchedulePair) {
        self.schedule = Some(schedule);
    }

    /// Gets the colour, if one has been set.
    #[must_use]
    pub const fn colour(&self) -> Option<RgbColor> {
        self.colour
    }

    /// Replaces the colour. All three channels always move together.
    pub fn set_colour(&mut self, colour: RgbColor) {
        self.colour = Some(colour);
    }

    /// Applies a state change and returns whether the state actually moved.
    ///
    /// # Returns
    ///
    /// Returns `true` if the state was modified, `false` if it was already
    /// at the target value.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        match change {
            StateChange::Mode(mode) => {
                if self.mode == *mode {
                    false
                } else {
                    self.mode = *mode;
                    true
                }
            }
            StateChange::Lights(lights) => {
                if self.lights == *lights {
                    false
                } else {
                    self.lights = *lights;
                    true
                }
            }
            StateChange::Schedule(schedule) => {
                if self.schedule.as_ref() == Some(schedule) {
                    false
                } else {
                    self.schedule = Some(schedule.clone());
                    true
                }
            }
            StateChange::Colour(colour) => {
                if self.colour == Some(*colour) {
                    false
                } else {
                    self.colour = Some(*colour);
                    true
                }
            }
        }
    }
}
