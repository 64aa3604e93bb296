// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recovery target and edge-triggered recovery detection.
//!
//! The device is considered recovered when all five state fields match the
//! configured target at once: mode, lights, both schedule slots, and the
//! colour. The comparison is exact - schedule slots are compared as text,
//! never as clock times, so `"9:00"` does not match a target of `"09:00"`.
//!
//! The evaluator runs after every successful state mutation and latches on
//! the first full match. The latch is never reset, so the recovered signal
//! fires at most once per process lifetime even though the comparison may
//! keep holding true afterwards.

use crate::state::DeviceState;
use crate::types::{LightState, Mode, RgbColor, ScheduleSlot};

/// The fixed configuration the device must reach to count as recovered.
///
/// # Examples
///
/// ```
/// use lumisim::recovery::RecoveryTarget;
/// use lumisim::types::{LightState, Mode, RgbColor};
///
/// let target = RecoveryTarget::default();
/// assert_eq!(target.mode(), Mode::Manual);
/// assert_eq!(target.lights(), LightState::On);
/// assert_eq!(target.schedule_on().as_str(), "09:00");
/// assert_eq!(target.schedule_off().as_str(), "18:00");
/// assert_eq!(target.colour(), RgbColor::white());
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RecoveryTarget {
    mode: Mode,
    lights: LightState,
    schedule_on: ScheduleSlot,
    schedule_off: ScheduleSlot,
    colour: RgbColor,
}

impl Default for RecoveryTarget {
    fn default() -> Self {
        Self {
            mode: Mode::Manual,
            lights: LightState::On,
            schedule_on: ScheduleSlot::new("09:00"),
            schedule_off: ScheduleSlot::new("18:00"),
            colour: RgbColor::white(),
        }
    }
}

impl RecoveryTarget {
    /// Returns the target operating mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the target light state.
    #[must_use]
    pub const fn lights(&self) -> LightState {
        self.lights
    }

    /// Returns the target on-time slot.
    #[must_use]
    pub fn schedule_on(&self) -> &ScheduleSlot {
        &self.schedule_on
    }

    /// Returns the target off-time slot.
    #[must_use]
    pub fn schedule_off(&self) -> &ScheduleSlot {
        &self.schedule_off
    }

    /// Returns the target colour.
    #[must_use]
    pub const fn colour(&self) -> RgbColor {
        self.colour
    }

    /// Returns `true` if every field of `state` matches this target.
    ///
    /// All five fields must match simultaneously. Schedule slots compare as
    /// exact text; the colour compares channel-by-channel.
    #[must_use]
    pub fn matches(&self, state: &DeviceState) -> bool {
        let schedule_matches = state
            .schedule()
            .is_some_and(|s| *s.on() == self.schedule_on && *s.off() == self.schedule_off);

        state.mode() == self.mode
            && state.lights() == self.lights
            && schedule_matches
            && state.colour() == Some(self.colour)
    }
}

/// Edge-triggered recovery detector.
///
/// # Examples
///
/// ```
/// use lumisim::recovery::{RecoveryEvaluator, RecoveryTarget};
/// use lumisim::state::DeviceState;
///
/// let mut evaluator = RecoveryEvaluator::new(RecoveryTarget::default());
///
/// // A fresh device does not match the target
/// assert!(!evaluator.check(&DeviceState::new()));
/// assert!(!evaluator.is_recovered());
/// ```
#[derive(Debug)]
pub struct RecoveryEvaluator {
    target: RecoveryTarget,
    /// Latched on the first full match; never reset.
    recovered: bool,
}

impl RecoveryEvaluator {
    /// Creates an evaluator for the given target.
    #[must_use]
    pub const fn new(target: RecoveryTarget) -> Self {
        Self {
            target,
            recovered: false,
        }
    }

    /// Returns the target this evaluator compares against.
    #[must_use]
    pub const fn target(&self) -> &RecoveryTarget {
        &self.target
    }

    /// Returns `true` if the recovered signal has already fired.
    #[must_use]
    pub const fn is_recovered(&self) -> bool {
        self.recovered
    }

    /// Compares live state against the target.
    ///
    /// Returns `true` exactly once: on the transition from not-all-matching
    /// to all-matching. Later calls return `false` regardless of whether the
    /// state still matches.
    pub fn check(&mut self, state: &DeviceState) -> bool {
        if self.recovered {
            return false;
        }
        if self.target.matches(state) {
            self.recovered = true;
            return true;
        }
        false
    }
}

impl Default for RecoveryEvaluator {
    fn default() -> Self {
        Self::new(RecoveryTarget::default())
    }
}
