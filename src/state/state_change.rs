// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! State changes are the discrete mutations the command router applies to a
//! [`DeviceState`](super::DeviceState) after a payload has been validated and
//! the gate has admitted the command. Applying a change reports whether the
//! state actually moved, which is what drives event emission and the
//! recovery check downstream.

use crate::types::{LightState, Mode, RgbColor, SchedulePair};

/// Represents a change in device state.
///
/// # Examples
///
/// ```
/// use lumisim::state::{DeviceState, StateChange};
/// use lumisim::types::Mode;
///
/// let mut state = DeviceState::new();
///
/// // Apply returns true if state actually changed
/// assert!(state.apply(&StateChange::Mode(Mode::Manual)));
///
/// // Applying the same change again is a no-op
/// assert!(!state.apply(&StateChange::Mode(Mode::Manual)));
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum StateChange {
    /// Operating mode changed.
    Mode(Mode),

    /// Lights turned on or off.
    Lights(LightState),

    /// Schedule pair replaced. Both slots always move together.
    Schedule(SchedulePair),

    /// Colour replaced. All three channels always move together.
    Colour(RgbColor),
}

impl StateChange {
    /// Creates a lights-on change.
    #[must_use]
    pub const fn lights_on() -> Self {
        Self::Lights(LightState::On)
    }

    /// Creates a lights-off change.
    #[must_use]
    pub const fn lights_off() -> Self {
        Self::Lights(LightState::Off)
    }

    /// Returns a short label for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Mode(_) => "mode",
            Self::Lights(_) => "lights",
            Self::Schedule(_) => "schedule",
            Self::Colour(_) => "colour",
        }
    }
}
