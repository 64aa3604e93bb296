// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controller event types.

use crate::command::CommandCategory;
use crate::gate::RejectReason;
use crate::state::DeviceState;
use crate::types::{LightState, Mode, RgbColor, SchedulePair};

/// Events emitted by the command router.
///
/// These are the only way state changes and gating outcomes reach the
/// presentation context; the router never calls display code directly.
/// Every variant carries the data a sink needs to render it without
/// reading device state.
///
/// # Examples
///
/// ```
/// use lumisim::event::ControllerEvent;
/// use lumisim::types::Mode;
///
/// let event = ControllerEvent::ModeChanged { mode: Mode::Manual };
/// assert!(!event.is_rejection());
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ControllerEvent {
    /// The operating mode changed.
    ModeChanged {
        /// The new mode.
        mode: Mode,
    },

    /// The lights turned on or off, by command or by telemetry.
    LightsChanged {
        /// The new light state.
        lights: LightState,
    },

    /// The schedule pair was replaced.
    ScheduleChanged {
        /// The new schedule.
        schedule: SchedulePair,
    },

    /// The colour was replaced.
    ColourChanged {
        /// The new colour.
        colour: RgbColor,
    },

    /// A well-formed command was rejected by the mode gate.
    CommandRejected {
        /// The category that was rejected.
        category: CommandCategory,
        /// The mode the device was in at the time.
        mode: Mode,
        /// Why the gate rejected the command.
        reason: RejectReason,
    },

    /// Every field reached the recovery target. Fires at most once.
    FullyRecovered {
        /// Snapshot of the device state at the moment of recovery.
        state: DeviceState,
    },
}

impl ControllerEvent {
    /// Returns `true` if this is a gating rejection.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::CommandRejected { .. })
    }

    /// Returns `true` if this is the one-shot recovery signal.
    #[must_use]
    pub const fn is_recovery(&self) -> bool {
        matches!(self, Self::FullyRecovered { .. })
    }
}
