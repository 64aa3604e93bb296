// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mode-based command admission policy.
//!
//! The gate is a pure function of the command category and the current mode;
//! it holds no state and performs no I/O, so the policy table can be tested
//! exhaustively on its own. Rejections are not retried by the device: the
//! operator must satisfy the gate (set the mode) and resend.
//!
//! # Policy
//!
//! | Category | Admitted when |
//! |---|---|
//! | `ModeChange` | always |
//! | `StatusReport` | always (telemetry, not a command) |
//! | `LightControl` | mode is `Manual` |
//! | `ScheduleChange` | mode is `Manual` |
//! | `ColourChange` | mode is `Manual`; while `Unknown` the rejection carries the distinct [`RejectReason::ModeUnset`] |

use std::fmt;

use crate::command::CommandCategory;
use crate::types::Mode;

/// Why a command was rejected by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RejectReason {
    /// The current mode does not admit this category.
    WrongMode(Mode),
    /// No mode has been set since startup; the operator must set one first.
    ModeUnset,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongMode(mode) => {
                write!(f, "system is in {mode} mode (must be in Manual mode)")
            }
            Self::ModeUnset => write!(f, "set mode to Manual first"),
        }
    }
}

/// Outcome of a gate decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The command may proceed to payload parsing and state mutation.
    Admitted,
    /// The command is rejected; no state mutation occurs.
    Rejected(RejectReason),
}

impl GateDecision {
    /// Returns `true` if the command was admitted.
    #[must_use]
    pub const fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted)
    }
}

/// The admission policy.
///
/// # Examples
///
/// ```
/// use lumisim::command::CommandCategory;
/// use lumisim::gate::{GateDecision, ModeGate, RejectReason};
/// use lumisim::types::Mode;
///
/// // Mode changes are always admitted - they are how recovery begins
/// assert!(ModeGate::decide(CommandCategory::ModeChange, Mode::Unknown).is_admitted());
///
/// // Colour changes while the mode is unset carry a distinct reason
/// assert_eq!(
///     ModeGate::decide(CommandCategory::ColourChange, Mode::Unknown),
///     GateDecision::Rejected(RejectReason::ModeUnset)
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ModeGate;

impl ModeGate {
    /// Decides whether a command category is admitted in the given mode.
    #[must_use]
    pub fn decide(category: CommandCategory, mode: Mode) -> GateDecision {
        match category {
            // Never gated: mode changes begin recovery, status reports are
            // trusted telemetry.
            CommandCategory::ModeChange | CommandCategory::StatusReport => GateDecision::Admitted,

            CommandCategory::LightControl | CommandCategory::ScheduleChange => {
                if mode.is_manual() {
                    GateDecision::Admitted
                } else {
                    GateDecision::Rejected(RejectReason::WrongMode(mode))
                }
            }

            CommandCategory::ColourChange => match mode {
                Mode::Manual => GateDecision::Admitted,
                Mode::Unknown => GateDecision::Rejected(RejectReason::ModeUnset),
                Mode::Automatic => GateDecision::Rejected(RejectReason::WrongMode(mode)),
            },
        }
    }

    /// Convenience predicate over [`ModeGate::decide`].
    #[must_use]
    pub fn is_admitted(category: CommandCategory, mode: Mode) -> bool {
        Self::decide(category, mode).is_admitted()
    }
}
