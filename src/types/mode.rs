// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device operating mode.
//!
//! The mode governs which command categories the device admits. A freshly
//! started device is in [`Mode::Unknown`] until an operator explicitly sets
//! a mode over the bus; mode changes themselves are never gated, because they
//! are how recovery from `Unknown` begins.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Operating mode of the lighting device.
///
/// # Examples
///
/// ```
/// use lumisim::types::Mode;
///
/// let mode: Mode = "MANUAL".parse().unwrap();
/// assert_eq!(mode, Mode::Manual);
///
/// // Only "manual" and "automatic" are accepted (case-insensitively)
/// assert!("eco".parse::<Mode>().is_err());
/// assert!("unknown".parse::<Mode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum Mode {
    /// Mode has not been set since startup.
    #[default]
    Unknown,
    /// Operator-driven control; gated commands are admitted.
    Manual,
    /// Schedule-driven control; gated commands are rejected.
    Automatic,
}

impl Mode {
    /// Returns the display name of this mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Manual => "Manual",
            Self::Automatic => "Automatic",
        }
    }

    /// Returns `true` if this is [`Mode::Manual`].
    #[must_use]
    pub const fn is_manual(&self) -> bool {
        matches!(self, Self::Manual)
    }

    /// Returns `true` if no mode has been set since startup.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ValueError;

    /// Parses an operator-supplied mode token.
    ///
    /// Only `"manual"` and `"automatic"` are recognized, case-insensitively.
    /// `Unknown` is a startup state, not a settable mode, so it does not
    /// parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "automatic" => Ok(Self::Automatic),
            _ => Err(ValueError::InvalidMode(s.to_string())),
        }
    }
}
