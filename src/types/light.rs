// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! On/off state of the lights.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Whether the lights are on or off.
///
/// The wire representation is the lowercase token used on both the status
/// and control topics.
///
/// # Examples
///
/// ```
/// use lumisim::types::LightState;
///
/// let state: LightState = "ON".parse().unwrap();
/// assert_eq!(state, LightState::On);
/// assert_eq!(state.as_str(), "on");
///
/// // Only "on" and "off" are accepted
/// assert!("toggle".parse::<LightState>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum LightState {
    /// Lights are off.
    #[default]
    Off,
    /// Lights are on.
    On,
}

impl LightState {
    /// Returns the wire token for this state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
        }
    }

    /// Returns `true` if the lights are on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for LightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LightState {
    type Err = ValueError;

    /// Parses an on/off token, case-insensitively.
    ///
    /// Unlike richer power protocols there is no toggle token here; the
    /// device only understands the two literal states.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            _ => Err(ValueError::InvalidLightState(s.to_string())),
        }
    }
}

impl From<bool> for LightState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}
