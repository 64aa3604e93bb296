// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lighting schedule slots.
//!
//! A schedule payload is two comma-separated tokens: the on time and the off
//! time. The device stores the tokens exactly as received and never
//! re-validates them as clock times; equality against the recovery target is
//! an exact text comparison. This lenient-parse/strict-compare behaviour is
//! deliberate and load-bearing, so [`ScheduleSlot`] keeps the raw text and
//! only offers clock interpretation as an optional display helper.

use std::fmt;

use chrono::NaiveTime;

use crate::error::ParseError;

/// One schedule slot holding the raw token text.
///
/// # Examples
///
/// ```
/// use lumisim::types::ScheduleSlot;
///
/// let slot = ScheduleSlot::new("09:00");
/// assert_eq!(slot.as_str(), "09:00");
/// assert!(slot.as_time().is_some());
///
/// // Tokens are stored as-is; a non-time token is still a valid slot
/// let odd = ScheduleSlot::new("soon");
/// assert_eq!(odd.as_str(), "soon");
/// assert!(odd.as_time().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ScheduleSlot(String);

impl ScheduleSlot {
    /// Creates a slot from raw token text.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interprets the token as a 24-hour `HH:MM` clock time, if it is one.
    ///
    /// Display sinks use this to format the schedule; it never participates
    /// in validation or recovery comparison.
    #[must_use]
    pub fn as_time(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.0, "%H:%M").ok()
    }
}

impl fmt::Display for ScheduleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ScheduleSlot {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl PartialEq<str> for ScheduleSlot {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ScheduleSlot {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// An on/off schedule pair, always set or replaced together.
///
/// # Examples
///
/// ```
/// use lumisim::types::SchedulePair;
///
/// let pair = SchedulePair::parse("09:00,18:00").unwrap();
/// assert_eq!(pair.on(), "09:00");
/// assert_eq!(pair.off(), "18:00");
///
/// // Exactly two tokens are required
/// assert!(SchedulePair::parse("09:00").is_err());
/// assert!(SchedulePair::parse("09:00,18:00,21:00").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SchedulePair {
    on: ScheduleSlot,
    off: ScheduleSlot,
}

impl SchedulePair {
    /// Creates a pair from two slot tokens.
    #[must_use]
    pub fn new(on: impl Into<ScheduleSlot>, off: impl Into<ScheduleSlot>) -> Self {
        Self {
            on: on.into(),
            off: off.into(),
        }
    }

    /// Parses a schedule payload.
    ///
    /// The payload must split into exactly two comma-separated tokens. The
    /// tokens are assigned as-is, without trimming or time-format
    /// validation.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::WrongTokenCount`] if the payload does not split
    /// into exactly two tokens.
    pub fn parse(payload: &str) -> Result<Self, ParseError> {
        let tokens: Vec<&str> = payload.split(',').collect();
        if tokens.len() != 2 {
            return Err(ParseError::WrongTokenCount {
                expected: 2,
                actual: tokens.len(),
            });
        }
        Ok(Self::new(tokens[0], tokens[1]))
    }

    /// Returns the on-time slot.
    #[must_use]
    pub fn on(&self) -> &ScheduleSlot {
        &self.on
    }

    /// Returns the off-time slot.
    #[must_use]
    pub fn off(&self) -> &ScheduleSlot {
        &self.off
    }
}

impl fmt::Display for SchedulePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.on, self.off)
    }
}
