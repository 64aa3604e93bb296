// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RGB colour type with comma-triple parsing.
//!
//! The colour topic carries colours as `"<r>,<g>,<b>"` with each channel an
//! integer in `[0, 255]`. Parsing validates all three channels before any
//! colour value is produced, so a partially valid payload can never leave a
//! half-updated colour behind.

use std::fmt;
use std::str::FromStr;

use crate::error::{ParseError, ValueError};

/// RGB colour with 8-bit channels (0-255).
///
/// # Examples
///
/// ```
/// use lumisim::types::RgbColor;
///
/// // Parse from the wire format
/// let colour = RgbColor::from_triple("255, 128, 0").unwrap();
/// assert_eq!(colour.red(), 255);
/// assert_eq!(colour.green(), 128);
/// assert_eq!(colour.blue(), 0);
///
/// // The display form is the canonical wire format
/// assert_eq!(colour.to_string(), "255,128,0");
///
/// // Hex form is available for display sinks
/// assert_eq!(colour.to_hex_with_hash(), "#FF8000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// Creates a new RGB colour.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses a colour from a comma-separated channel triple.
    ///
    /// The payload must contain exactly three comma-separated integers, each
    /// in `[0, 255]`. Tokens are trimmed of surrounding whitespace before
    /// parsing.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::WrongTokenCount`] for the wrong number of
    /// tokens, [`ParseError::InvalidValue`] for a non-numeric token, and
    /// [`ParseError::Channel`] for an out-of-range channel.
    ///
    /// # Examples
    ///
    /// ```
    /// use lumisim::types::RgbColor;
    ///
    /// assert_eq!(
    ///     RgbColor::from_triple("255,0,0").unwrap(),
    ///     RgbColor::new(255, 0, 0)
    /// );
    /// assert!(RgbColor::from_triple("256,0,0").is_err());
    /// assert!(RgbColor::from_triple("1,2").is_err());
    /// assert!(RgbColor::from_triple("a,b,c").is_err());
    /// ```
    pub fn from_triple(payload: &str) -> Result<Self, ParseError> {
        let tokens: Vec<&str> = payload.split(',').collect();
        if tokens.len() != 3 {
            return Err(ParseError::WrongTokenCount {
                expected: 3,
                actual: tokens.len(),
            });
        }

        let red = parse_channel(tokens[0], "red")?;
        let green = parse_channel(tokens[1], "green")?;
        let blue = parse_channel(tokens[2], "blue")?;

        Ok(Self::new(red, green, blue))
    }

    /// Returns the red channel.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green channel.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue channel.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Returns the colour as a hex string with the hash prefix.
    ///
    /// Display sinks use this to paint bulb icons; it plays no part in
    /// command parsing or recovery comparison.
    #[must_use]
    pub fn to_hex_with_hash(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }

    /// Creates a white colour.
    #[must_use]
    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.red, self.green, self.blue)
    }
}

impl FromStr for RgbColor {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_triple(s)
    }
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

/// Parses a single channel token, enforcing the 0-255 range.
fn parse_channel(token: &str, field: &str) -> Result<u8, ParseError> {
    let value: i64 = token
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidValue {
            field: field.to_string(),
            message: format!("not an integer: {token:?}"),
        })?;

    u8::try_from(value).map_err(|_| {
        ParseError::Channel(ValueError::OutOfRange {
            min: 0,
            max: 255,
            actual: value,
        })
    })
}
