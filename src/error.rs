// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `lumisim` crate.
//!
//! This module provides the error hierarchy for failures across the crate:
//! value validation, payload parsing, MQTT communication, and configuration
//! loading. Payload parse failures are deliberately *not* escalated out of the
//! command router; they exist as types so handlers can log precise
//! diagnostics before dropping the message.

use thiserror::Error;

/// The main error type for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while parsing a command payload.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred during MQTT communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while loading configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to value validation and constraints.
///
/// These errors occur when attempting to create constrained types
/// with invalid values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// An invalid light state token was provided.
    #[error("invalid light state: {0}")]
    InvalidLightState(String),

    /// An invalid operating mode token was provided.
    #[error("invalid mode: {0}")]
    InvalidMode(String),
}

/// Errors related to parsing inbound command payloads.
///
/// These never propagate past the command router: a payload that fails to
/// parse is logged and ignored, leaving device state untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The payload did not split into the expected number of tokens.
    #[error("expected {expected} comma-separated values, got {actual}")]
    WrongTokenCount {
        /// Number of tokens the payload format requires.
        expected: usize,
        /// Number of tokens actually present.
        actual: usize,
    },

    /// A specific token failed to parse.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },

    /// A token parsed but violated a value constraint.
    #[error("invalid channel value: {0}")]
    Channel(#[from] ValueError),
}

/// Errors related to MQTT communication.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// MQTT client operation failed.
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Connection to the broker failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid broker address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Internal channel was closed.
    #[error("channel closed: {0}")]
    ChannelClosed(String),
}

/// Errors related to loading the simulator configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON.
    #[error("failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
