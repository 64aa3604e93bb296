// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Simulator configuration.
//!
//! Configuration is a JSON file; every field has a default, so an empty file
//! (or no file at all) yields a simulator that talks to a local broker on
//! the standard topics with the standard recovery target.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::command::TopicMap;
use crate::error::ConfigError;
use crate::recovery::RecoveryTarget;

/// Broker connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BrokerSettings {
    /// Broker host name or address.
    pub host: String,
    /// Broker port.
    pub port: u16,
    /// Optional username for authentication.
    pub username: Option<String>,
    /// Optional password for authentication.
    pub password: Option<String>,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u64,
    /// Connection timeout in seconds.
    pub connection_timeout_secs: u64,
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1883,
            username: None,
            password: None,
            keep_alive_secs: 30,
            connection_timeout_secs: 10,
        }
    }
}

impl BrokerSettings {
    /// Returns the keep-alive interval.
    #[must_use]
    pub const fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    /// Returns the connection timeout.
    #[must_use]
    pub const fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }

    /// Returns the credentials pair if both parts are configured.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }
}

/// Top-level simulator configuration.
///
/// # Examples
///
/// ```
/// use lumisim::config::SimulatorConfig;
///
/// let config = SimulatorConfig::default();
/// assert_eq!(config.broker.host, "localhost");
/// assert_eq!(config.broker.port, 1883);
/// assert_eq!(config.topics.mode, "home/lights/mode");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Broker connection settings.
    pub broker: BrokerSettings,
    /// Topic-to-category table.
    pub topics: TopicMap,
    /// Recovery target override.
    pub target: RecoveryTarget,
}

impl SimulatorConfig {
    /// Loads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }
}
