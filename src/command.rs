// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command classification.
//!
//! Every inbound message is classified into a [`CommandCategory`] by looking
//! its topic up in the [`TopicMap`]. The map is a fixed table configured at
//! startup; topics it does not know are ignored by the router.
//!
//! | Category | Payload | Gated |
//! |---|---|---|
//! | [`StatusReport`](CommandCategory::StatusReport) | `on`/`off` | no (trusted telemetry) |
//! | [`LightControl`](CommandCategory::LightControl) | `on`/`off` | Manual only |
//! | [`ModeChange`](CommandCategory::ModeChange) | `manual`/`automatic` | no |
//! | [`ScheduleChange`](CommandCategory::ScheduleChange) | `tok1,tok2` | Manual only |
//! | [`ColourChange`](CommandCategory::ColourChange) | `r,g,b` | Manual only, blocked while Unknown |

use std::fmt;

/// Category of an inbound command, derived from its topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CommandCategory {
    /// Operator request to change the operating mode.
    ModeChange,
    /// Operator request to switch the lights on or off.
    LightControl,
    /// Operator request to replace the on/off schedule.
    ScheduleChange,
    /// Operator request to replace the light colour.
    ColourChange,
    /// External telemetry mirroring the light state. Not a command.
    StatusReport,
}

impl CommandCategory {
    /// Returns the display name used in rejection events and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ModeChange => "mode change",
            Self::LightControl => "light control",
            Self::ScheduleChange => "schedule change",
            Self::ColourChange => "colour change",
            Self::StatusReport => "status report",
        }
    }
}

impl fmt::Display for CommandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fixed topic-to-category table.
///
/// Topic names are configuration; the defaults follow the
/// `home/lights/<role>` convention.
///
/// # Examples
///
/// ```
/// use lumisim::command::{CommandCategory, TopicMap};
///
/// let topics = TopicMap::default();
/// assert_eq!(
///     topics.category("home/lights/mode"),
///     Some(CommandCategory::ModeChange)
/// );
/// assert_eq!(topics.category("home/heating/mode"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TopicMap {
    /// Trusted telemetry topic for the light state.
    pub status: String,
    /// Gated on/off command topic.
    pub control: String,
    /// Ungated mode command topic.
    pub mode: String,
    /// Gated schedule command topic.
    pub schedule: String,
    /// Gated colour command topic.
    pub colour: String,
}

impl Default for TopicMap {
    fn default() -> Self {
        Self {
            status: "home/lights/status".to_string(),
            control: "home/lights/control".to_string(),
            mode: "home/lights/mode".to_string(),
            schedule: "home/lights/schedule".to_string(),
            colour: "home/lights/colour".to_string(),
        }
    }
}

impl TopicMap {
    /// Classifies a topic into a command category.
    ///
    /// Returns `None` for topics outside the table; the router ignores
    /// those.
    #[must_use]
    pub fn category(&self, topic: &str) -> Option<CommandCategory> {
        if topic == self.status {
            Some(CommandCategory::StatusReport)
        } else if topic == self.control {
            Some(CommandCategory::LightControl)
        } else if topic == self.mode {
            Some(CommandCategory::ModeChange)
        } else if topic == self.schedule {
            Some(CommandCategory::ScheduleChange)
        } else if topic == self.colour {
            Some(CommandCategory::ColourChange)
        } else {
            None
        }
    }

    /// Returns every topic the consumer must subscribe to.
    #[must_use]
    pub fn subscriptions(&self) -> [&str; 5] {
        [
            &self.status,
            &self.control,
            &self.mode,
            &self.schedule,
            &self.colour,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_display_names() {
        assert_eq!(CommandCategory::ModeChange.to_string(), "mode change");
        assert_eq!(CommandCategory::LightControl.to_string(), "light control");
        assert_eq!(CommandCategory::StatusReport.to_string(), "status report");
    }

    #[test]
    fn default_topics_classify() {
        let topics = TopicMap::default();
        assert_eq!(
            topics.category("home/lights/status"),
            Some(CommandCategory::StatusReport)
        );
        assert_eq!(
            topics.category("home/lights/control"),
            Some(CommandCategory::LightControl)
        );
        assert_eq!(
            topics.category("home/lights/mode"),
            Some(CommandCategory::ModeChange)
        );
        assert_eq!(
            topics.category("home/lights/schedule"),
            Some(CommandCategory::ScheduleChange)
        );
        assert_eq!(
            topics.category("home/lights/colour"),
            Some(CommandCategory::ColourChange)
        );
    }

    #[test]
    fn unrecognized_topics_are_none() {
        let topics = TopicMap::default();
        assert_eq!(topics.category("home/heater"), None);
        assert_eq!(topics.category("home/lights"), None);
        assert_eq!(topics.category(""), None);
        // Classification is exact, not prefix-based
        assert_eq!(topics.category("home/lights/status/extra"), None);
    }

    #[test]
    fn custom_topics_classify() {
        let topics = TopicMap {
            mode: "site7/lamp/mode".to_string(),
            ..TopicMap::default()
        };
        assert_eq!(
            topics.category("site7/lamp/mode"),
            Some(CommandCategory::ModeChange)
        );
        assert_eq!(topics.category("home/lights/mode"), None);
    }

    #[test]
    fn subscriptions_cover_all_topics() {
        let topics = TopicMap::default();
        let subs = topics.subscriptions();
        assert_eq!(subs.len(), 5);
        for topic in subs {
            assert!(topics.category(topic).is_some());
        }
    }

    #[test]
    fn topic_map_deserializes_with_defaults() {
        let topics: TopicMap = serde_json::from_str("{}").unwrap();
        assert_eq!(topics, TopicMap::default());

        let topics: TopicMap =
            serde_json::from_str(r#"{"colour": "site7/lamp/colour"}"#).unwrap();
        assert_eq!(topics.colour, "site7/lamp/colour");
        assert_eq!(topics.status, "home/lights/status");
    }
}
