// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Message bus transport.
//!
//! The core treats the message bus as an external collaborator that delivers
//! `(topic, payload)` pairs and accepts outbound publishes. [`MqttLink`] is
//! that collaborator for MQTT: it connects through `rumqttc`, subscribes to
//! the command topics, and runs the single serial consumer loop that feeds
//! the command router.

mod mqtt;

pub use mqtt::{MqttLink, MqttLinkBuilder, MqttLinkConfig};
