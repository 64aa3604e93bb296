// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT link to the message bus.
//!
//! The [`MqttLink`] owns the rumqttc connection. Building it blocks until the
//! broker acknowledges the connection or the timeout elapses; a broker that
//! cannot be reached at startup is a fatal condition. Once built, a single
//! call to [`MqttLink::run`] drives everything: the event loop is drained on
//! one task and every inbound publish is handed to the command router
//! serially, one message at a time, so the router never needs locking.
//!
//! Outbound echoes queued by the router are forwarded from the same loop via
//! non-blocking publishes; a failed publish is logged and dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::sync::mpsc;

use crate::command::TopicMap;
use crate::error::ProtocolError;
use crate::router::{CommandRouter, OutboundMessage};

/// Global counter for generating unique client IDs.
static LINK_CLIENT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Configuration for the MQTT link.
#[derive(Debug, Clone)]
pub struct MqttLinkConfig {
    host: String,
    port: u16,
    client_id: Option<String>,
    credentials: Option<(String, String)>,
    keep_alive: Duration,
    connection_timeout: Duration,
}

impl Default for MqttLinkConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 1883,
            client_id: None,
            credentials: None,
            keep_alive: Duration::from_secs(30),
            connection_timeout: Duration::from_secs(10),
        }
    }
}

/// A connected MQTT link.
///
/// # Examples
///
/// ```no_run
/// use lumisim::command::TopicMap;
/// use lumisim::protocol::MqttLink;
///
/// # async fn example() -> lumisim::Result<()> {
/// let link = MqttLink::builder()
///     .host("localhost")
///     .port(1883)
///     .build()
///     .await?;
///
/// link.subscribe_topics(&TopicMap::default()).await?;
/// # Ok(())
/// # }
/// ```
pub struct MqttLink {
    client: AsyncClient,
    event_loop: EventLoop,
}

impl MqttLink {
    /// Creates a new builder for configuring the link.
    #[must_use]
    pub fn builder() -> MqttLinkBuilder {
        MqttLinkBuilder::default()
    }

    /// Returns a clone of the MQTT client.
    ///
    /// The clone can publish and disconnect from any task; the event loop
    /// itself stays with the link.
    #[must_use]
    pub fn client(&self) -> AsyncClient {
        self.client.clone()
    }

    /// Subscribes to every command topic in the map.
    ///
    /// # Errors
    ///
    /// Returns an error if a subscription cannot be queued.
    pub async fn subscribe_topics(&self, topics: &TopicMap) -> Result<(), ProtocolError> {
        for topic in topics.subscriptions() {
            self.client
                .subscribe(topic, QoS::AtLeastOnce)
                .await
                .map_err(ProtocolError::Mqtt)?;
            tracing::debug!(topic = %topic, "subscribed to command topic");
        }
        Ok(())
    }

    /// Drives the link until disconnect.
    ///
    /// This is the single consumer context: inbound publishes are handed to
    /// `router.handle` serially, and outbound messages queued by the router
    /// are forwarded fire-and-forget. The loop exits when the broker
    /// disconnects or the event loop errors.
    pub async fn run(self, mut router: CommandRouter, mut outbox: mpsc::UnboundedReceiver<OutboundMessage>) {
        let Self {
            client,
            mut event_loop,
        } = self;

        let mut outbox_open = true;

        loop {
            tokio::select! {
                event = event_loop.poll() => match event {
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        match String::from_utf8(publish.payload.to_vec()) {
                            Ok(payload) => router.handle(&publish.topic, &payload),
                            Err(_) => {
                                tracing::debug!(
                                    topic = %publish.topic,
                                    "ignoring non-UTF-8 payload"
                                );
                            }
                        }
                    }
                    Ok(Event::Incoming(Packet::Disconnect)) => {
                        tracing::info!("MQTT broker disconnected");
                        break;
                    }
                    Ok(_) => {}
                    Err(error) => {
                        tracing::error!(%error, "MQTT event loop error");
                        break;
                    }
                },
                message = outbox.recv(), if outbox_open => match message {
                    Some(OutboundMessage { topic, payload }) => {
                        if let Err(error) =
                            client.try_publish(&topic, QoS::AtMostOnce, false, payload)
                        {
                            tracing::warn!(topic = %topic, %error, "outbound publish failed");
                        }
                    }
                    None => outbox_open = false,
                },
            }
        }
    }
}

impl std::fmt::Debug for MqttLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MqttLink").finish_non_exhaustive()
    }
}

/// Builder for connecting the MQTT link.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use lumisim::protocol::MqttLink;
///
/// # async fn example() -> lumisim::Result<()> {
/// let link = MqttLink::builder()
///     .host("localhost")
///     .port(1883)
///     .credentials("user", "password")
///     .keep_alive(Duration::from_secs(60))
///     .connection_timeout(Duration::from_secs(5))
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MqttLinkBuilder {
    config: MqttLinkConfig,
}

impl MqttLinkBuilder {
    /// Sets the broker host address.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Sets the broker port (default: 1883).
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Sets an explicit client ID.
    ///
    /// By default a unique ID is generated from the process ID and a
    /// counter.
    #[must_use]
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.config.client_id = Some(client_id.into());
        self
    }

    /// Sets authentication credentials.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the keep-alive interval (default: 30 seconds).
    #[must_use]
    pub fn keep_alive(mut self, duration: Duration) -> Self {
        self.config.keep_alive = duration;
        self
    }

    /// Sets the connection timeout (default: 10 seconds).
    #[must_use]
    pub fn connection_timeout(mut self, duration: Duration) -> Self {
        self.config.connection_timeout = duration;
        self
    }

    /// Builds the link and waits for the broker to acknowledge the
    /// connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is not set, the connection fails, or
    /// the broker does not acknowledge within the timeout. Startup
    /// connectivity is the one fatal condition in the system.
    pub async fn build(self) -> Result<MqttLink, ProtocolError> {
        if self.config.host.is_empty() {
            return Err(ProtocolError::InvalidAddress(
                "MQTT broker host is required".to_string(),
            ));
        }

        let client_id = self.config.client_id.clone().unwrap_or_else(|| {
            let counter = LINK_CLIENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
            format!("lumisim_{}_{}", std::process::id(), counter)
        });

        let mut mqtt_options = MqttOptions::new(&client_id, &self.config.host, self.config.port);
        mqtt_options.set_keep_alive(self.config.keep_alive);
        mqtt_options.set_clean_session(true);

        if let Some((ref username, ref password)) = self.config.credentials {
            mqtt_options.set_credentials(username, password);
        }

        let (client, mut event_loop) = AsyncClient::new(mqtt_options, 10);

        // Poll inline until ConnAck so a dead broker fails the build instead
        // of the consumer loop.
        let timeout = self.config.connection_timeout;
        let connack = tokio::time::timeout(timeout, async {
            loop {
                match event_loop.poll().await {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => return Ok(()),
                    Ok(_) => {}
                    Err(error) => {
                        return Err(ProtocolError::ConnectionFailed(error.to_string()));
                    }
                }
            }
        })
        .await;

        match connack {
            Ok(Ok(())) => {}
            Ok(Err(error)) => return Err(error),
            Err(_) => {
                return Err(ProtocolError::ConnectionFailed(format!(
                    "MQTT connection timeout after {}s",
                    timeout.as_secs()
                )));
            }
        }

        tracing::info!(
            host = %self.config.host,
            port = %self.config.port,
            client_id = %client_id,
            "connected to MQTT broker"
        );

        Ok(MqttLink { client, event_loop })
    }
}
