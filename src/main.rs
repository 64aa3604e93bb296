// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Simulator binary: wires the MQTT link, the command router, and the
//! console sink together, then runs until SIGINT.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use lumisim::config::SimulatorConfig;
use lumisim::event::EventBus;
use lumisim::protocol::MqttLink;
use lumisim::router::CommandRouter;
use lumisim::sink::{self, ConsoleSink, SinkRegistry};

#[tokio::main]
async fn main() -> lumisim::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Optional config file path as the single argument; defaults otherwise.
    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(path = %path, "loading configuration");
            SimulatorConfig::load(&path)?
        }
        None => SimulatorConfig::default(),
    };

    let bus = EventBus::new();

    let registry = Arc::new(SinkRegistry::new());
    registry.attach(ConsoleSink);
    let dispatcher = sink::spawn_dispatcher(&bus, Arc::clone(&registry));

    let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();
    let router = CommandRouter::new(
        config.topics.clone(),
        config.target.clone(),
        bus.clone(),
    )
    .with_outbox(outbox_tx);

    let mut builder = MqttLink::builder()
        .host(&config.broker.host)
        .port(config.broker.port)
        .keep_alive(config.broker.keep_alive())
        .connection_timeout(config.broker.connection_timeout());
    if let Some((username, password)) = config.broker.credentials() {
        builder = builder.credentials(username, password);
    }

    let link = builder.build().await?;
    link.subscribe_topics(&config.topics).await?;

    let client = link.client();
    let consumer = tokio::spawn(link.run(router, outbox_rx));

    tracing::info!("simulator running; press Ctrl-C to stop");
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");

    // Disconnecting ends the consumer loop; join it before exiting so the
    // last inbound messages are fully handled.
    if let Err(error) = client.disconnect().await {
        tracing::warn!(%error, "disconnect failed");
    }
    if let Err(error) = consumer.await {
        tracing::warn!(%error, "consumer task panicked");
    }

    // The bus drops with main; the dispatcher drains and exits.
    drop(bus);
    if let Err(error) = dispatcher.await {
        tracing::warn!(%error, "sink dispatcher panicked");
    }

    Ok(())
}
