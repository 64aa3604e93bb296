// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests driving the simulator over a real MQTT broker using
//! mockforge-mqtt.

use std::time::Duration;

use mockforge_mqtt::broker::MqttConfig;
use mockforge_mqtt::start_mqtt_server;
use rumqttc::{AsyncClient, MqttOptions, QoS};
use tokio::sync::{broadcast, mpsc};
use tokio::time::sleep;

use lumisim::command::TopicMap;
use lumisim::event::{ControllerEvent, EventBus};
use lumisim::protocol::MqttLink;
use lumisim::recovery::RecoveryTarget;
use lumisim::router::CommandRouter;
use lumisim::types::Mode;

/// Helper to find an available port for testing.
fn get_test_port() -> u16 {
    use std::sync::atomic::{AtomicU16, Ordering};
    static PORT_COUNTER: AtomicU16 = AtomicU16::new(18930);
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Starts a mock MQTT broker on the given port.
async fn start_mock_broker(port: u16) {
    let config = MqttConfig {
        port,
        host: "127.0.0.1".to_string(),
        ..Default::default()
    };

    tokio::spawn(async move {
        let _ = start_mqtt_server(config).await;
    });

    // Give the broker time to start, bind to port, and be ready to accept
    // connections
    sleep(Duration::from_millis(500)).await;
}

/// Connects an operator-side client with its own event loop task.
async fn connect_operator(port: u16, id: &str) -> AsyncClient {
    let mut options = MqttOptions::new(id, "127.0.0.1", port);
    options.set_keep_alive(Duration::from_secs(5));
    let (client, mut event_loop) = AsyncClient::new(options, 10);

    tokio::spawn(async move {
        loop {
            if event_loop.poll().await.is_err() {
                break;
            }
        }
    });

    // Let the connection settle
    sleep(Duration::from_millis(300)).await;
    client
}

/// Waits until an event matching the predicate arrives, or times out.
async fn wait_for(
    rx: &mut broadcast::Receiver<ControllerEvent>,
    predicate: impl Fn(&ControllerEvent) -> bool,
) -> Option<ControllerEvent> {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            match rx.recv().await {
                Ok(event) if predicate(&event) => return Some(event),
                Ok(_) => {}
                Err(_) => return None,
            }
        }
    })
    .await
    .ok()
    .flatten()
}

/// Spins up the full simulator against a broker on the given port.
async fn start_simulator(
    port: u16,
) -> (
    broadcast::Receiver<ControllerEvent>,
    AsyncClient,
    tokio::task::JoinHandle<()>,
) {
    let topics = TopicMap::default();
    let bus = EventBus::new();
    let events = bus.subscribe();

    let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();
    let router = CommandRouter::new(topics.clone(), RecoveryTarget::default(), bus)
        .with_outbox(outbox_tx);

    let link = MqttLink::builder()
        .host("127.0.0.1")
        .port(port)
        .build()
        .await
        .expect("failed to connect simulator link");
    link.subscribe_topics(&topics)
        .await
        .expect("failed to subscribe to command topics");

    let client = link.client();
    let consumer = tokio::spawn(link.run(router, outbox_rx));

    // Let the subscriptions settle before tests start publishing
    sleep(Duration::from_millis(300)).await;

    (events, client, consumer)
}

#[tokio::test]
async fn link_connects_to_broker() {
    let port = get_test_port();
    start_mock_broker(port).await;

    let result = MqttLink::builder().host("127.0.0.1").port(port).build().await;

    assert!(result.is_ok(), "failed to connect: {:?}", result.err());
}

#[tokio::test]
async fn full_recovery_over_broker() {
    let port = get_test_port();
    start_mock_broker(port).await;

    let (mut events, device, consumer) = start_simulator(port).await;
    let operator = connect_operator(port, "operator_recovery").await;

    let sequence = [
        ("home/lights/mode", "Manual"),
        ("home/lights/control", "on"),
        ("home/lights/schedule", "09:00,18:00"),
        ("home/lights/colour", "255,255,255"),
    ];
    for (topic, payload) in sequence {
        operator
            .publish(topic, QoS::AtLeastOnce, false, payload)
            .await
            .unwrap();
        sleep(Duration::from_millis(200)).await;
    }

    let recovered = wait_for(&mut events, ControllerEvent::is_recovery).await;
    assert!(recovered.is_some(), "recovery signal never arrived");

    device.disconnect().await.ok();
    consumer.await.unwrap();
}

#[tokio::test]
async fn colour_while_unknown_is_rejected_over_broker() {
    let port = get_test_port();
    start_mock_broker(port).await;

    let (mut events, device, consumer) = start_simulator(port).await;
    let operator = connect_operator(port, "operator_rejection").await;

    operator
        .publish("home/lights/colour", QoS::AtLeastOnce, false, "255,0,0")
        .await
        .unwrap();

    let rejection = wait_for(&mut events, ControllerEvent::is_rejection).await;
    let Some(ControllerEvent::CommandRejected { mode, .. }) = &rejection else {
        panic!("expected a rejection event, got {rejection:?}");
    };
    assert_eq!(*mode, Mode::Unknown);

    device.disconnect().await.ok();
    consumer.await.unwrap();
}

#[tokio::test]
async fn admitted_light_command_is_echoed() {
    let port = get_test_port();
    start_mock_broker(port).await;

    let (mut events, device, consumer) = start_simulator(port).await;
    let operator = connect_operator(port, "operator_echo").await;

    // Watch the control topic from the operator side
    let (seen_tx, mut seen_rx) = mpsc::unbounded_channel::<String>();
    let mut options = MqttOptions::new("observer_echo", "127.0.0.1", port);
    options.set_keep_alive(Duration::from_secs(5));
    let (observer, mut observer_loop) = AsyncClient::new(options, 10);
    tokio::spawn(async move {
        loop {
            match observer_loop.poll().await {
                Ok(rumqttc::Event::Incoming(rumqttc::Packet::Publish(publish))) => {
                    if let Ok(payload) = String::from_utf8(publish.payload.to_vec()) {
                        let _ = seen_tx.send(payload);
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
    observer
        .subscribe("home/lights/control", QoS::AtLeastOnce)
        .await
        .unwrap();
    sleep(Duration::from_millis(300)).await;

    operator
        .publish("home/lights/mode", QoS::AtLeastOnce, false, "manual")
        .await
        .unwrap();
    sleep(Duration::from_millis(200)).await;
    operator
        .publish("home/lights/control", QoS::AtLeastOnce, false, "on")
        .await
        .unwrap();

    assert!(
        wait_for(&mut events, |e| matches!(
            e,
            ControllerEvent::LightsChanged { .. }
        ))
        .await
        .is_some()
    );

    // The observer sees the operator command and then the device echo
    let mut on_count = 0;
    let deadline = tokio::time::timeout(Duration::from_secs(10), async {
        while let Some(payload) = seen_rx.recv().await {
            if payload == "on" {
                on_count += 1;
            }
            if on_count >= 2 {
                break;
            }
        }
    })
    .await;
    assert!(deadline.is_ok(), "echo never observed on the control topic");
    assert!(on_count >= 2, "expected the command and its echo");

    device.disconnect().await.ok();
    consumer.await.unwrap();
}
