//! MQTT broker integration.
//!
//! Subscribes to the device's telemetry topic and forwards every publish to
//! the TUI as an [`Inbound::Message`], together with connectivity changes.
//! Decoding is left to the processor, so malformed payloads still reach the
//! raw log.
//!
//! # Configuration
//!
//! ```toml
//! [mqtt]
//! host = "broker.local"
//! port = 1883
//! topic = "plant/line-1/telemetry"
//! username = "viewer"
//! password = "secret"
//! reconnect = "2s"
//! ```
//!
//! # Usage
//!
//! ```bash
//! pulsewatch --subscribe --config pulsewatch.toml --topic plant/line-1/telemetry
//! ```

use anyhow::Result;
use rand::Rng;
use rumqttc::{AsyncClient, Event, Incoming, MqttOptions, QoS};
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::MqttSettings;
use crate::source::{ChannelSource, Inbound};

/// Build a client id of the form `<prefix>_<6 hex digits>`.
pub fn client_id<R: Rng>(prefix: &str, rng: &mut R) -> String {
    format!("{}_{:06x}", prefix, rng.gen_range(0..0x100_0000u32))
}

/// Human-readable broker address for the status bar.
pub fn describe(settings: &MqttSettings) -> String {
    format!("mqtt://{}:{}/{}", settings.host, settings.port, settings.topic)
}

/// Connect to the broker and start forwarding events.
///
/// Returns a tuple of (source, handle) where:
/// - source is a ChannelSource for the TUI
/// - handle is the background task driving the MQTT event loop
///
/// Must be called from within a tokio runtime. Connection failures are not
/// returned here; they arrive on the source as [`Inbound::Errored`] and the
/// task keeps retrying.
pub async fn create_subscriber(
    settings: &MqttSettings,
) -> Result<(ChannelSource, tokio::task::JoinHandle<()>)> {
    let (tx, source) = ChannelSource::create(&describe(settings));
    let settings = settings.clone();
    let handle = tokio::spawn(run_event_loop(settings, tx));
    Ok((source, handle))
}

async fn run_event_loop(settings: MqttSettings, tx: mpsc::Sender<Inbound>) {
    let id = client_id(&settings.client_id_prefix, &mut rand::thread_rng());
    let mut options = MqttOptions::new(id.clone(), settings.host.clone(), settings.port);
    options.set_keep_alive(settings.keep_alive);
    if let Some(username) = &settings.username {
        options.set_credentials(
            username.clone(),
            settings.password.clone().unwrap_or_default(),
        );
    }

    let (client, mut eventloop) = AsyncClient::new(options, 32);
    info!(client_id = %id, broker = %describe(&settings), "connecting to MQTT broker");

    loop {
        let event = match eventloop.poll().await {
            Ok(Event::Incoming(Incoming::ConnAck(_))) => {
                // Subscriptions do not survive a clean-session reconnect.
                if let Err(err) = client.subscribe(settings.topic.clone(), QoS::AtLeastOnce).await {
                    warn!(error = %err, topic = %settings.topic, "failed to subscribe");
                    Inbound::Errored(format!("Subscribe failed: {}", err))
                } else {
                    info!(topic = %settings.topic, "subscribed to telemetry feed");
                    Inbound::Connected
                }
            }
            Ok(Event::Incoming(Incoming::Publish(publish))) => {
                debug!(topic = %publish.topic, bytes = publish.payload.len(), "publish received");
                Inbound::message(publish.topic, publish.payload.to_vec())
            }
            Ok(Event::Incoming(Incoming::Disconnect)) => Inbound::Disconnected,
            Ok(_) => continue,
            Err(err) => {
                warn!(error = %err, "MQTT connection dropped; reconnecting");
                if tx
                    .send(Inbound::Errored(format!("MQTT connection error: {}", err)))
                    .await
                    .is_err()
                {
                    return;
                }
                sleep(settings.reconnect).await;
                continue;
            }
        };

        if tx.send(event).await.is_err() {
            info!("TUI receiver dropped, stopping subscriber");
            let _ = client.disconnect().await;
            return;
        }
    }
}
