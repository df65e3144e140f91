use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use domain::value::{Command, ItemName};
use infrastructure::{MqttClient, MqttMessage};

use crate::dispatcher::InboundDispatcher;

/// Receives item commands from the automation core over MQTT.
///
/// Topic layout: `zwave/{bridge_id}/items/{item}/command`, payload a JSON
/// encoded [`Command`], e.g. `{"type":"Decimal","value":7200}`.
pub struct CommandListener {
    mqtt_client: MqttClient,
    bridge_id: String,
    dispatcher: Arc<InboundDispatcher>,
}

impl CommandListener {
    pub fn new(
        mqtt_client: MqttClient,
        bridge_id: String,
        dispatcher: Arc<InboundDispatcher>,
    ) -> Self {
        Self {
            mqtt_client,
            bridge_id,
            dispatcher,
        }
    }

    pub fn topic_filter(&self) -> String {
        format!("zwave/{}/items/+/command", self.bridge_id)
    }

    pub async fn start(&self, cancel: CancellationToken) {
        let filter = self.topic_filter();
        if let Err(e) = self.mqtt_client.subscribe(&filter).await {
            error!(bridge_id = %self.bridge_id, error = %e, "Failed to subscribe to commands");
            return;
        }

        info!(bridge_id = %self.bridge_id, topic = %filter, "Listening for commands");
        let mut rx = self.mqtt_client.subscribe_messages();

        loop {
            let msg = tokio::select! {
                _ = cancel.cancelled() => break,
                msg = rx.recv() => msg,
            };

            match msg {
                Ok(msg) => {
                    let Some(item) = item_from_topic(&self.bridge_id, &msg.topic) else {
                        continue;
                    };
                    self.handle_message(item, &msg);

                    if let Err(e) = self.mqtt_client.ack(&msg.topic, msg.pkid).await {
                        warn!(bridge_id = %self.bridge_id, error = %e, "Failed to ack command");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(bridge_id = %self.bridge_id, skipped = count, "Command listener lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    warn!(bridge_id = %self.bridge_id, "Command channel closed");
                    break;
                }
            }
        }

        info!(bridge_id = %self.bridge_id, "Command listener stopped");
    }

    fn handle_message(&self, item: &str, msg: &MqttMessage) {
        let item = match ItemName::new(item) {
            Ok(item) => item,
            Err(e) => {
                warn!(topic = %msg.topic, error = %e, "Command for invalid item name");
                return;
            }
        };

        let command = match serde_json::from_slice::<Command>(&msg.payload) {
            Ok(command) => command,
            Err(e) => {
                warn!(item = %item, error = %e, "Received malformed command");
                return;
            }
        };

        info!(item = %item, ?command, "Received command");
        if let Err(e) = self.dispatcher.dispatch_command(&item, &command) {
            warn!(item = %item, error = %e, "Failed to dispatch command");
        }
    }
}

/// Extracts `{item}` from `zwave/{bridge_id}/items/{item}/command`
pub fn item_from_topic<'a>(bridge_id: &str, topic: &'a str) -> Option<&'a str> {
    let mut parts = topic.split('/');
    match (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) {
        (Some("zwave"), Some(bridge), Some("items"), Some(item), Some("command"), None)
            if bridge == bridge_id && !item.is_empty() =>
        {
            Some(item)
        }
        _ => None,
    }
}
