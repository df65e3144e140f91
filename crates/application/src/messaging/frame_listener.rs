use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use infrastructure::transport::inbound_topic;
use infrastructure::{InboundFrame, MqttClient};

use crate::dispatcher::InboundDispatcher;

/// Feeds application commands received by the serial gateway into the
/// dispatcher.
pub struct FrameListener {
    mqtt_client: MqttClient,
    bridge_id: String,
    dispatcher: Arc<InboundDispatcher>,
}

impl FrameListener {
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

    pub async fn start(&self, cancel: CancellationToken) {
        let topic = inbound_topic(&self.bridge_id);
        if let Err(e) = self.mqtt_client.subscribe(&topic).await {
            error!(bridge_id = %self.bridge_id, error = %e, "Failed to subscribe to inbound frames");
            return;
        }

        info!(bridge_id = %self.bridge_id, topic = %topic, "Listening for inbound frames");
        let mut rx = self.mqtt_client.subscribe_messages();

        loop {
            let msg = tokio::select! {
                _ = cancel.cancelled() => break,
                msg = rx.recv() => msg,
            };

            match msg {
                Ok(msg) if msg.topic == topic => {
                    match serde_json::from_slice::<InboundFrame>(&msg.payload) {
                        Ok(frame) => self.handle_frame(&frame),
                        Err(e) => warn!(error = %e, "Received malformed inbound frame"),
                    }

                    if let Err(e) = self.mqtt_client.ack(&msg.topic, msg.pkid).await {
                        warn!(bridge_id = %self.bridge_id, error = %e, "Failed to ack frame");
                    }
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(bridge_id = %self.bridge_id, skipped = count, "Frame listener lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    warn!(bridge_id = %self.bridge_id, "Frame channel closed");
                    break;
                }
            }
        }

        info!(bridge_id = %self.bridge_id, "Frame listener stopped");
    }

    fn handle_frame(&self, frame: &InboundFrame) {
        match self.dispatcher.dispatch(frame.node_id, &frame.payload) {
            Ok(outcomes) => {
                debug!(node_id = %frame.node_id, outcomes = outcomes.len(), "Report dispatched")
            }
            Err(e) => warn!(node_id = %frame.node_id, error = %e, "Failed to dispatch report"),
        }
    }
}
