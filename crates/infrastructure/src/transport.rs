//! Outbound frame transports.
//!
//! Serial framing is done by an external gateway; the bridge hands it
//! addressed command-class frames as JSON over MQTT.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rumqttc::QoS;
use serde::{Deserialize, Serialize};
use tracing::info;

use domain::frame::Frame;
use domain::node::NodeId;

use crate::messaging::mqtt_client::MqttPublisherClient;

/// Link to the physical controller
#[async_trait]
pub trait FrameTransport: Send + Sync {
    async fn transmit(&self, frame: &Frame) -> Result<()>;
}

/// Writes frames to the log only. Used for dry runs.
#[derive(Debug, Default, Clone)]
pub struct LoggingTransport;

#[async_trait]
impl FrameTransport for LoggingTransport {
    async fn transmit(&self, frame: &Frame) -> Result<()> {
        info!(%frame, priority = ?frame.priority(), "Transmit (dry run)");
        Ok(())
    }
}

/// Publishes frames to `zwave/{bridge_id}/frames/out` for the serial gateway
pub struct MqttFrameTransport {
    client: Arc<dyn MqttPublisherClient>,
    topic: String,
}

impl MqttFrameTransport {
    pub fn new(client: Arc<dyn MqttPublisherClient>, bridge_id: &str) -> Self {
        Self {
            client,
            topic: outbound_topic(bridge_id),
        }
    }
}

#[async_trait]
impl FrameTransport for MqttFrameTransport {
    async fn transmit(&self, frame: &Frame) -> Result<()> {
        if !self.client.is_connected() {
            anyhow::bail!("MQTT client offline");
        }

        let payload = serde_json::to_vec(frame).context("Failed to encode frame")?;
        self.client
            .publish_bytes(&self.topic, &payload, QoS::AtLeastOnce, false)
            .await
    }
}

pub fn outbound_topic(bridge_id: &str) -> String {
    format!("zwave/{bridge_id}/frames/out")
}

pub fn inbound_topic(bridge_id: &str) -> String {
    format!("zwave/{bridge_id}/frames/in")
}

/// Application command received by the gateway from a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundFrame {
    pub node_id: NodeId,
    pub payload: Vec<u8>,
}
