use std::sync::Arc;

use async_trait::async_trait;
use rumqttc::QoS;
use serde_json::json;

use domain::DomainEvent;
use domain::event::EventPublisher;

use crate::messaging::mqtt_client::MqttPublisherClient;

/// Publishes item states on `zwave/items/{item}/state` (retained) and
/// heartbeats on `zwave/{bridge_id}/health`.
pub struct MqttEventPublisher {
    client: Arc<dyn MqttPublisherClient>,
}

impl MqttEventPublisher {
    pub fn new(client: Arc<dyn MqttPublisherClient>) -> Self {
        Self { client }
    }

    fn encode(event: &DomainEvent) -> (String, serde_json::Value, QoS, bool) {
        match event {
            DomainEvent::ItemStateUpdated {
                item,
                state,
                timestamp,
            } => (
                format!("zwave/items/{item}/state"),
                json!({
                    "state": state,
                    "ts": timestamp.timestamp_millis(),
                }),
                QoS::AtLeastOnce,
                true,
            ),
            DomainEvent::BridgeHeartbeat {
                bridge_id,
                uptime_secs,
                active_bindings,
                timestamp,
            } => (
                format!("zwave/{bridge_id}/health"),
                json!({
                    "uptime": uptime_secs,
                    "bindings": active_bindings,
                    "ts": timestamp.timestamp_millis(),
                }),
                QoS::AtMostOnce,
                false,
            ),
        }
    }
}

#[async_trait]
impl EventPublisher for MqttEventPublisher {
    async fn publish(
        &self,
        event: DomainEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let (topic, payload, qos, retain) = Self::encode(&event);
        self.client
            .publish_bytes(&topic, payload.to_string().as_bytes(), qos, retain)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::tests::RecordingClient;
    use domain::value::{ItemName, State};

    #[tokio::test]
    async fn test_state_topic_and_payload() {
        let client = Arc::new(RecordingClient::default());
        let publisher = MqttEventPublisher::new(client.clone());

        publisher
            .publish(DomainEvent::item_state_updated(
                ItemName::new("Sensor_WakeUp").unwrap(),
                State::Decimal(7200.0),
            ))
            .await
            .unwrap();

        let published = client.published.lock().unwrap();
        assert_eq!(published[0].0, "zwave/items/Sensor_WakeUp/state");
        let body: serde_json::Value = serde_json::from_slice(&published[0].1).unwrap();
        assert_eq!(body["state"]["type"], "Decimal");
        assert_eq!(body["state"]["value"], 7200.0);
    }

    #[tokio::test]
    async fn test_heartbeat_topic() {
        let client = Arc::new(RecordingClient::default());
        let publisher = MqttEventPublisher::new(client.clone());

        publisher
            .publish(DomainEvent::bridge_heartbeat("hall", 60, 3))
            .await
            .unwrap();

        let published = client.published.lock().unwrap();
        assert_eq!(published[0].0, "zwave/hall/health");
        let body: serde_json::Value = serde_json::from_slice(&published[0].1).unwrap();
        assert_eq!(body["bindings"], 3);
    }
}
