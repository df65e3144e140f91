use std::sync::{
    Arc, RwLock,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

use anyhow::{Result, anyhow};
use rumqttc::{AsyncClient, Event, EventLoop, LastWill, MqttOptions, Packet, QoS};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::config::MqttConfig;

#[derive(Clone, Debug)]
pub struct MqttMessage {
    pub topic: String,
    pub payload: Vec<u8>,
    pub pkid: u16,
}

/// Publishing half of the MQTT client, abstracted for tests
#[async_trait::async_trait]
pub trait MqttPublisherClient: Send + Sync {
    async fn publish_bytes(
        &self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<()>;

    fn is_connected(&self) -> bool;
}

/// Shared MQTT connection.
///
/// Incoming publishes are fanned out on a broadcast channel; subscriptions are
/// remembered and replayed after every reconnect. Acks are manual so a command
/// is only acknowledged once it has been handled.
#[derive(Clone)]
pub struct MqttClient {
    client: AsyncClient,
    tx: broadcast::Sender<MqttMessage>,
    connected: Arc<AtomicBool>,
    subscriptions: Arc<RwLock<Vec<String>>>,
}

impl MqttClient {
    pub fn connect(config: &MqttConfig, client_id: &str, last_will: Option<LastWill>) -> Self {
        let mut options = MqttOptions::new(client_id, &config.host, config.port);
        options.set_keep_alive(Duration::from_secs(config.keep_alive_secs));
        options.set_clean_session(false);
        options.set_manual_acks(true);
        if let Some(will) = last_will {
            options.set_last_will(will);
        }

        let (client, eventloop) = AsyncClient::new(options, 100);
        let (tx, _) = broadcast::channel(250);

        let this = Self {
            client,
            tx,
            connected: Arc::new(AtomicBool::new(false)),
            subscriptions: Arc::new(RwLock::new(Vec::new())),
        };
        tokio::spawn(this.clone().drive(eventloop));
        this
    }

    async fn drive(self, mut eventloop: EventLoop) {
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    let msg = MqttMessage {
                        topic: publish.topic,
                        payload: publish.payload.to_vec(),
                        pkid: publish.pkid,
                    };
                    if let Err(broadcast::error::SendError(msg)) = self.tx.send(msg) {
                        debug!(topic = %msg.topic, "No listener for MQTT message");
                    }
                }
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("MQTT connected");
                    self.connected.store(true, Ordering::Relaxed);
                    self.resubscribe().await;
                }
                Ok(Event::Outgoing(rumqttc::Outgoing::Disconnect)) => {
                    self.connected.store(false, Ordering::Relaxed);
                }
                Ok(_) => {}
                Err(e) => {
                    if self.connected.swap(false, Ordering::Relaxed) {
                        warn!(error = %e, "MQTT connection lost");
                    } else {
                        debug!(error = %e, "MQTT connection attempt failed");
                    }
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        }
    }

    async fn resubscribe(&self) {
        let topics = match self.subscriptions.read() {
            Ok(subs) => subs.clone(),
            Err(_) => return,
        };
        for topic in topics {
            if let Err(e) = self.client.subscribe(&topic, QoS::AtLeastOnce).await {
                error!(topic = %topic, error = %e, "Failed to re-subscribe");
            }
        }
    }

    pub fn subscribe_messages(&self) -> broadcast::Receiver<MqttMessage> {
        self.tx.subscribe()
    }

    pub async fn publish(&self, topic: &str, payload: &str, retain: bool) -> Result<()> {
        self.publish_bytes(topic, payload.as_bytes(), QoS::AtLeastOnce, retain)
            .await
    }

    pub async fn subscribe(&self, topic: &str) -> Result<()> {
        {
            let mut subs = self
                .subscriptions
                .write()
                .map_err(|_| anyhow!("Subscription list poisoned"))?;
            if !subs.iter().any(|s| s == topic) {
                subs.push(topic.to_string());
            }
        }

        self.client
            .subscribe(topic, QoS::AtLeastOnce)
            .await
            .map_err(|e| anyhow!("Failed to subscribe to topic {}: {}", topic, e))
    }

    pub async fn ack(&self, topic: &str, pkid: u16) -> Result<()> {
        let publish = rumqttc::Publish {
            pkid,
            topic: topic.to_string(),
            qos: QoS::AtLeastOnce,
            payload: bytes::Bytes::new(),
            retain: false,
            dup: false,
        };

        self.client
            .ack(&publish)
            .await
            .map_err(|e| anyhow!("Failed to ack packet {}: {}", pkid, e))
    }
}

#[async_trait::async_trait]
impl MqttPublisherClient for MqttClient {
    async fn publish_bytes(
        &self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<()> {
        self.client
            .publish(topic, qos, retain, payload)
            .await
            .map_err(|e| anyhow!("Failed to publish MQTT message: {}", e))
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }
}
