//! Infrastructure layer - Controller link, MQTT and configuration

pub mod config;
pub mod controller;
pub mod messaging;
pub mod transport;

pub use config::BridgeConfig;
pub use controller::{ControllerWorker, QueuedController, RetryPolicy};
pub use messaging::composite_publisher::CompositeEventPublisher;
pub use messaging::event_sink::{ChannelEventSink, SinkPump};
pub use messaging::mqtt_client::{MqttClient, MqttMessage, MqttPublisherClient};
pub use messaging::mqtt_publisher::MqttEventPublisher;
pub use transport::{FrameTransport, InboundFrame, LoggingTransport, MqttFrameTransport};
