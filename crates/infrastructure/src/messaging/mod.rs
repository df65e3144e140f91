pub mod composite_publisher;
pub mod event_sink;
pub mod mqtt_client;
pub mod mqtt_publisher;

pub use composite_publisher::CompositeEventPublisher;
pub use event_sink::{ChannelEventSink, SinkPump};
