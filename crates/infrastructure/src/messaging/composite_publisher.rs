use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use domain::DomainEvent;
use domain::event::EventPublisher;

/// Fans every event out to all publishers. A failing publisher is logged and
/// does not stop delivery to the others.
pub struct CompositeEventPublisher {
    publishers: Vec<Arc<dyn EventPublisher>>,
}

impl CompositeEventPublisher {
    pub fn new(publishers: Vec<Arc<dyn EventPublisher>>) -> Self {
        Self { publishers }
    }
}

#[async_trait]
impl EventPublisher for CompositeEventPublisher {
    async fn publish(
        &self,
        event: DomainEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        for (index, publisher) in self.publishers.iter().enumerate() {
            if let Err(e) = publisher.publish(event.clone()).await {
                error!(publisher = index, event = event.event_type(), error = %e, "Publisher failed");
            }
        }
        Ok(())
    }
}
