use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use domain::DomainEvent;
use domain::event::{EventPublisher, EventSink};
use domain::value::{ItemName, State};

/// Synchronous [`EventSink`] that queues state updates for a [`SinkPump`]
#[derive(Clone)]
pub struct ChannelEventSink {
    tx: mpsc::UnboundedSender<DomainEvent>,
}

impl ChannelEventSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DomainEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelEventSink {
    fn publish(&self, item: &ItemName, state: State) {
        debug!(item = %item, %state, "State update");
        if self
            .tx
            .send(DomainEvent::item_state_updated(item.clone(), state))
            .is_err()
        {
            warn!(item = %item, "Event pump stopped, state update discarded");
        }
    }
}

/// Forwards queued events to an async publisher
pub struct SinkPump {
    rx: mpsc::UnboundedReceiver<DomainEvent>,
    publisher: Arc<dyn EventPublisher>,
}

impl SinkPump {
    pub fn new(rx: mpsc::UnboundedReceiver<DomainEvent>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { rx, publisher }
    }

    pub async fn run(mut self, cancel: CancellationToken) {
        info!("Event pump started");
        loop {
            let event = tokio::select! {
                _ = cancel.cancelled() => break,
                event = self.rx.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
            };

            if let Err(e) = self.publisher.publish(event).await {
                error!(error = %e, "Failed to publish event");
            }
        }
        info!("Event pump stopped");
    }
}
