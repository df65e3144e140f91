use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use domain::controller::Controller;
use domain::frame::Frame;
use domain::node::NodeId;

use crate::transport::FrameTransport;

/// [`Controller`] that enqueues frames for a [`ControllerWorker`].
///
/// `send` never blocks; frames leave in the order they were queued.
#[derive(Clone)]
pub struct QueuedController {
    own_node_id: NodeId,
    tx: mpsc::UnboundedSender<Frame>,
}

impl QueuedController {
    pub fn new(own_node_id: NodeId) -> (Self, mpsc::UnboundedReceiver<Frame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { own_node_id, tx }, rx)
    }
}

impl Controller for QueuedController {
    fn own_node_id(&self) -> NodeId {
        self.own_node_id
    }

    fn send(&self, frame: Frame) {
        debug!(%frame, "Queueing frame");
        if self.tx.send(frame).is_err() {
            warn!("Controller worker stopped, frame discarded");
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Drains the controller queue into a transport.
/// Transmission failures are retried, then logged and dropped.
pub struct ControllerWorker {
    rx: mpsc::UnboundedReceiver<Frame>,
    transport: Arc<dyn FrameTransport>,
    retry: RetryPolicy,
}

impl ControllerWorker {
    pub fn new(
        rx: mpsc::UnboundedReceiver<Frame>,
        transport: Arc<dyn FrameTransport>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            rx,
            transport,
            retry,
        }
    }

    pub async fn run(mut self, cancel: CancellationToken) {
        info!("Controller worker started");
        loop {
            let frame = tokio::select! {
                _ = cancel.cancelled() => break,
                frame = self.rx.recv() => match frame {
                    Some(frame) => frame,
                    None => break,
                },
            };
            self.deliver(&frame).await;
        }
        info!("Controller worker stopped");
    }

    async fn deliver(&self, frame: &Frame) {
        let attempts = self.retry.max_attempts.max(1);
        for attempt in 1..=attempts {
            match self.transport.transmit(frame).await {
                Ok(()) => return,
                Err(e) if attempt < attempts => {
                    warn!(%frame, attempt, error = %e, "Transmit failed, retrying");
                    tokio::time::sleep(self.retry.backoff * attempt).await;
                }
                Err(e) => {
                    error!(%frame, attempts, error = %e, "Giving up on frame");
                }
            }
        }
    }
}
