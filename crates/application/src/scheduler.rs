use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use domain::controller::Controller;
use domain::value::ItemName;

use crate::converter::ConverterHandler;
use crate::network::{CapabilityKey, Network};

/// Polls bound capabilities at their resolved refresh interval.
///
/// Bindings resolving to an interval of zero are skipped entirely; the
/// converter is never asked for a refresh frame for them.
pub struct RefreshScheduler {
    network: Arc<Network>,
    handler: Arc<ConverterHandler>,
    controller: Arc<dyn Controller>,
    next_due: DashMap<ItemName, Instant>,
}

impl RefreshScheduler {
    pub fn new(
        network: Arc<Network>,
        handler: Arc<ConverterHandler>,
        controller: Arc<dyn Controller>,
    ) -> Self {
        Self {
            network,
            handler,
            controller,
            next_due: DashMap::new(),
        }
    }

    /// Sends a refresh frame for every binding due at `now`.
    /// A capability shared by several bindings is polled once per call.
    pub fn poll_due(&self, now: Instant) -> usize {
        let mut polled = HashSet::new();
        let mut sent = 0;

        for binding in self.network.bindings() {
            let interval = self
                .handler
                .refresh_interval(binding.command_class, &binding.arguments);
            if interval == 0 {
                continue;
            }

            let due = *self.next_due.entry(binding.item.name.clone()).or_insert(now);
            if now < due {
                continue;
            }
            self.next_due.insert(
                binding.item.name.clone(),
                now + Duration::from_secs(u64::from(interval)),
            );

            let key = CapabilityKey::of(&binding);
            if !polled.insert(key) {
                continue;
            }

            let frame = self
                .network
                .with_instance(key, |node, cc| {
                    self.handler
                        .refresh_frame(node, cc, binding.endpoint, &binding.arguments)
                })
                .flatten();

            if let Some(frame) = frame {
                debug!(item = %binding.item.name, capability = %key, %frame, "Refreshing");
                self.controller.send(frame);
                sent += 1;
            }
        }

        sent
    }

    /// Drives [`poll_due`](Self::poll_due) every `tick` until cancelled
    pub async fn run(&self, tick: Duration, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(tick_ms = tick.as_millis() as u64, "Refresh scheduler started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Refresh scheduler stopped");
                    break;
                }
                now = ticker.tick() => {
                    let sent = self.poll_due(now);
                    if sent > 0 {
                        debug!(sent, "Refresh frames queued");
                    }
                }
            }
        }
    }
}
