//! Bridge agent wiring shared by the binary and its tests

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use application::Network;
use domain::DomainEvent;
use domain::event::EventPublisher;
use infrastructure::config::BridgeConfig;

/// Builds the network model from configuration.
///
/// Invalid bindings are skipped with a warning; a broken node definition
/// aborts startup.
pub fn build_network(config: &BridgeConfig) -> Result<Network> {
    let network = Network::new();

    for node_config in &config.nodes {
        network.add_node(node_config.to_node());
        let instances = node_config
            .instances()
            .with_context(|| format!("Invalid command classes for node {}", node_config.id))?;
        for instance in instances {
            network
                .add_instance(instance)
                .with_context(|| format!("Invalid command class on node {}", node_config.id))?;
        }
    }

    for binding in &config.items {
        if let Err(e) = network.bind(binding.clone()) {
            warn!(item = %binding.item.name, error = %e, "Skipping item binding");
        }
    }

    info!(
        nodes = config.nodes.len(),
        bindings = network.binding_count(),
        "Network model ready"
    );
    Ok(network)
}

/// Publishes a heartbeat every `interval` until cancelled
pub async fn run_heartbeat(
    publisher: Arc<dyn EventPublisher>,
    bridge_id: String,
    network: Arc<Network>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    let start_time = Instant::now();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let event = DomainEvent::bridge_heartbeat(
                    &bridge_id,
                    start_time.elapsed().as_secs(),
                    network.binding_count(),
                );
                if let Err(e) = publisher.publish(event).await {
                    warn!(error = %e, "Failed to publish heartbeat");
                }
            }
        }
    }
}
