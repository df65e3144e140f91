use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use domain::DomainError;
use domain::command_class::{CommandClass, CommandClassKind, multi_channel};
use domain::node::NodeId;
use domain::value::{Command, ItemName};

use crate::converter::{ConverterHandler, Outcome};
use crate::network::{CapabilityKey, Network};

/// Routes inbound reports and outbound item commands through the converters
pub struct InboundDispatcher {
    network: Arc<Network>,
    handler: Arc<ConverterHandler>,
}

impl InboundDispatcher {
    pub fn new(network: Arc<Network>, handler: Arc<ConverterHandler>) -> Self {
        Self { network, handler }
    }

    /// Decodes an application command received from `node_id` and publishes
    /// the resulting value changes to every item bound to the capability.
    ///
    /// Returns one outcome per (event, bound item) pair.
    pub fn dispatch(&self, node_id: NodeId, payload: &[u8]) -> Result<Vec<Outcome>> {
        let (endpoint, inner) = multi_channel::decapsulate(payload)?;
        let class = inner
            .first()
            .copied()
            .ok_or_else(|| anyhow!("Empty application command from node {node_id}"))?;
        let kind = CommandClassKind::from_key(class)
            .filter(|kind| self.handler.supports(*kind))
            .ok_or(DomainError::UnsupportedCommandClass(class))?;

        let key = CapabilityKey::new(node_id, endpoint, kind);
        let events = self
            .network
            .with_instance(key, |_, cc| cc.handle_report(inner))
            .ok_or(DomainError::UnknownEndpoint {
                node_id: node_id.value(),
                endpoint: endpoint.value(),
            })?
            .with_context(|| format!("Failed to decode report for {key}"))?;

        let mut outcomes = Vec::new();
        for event in events {
            let event_key = CapabilityKey::new(event.node_id, event.endpoint, event.kind);
            let bindings = self.network.bindings_for(event_key);
            if bindings.is_empty() {
                debug!(capability = %event_key, %event, "No items bound, discarding event");
                continue;
            }

            for binding in bindings {
                outcomes.push(
                    self.handler
                        .handle_event(&event, &binding.item, &binding.arguments),
                );
            }
        }

        Ok(outcomes)
    }

    /// Delivers a domain command to the capability the item is bound to
    pub fn dispatch_command(&self, item: &ItemName, command: &Command) -> Result<Outcome> {
        let binding = self
            .network
            .binding(item)
            .ok_or_else(|| anyhow!("No binding for item {item}"))?;
        let key = CapabilityKey::of(&binding);

        let outcome = self
            .network
            .with_instance(key, |node, cc| {
                self.handler.receive_command(
                    &binding.item,
                    command,
                    node,
                    cc,
                    binding.endpoint,
                    &binding.arguments,
                )
            })
            .ok_or_else(|| anyhow!("Capability {key} for item {item} is not registered"))?;

        if outcome.is_dropped() {
            debug!(item = %item, capability = %key, "Command was not delivered");
        }
        Ok(outcome)
    }

    pub fn network(&self) -> &Network {
        &self.network
    }
}
