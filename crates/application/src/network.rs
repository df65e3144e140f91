use dashmap::DashMap;
use tracing::{debug, info};

use domain::DomainError;
use domain::binding::ItemBinding;
use domain::command_class::{CommandClass, CommandClassInstance, CommandClassKind};
use domain::node::{EndpointId, Node, NodeId};
use domain::value::ItemName;

/// Address of one command class instance on the mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CapabilityKey {
    pub node_id: NodeId,
    pub endpoint: EndpointId,
    pub kind: CommandClassKind,
}

impl CapabilityKey {
    pub fn new(node_id: NodeId, endpoint: EndpointId, kind: CommandClassKind) -> Self {
        Self {
            node_id,
            endpoint,
            kind,
        }
    }

    pub fn of(binding: &ItemBinding) -> Self {
        Self::new(binding.node_id, binding.endpoint, binding.command_class)
    }
}

impl std::fmt::Display for CapabilityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NODE {} endpoint {} {}", self.node_id, self.endpoint, self.kind)
    }
}

/// Known nodes, their command class instances and the items bound to them.
///
/// Command class sub-state is mutated through [`Network::with_instance`],
/// which holds the instance's shard lock for the duration of the closure so
/// concurrent events and commands for one instance are serialized.
#[derive(Default)]
pub struct Network {
    nodes: DashMap<NodeId, Node>,
    instances: DashMap<CapabilityKey, CommandClassInstance>,
    bindings: DashMap<ItemName, ItemBinding>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&self, node: Node) {
        info!(node_id = %node.id(), endpoints = node.endpoints().count(), "Node added");
        self.nodes.insert(node.id(), node);
    }

    /// Registers a command class instance. The node and endpoint must be known
    /// and expose the instance's kind.
    pub fn add_instance(&self, instance: CommandClassInstance) -> Result<(), DomainError> {
        let key = CapabilityKey::new(instance.node_id(), instance.endpoint(), instance.kind());
        let node = self
            .nodes
            .get(&key.node_id)
            .ok_or(DomainError::InvalidNodeId(key.node_id.value()))?;

        if !node.supports(key.endpoint, key.kind) {
            return Err(DomainError::UnknownEndpoint {
                node_id: key.node_id.value(),
                endpoint: key.endpoint.value(),
            });
        }
        drop(node);

        debug!(capability = %key, version = instance.version(), "Command class registered");
        self.instances.insert(key, instance);
        Ok(())
    }

    /// Binds an item to a registered command class instance
    pub fn bind(&self, binding: ItemBinding) -> Result<(), DomainError> {
        let key = CapabilityKey::of(&binding);
        if !self.instances.contains_key(&key) {
            return Err(DomainError::InvalidConfiguration(format!(
                "item {} is bound to unknown capability {key}",
                binding.item.name
            )));
        }

        info!(item = %binding.item.name, capability = %key, "Item bound");
        self.bindings.insert(binding.item.name.clone(), binding);
        Ok(())
    }

    pub fn node(&self, node_id: NodeId) -> Option<Node> {
        self.nodes.get(&node_id).map(|n| n.clone())
    }

    pub fn binding(&self, item: &ItemName) -> Option<ItemBinding> {
        self.bindings.get(item).map(|b| b.clone())
    }

    /// Every binding that targets the given capability
    pub fn bindings_for(&self, key: CapabilityKey) -> Vec<ItemBinding> {
        self.bindings
            .iter()
            .filter(|b| b.targets(key.node_id, key.endpoint, key.kind))
            .map(|b| b.clone())
            .collect()
    }

    pub fn bindings(&self) -> Vec<ItemBinding> {
        self.bindings.iter().map(|b| b.clone()).collect()
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Runs `f` with exclusive access to the instance at `key` and a view of
    /// its node. `None` when either is unknown.
    pub fn with_instance<R>(
        &self,
        key: CapabilityKey,
        f: impl FnOnce(&Node, &mut CommandClassInstance) -> R,
    ) -> Option<R> {
        let node = self.nodes.get(&key.node_id)?;
        let mut instance = self.instances.get_mut(&key)?;
        Some(f(&node, &mut instance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::binding::BindingArguments;
    use domain::command_class::WakeUpCommandClass;
    use domain::node::Endpoint;
    use domain::value::{Item, ItemType};

    fn node_id() -> NodeId {
        NodeId::new(7).unwrap()
    }

    fn network() -> Network {
        let network = Network::new();
        network.add_node(
            Node::new(node_id(), vec![CommandClassKind::WakeUp]).with_endpoint(Endpoint::new(
                EndpointId::new(1),
                vec![CommandClassKind::SwitchBinary],
            )),
        );
        network
            .add_instance(CommandClassInstance::WakeUp(WakeUpCommandClass::new(
                node_id(),
                EndpointId::ROOT,
                2,
            )))
            .unwrap();
        network
    }

    fn binding(name: &str, endpoint: EndpointId, kind: CommandClassKind) -> ItemBinding {
        ItemBinding::new(
            Item::new(ItemName::new(name).unwrap(), ItemType::Number),
            node_id(),
            endpoint,
            kind,
            BindingArguments::default(),
        )
    }

    #[test]
    fn test_instance_requires_supported_endpoint() {
        let network = network();
        let err = network
            .add_instance(
                CommandClassInstance::new(
                    CommandClassKind::Battery,
                    node_id(),
                    EndpointId::new(1),
                    1,
                )
                .unwrap(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::UnknownEndpoint {
                node_id: 7,
                endpoint: 1
            }
        );

        let err = network
            .add_instance(
                CommandClassInstance::new(
                    CommandClassKind::Battery,
                    NodeId::new(8).unwrap(),
                    EndpointId::ROOT,
                    1,
                )
                .unwrap(),
            )
            .unwrap_err();
        assert_eq!(err, DomainError::InvalidNodeId(8));
    }

    #[test]
    fn test_bind_requires_instance() {
        let network = network();
        assert!(
            network
                .bind(binding("Sw", EndpointId::new(1), CommandClassKind::SwitchBinary))
                .is_err()
        );

        network
            .bind(binding("WakeUp", EndpointId::ROOT, CommandClassKind::WakeUp))
            .unwrap();
        let key = CapabilityKey::new(node_id(), EndpointId::ROOT, CommandClassKind::WakeUp);
        assert_eq!(network.bindings_for(key).len(), 1);
        assert_eq!(network.binding_count(), 1);
    }

    #[test]
    fn test_with_instance_mutates_in_place() {
        let network = network();
        let key = CapabilityKey::new(node_id(), EndpointId::ROOT, CommandClassKind::WakeUp);

        let events = network
            .with_instance(key, |_, cc| cc.handle_report(&[0x84, 0x06, 0x00, 0x0E, 0x10, 0x01]))
            .unwrap()
            .unwrap();
        assert_eq!(events.len(), 1);

        let interval = network.with_instance(key, |_, cc| match cc {
            CommandClassInstance::WakeUp(wake_up) => wake_up.interval(),
            _ => None,
        });
        assert_eq!(interval, Some(Some(3600)));

        let missing = CapabilityKey::new(node_id(), EndpointId::ROOT, CommandClassKind::Battery);
        assert!(network.with_instance(missing, |_, _| ()).is_none());
    }
}
