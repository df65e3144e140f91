use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{EndpointId, NodeId};
use crate::command_class::{CommandClassKind, multi_channel};
use crate::frame::Frame;

/// A sub-addressable unit of a node and the command classes it exposes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub id: EndpointId,
    pub command_classes: Vec<CommandClassKind>,
}

impl Endpoint {
    pub fn new(id: EndpointId, command_classes: Vec<CommandClassKind>) -> Self {
        Self {
            id,
            command_classes,
        }
    }

    pub fn supports(&self, kind: CommandClassKind) -> bool {
        self.command_classes.contains(&kind)
    }
}

/// Represents a device on the mesh network.
/// The network layer owns nodes; converters only address frames through them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    multi_channel_version: u8,
    endpoints: BTreeMap<EndpointId, Endpoint>,
}

impl Node {
    /// Creates a node exposing `command_classes` on its root endpoint
    pub fn new(id: NodeId, command_classes: Vec<CommandClassKind>) -> Self {
        let mut endpoints = BTreeMap::new();
        endpoints.insert(
            EndpointId::ROOT,
            Endpoint::new(EndpointId::ROOT, command_classes),
        );
        Self {
            id,
            multi_channel_version: 2,
            endpoints,
        }
    }

    pub fn with_multi_channel_version(mut self, version: u8) -> Self {
        self.multi_channel_version = version;
        self
    }

    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoints.insert(endpoint.id, endpoint);
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn multi_channel_version(&self) -> u8 {
        self.multi_channel_version
    }

    pub fn endpoint(&self, id: EndpointId) -> Option<&Endpoint> {
        self.endpoints.get(&id)
    }

    /// Endpoints in ascending address order
    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.values()
    }

    pub fn supports(&self, endpoint: EndpointId, kind: CommandClassKind) -> bool {
        self.endpoint(endpoint).is_some_and(|ep| ep.supports(kind))
    }

    /// Addresses `frame` to `endpoint`, wrapping it in multi-channel encapsulation
    /// when the endpoint is not the root device.
    ///
    /// Returns `None` if the endpoint does not exist or does not expose `kind`.
    pub fn encapsulate(
        &self,
        frame: Frame,
        kind: CommandClassKind,
        endpoint: EndpointId,
    ) -> Option<Frame> {
        if endpoint.is_root() {
            return Some(frame);
        }

        if !self.supports(endpoint, kind) {
            return None;
        }

        let payload = if self.multi_channel_version >= 2 {
            multi_channel::encapsulate(endpoint, frame.payload())
        } else {
            multi_channel::encapsulate_instance(endpoint, frame.payload())
        };
        Some(frame.with_payload(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FramePriority;

    fn node() -> Node {
        Node::new(NodeId::new(4).unwrap(), vec![CommandClassKind::WakeUp])
            .with_endpoint(Endpoint::new(
                EndpointId::new(2),
                vec![CommandClassKind::SwitchBinary],
            ))
    }

    fn frame() -> Frame {
        Frame::send_data(NodeId::new(4).unwrap(), FramePriority::Set, vec![0x25, 0x01, 0xFF])
    }

    #[test]
    fn test_root_endpoint_not_wrapped() {
        let node = node();
        let wrapped = node
            .encapsulate(frame(), CommandClassKind::WakeUp, EndpointId::ROOT)
            .unwrap();
        assert_eq!(wrapped.payload(), &[0x25, 0x01, 0xFF]);
    }

    #[test]
    fn test_multi_channel_v2_encapsulation() {
        let node = node();
        let wrapped = node
            .encapsulate(frame(), CommandClassKind::SwitchBinary, EndpointId::new(2))
            .unwrap();
        assert_eq!(wrapped.payload(), &[0x60, 0x0D, 0x00, 0x02, 0x25, 0x01, 0xFF]);
        assert_eq!(wrapped.priority(), FramePriority::Set);
    }

    #[test]
    fn test_multi_instance_v1_encapsulation() {
        let node = node().with_multi_channel_version(1);
        let wrapped = node
            .encapsulate(frame(), CommandClassKind::SwitchBinary, EndpointId::new(2))
            .unwrap();
        assert_eq!(wrapped.payload(), &[0x60, 0x06, 0x02, 0x25, 0x01, 0xFF]);
    }

    #[test]
    fn test_unknown_endpoint_rejected() {
        let node = node();
        assert!(
            node.encapsulate(frame(), CommandClassKind::SwitchBinary, EndpointId::new(3))
                .is_none()
        );
    }

    #[test]
    fn test_unsupported_kind_on_endpoint_rejected() {
        let node = node();
        assert!(
            node.encapsulate(frame(), CommandClassKind::Battery, EndpointId::new(2))
                .is_none()
        );
    }

    #[test]
    fn test_endpoints_are_ordered() {
        let node = node().with_endpoint(Endpoint::new(EndpointId::new(1), vec![]));
        let ids: Vec<u8> = node.endpoints().map(|ep| ep.id.value()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }
}
