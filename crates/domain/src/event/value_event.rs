use serde::{Deserialize, Serialize};

use crate::command_class::CommandClassKind;
use crate::node::{EndpointId, NodeId};
use crate::value::ProtocolValue;

/// A value change decoded from an inbound report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueEvent {
    pub node_id: NodeId,
    pub endpoint: EndpointId,
    pub kind: CommandClassKind,
    pub value: ProtocolValue,
}

impl ValueEvent {
    pub fn new(
        node_id: NodeId,
        endpoint: EndpointId,
        kind: CommandClassKind,
        value: ProtocolValue,
    ) -> Self {
        Self {
            node_id,
            endpoint,
            kind,
            value,
        }
    }
}

impl std::fmt::Display for ValueEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} value {} (node {}, endpoint {})",
            self.kind, self.value, self.node_id, self.endpoint
        )
    }
}
