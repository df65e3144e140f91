use serde::{Deserialize, Serialize};

use crate::command_class::CommandClassKind;
use crate::node::NodeId;

/// Serial API function a frame is carried by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageClass {
    /// Application command addressed to a node
    SendData,
}

/// Transmission priority, consumed by the controller's send queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FramePriority {
    High,
    Set,
    Get,
    Config,
    Poll,
    Low,
}

/// The report a frame expects back from the node, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedReply {
    pub command_class: CommandClassKind,
    pub command: u8,
}

/// An addressed, transport-ready protocol message.
///
/// The payload holds the command-class bytes only (`[class, command, params...]`);
/// serial framing and checksums are added by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    node_id: NodeId,
    message_class: MessageClass,
    priority: FramePriority,
    payload: Vec<u8>,
    expected_reply: Option<ExpectedReply>,
}

impl Frame {
    /// Creates an application command frame for `node_id`.
    pub fn send_data(node_id: NodeId, priority: FramePriority, payload: Vec<u8>) -> Self {
        Self {
            node_id,
            message_class: MessageClass::SendData,
            priority,
            payload,
            expected_reply: None,
        }
    }

    pub fn with_expected_reply(mut self, command_class: CommandClassKind, command: u8) -> Self {
        self.expected_reply = Some(ExpectedReply {
            command_class,
            command,
        });
        self
    }

    /// Replaces the payload, keeping address, priority and expected reply.
    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn message_class(&self) -> MessageClass {
        self.message_class
    }

    pub fn priority(&self) -> FramePriority {
        self.priority
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn expected_reply(&self) -> Option<ExpectedReply> {
        self.expected_reply
    }

    /// Command class byte of the outermost payload
    pub fn command_class_key(&self) -> Option<u8> {
        self.payload.first().copied()
    }

    /// Command byte of the outermost payload
    pub fn command(&self) -> Option<u8> {
        self.payload.get(1).copied()
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NODE {} {:?} [", self.node_id, self.priority)?;
        for (i, byte) in self.payload.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        write!(f, "]")
    }
}
