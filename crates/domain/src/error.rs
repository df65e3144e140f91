use thiserror::Error;

use crate::command_class::CommandClassKind;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid item name: {0}")]
    InvalidItemName(String),

    #[error("Invalid node ID: {0}")]
    InvalidNodeId(u8),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Unsupported command class: 0x{0:02X}")]
    UnsupportedCommandClass(u8),

    #[error("Unsupported command 0x{command:02X} for command class {kind}")]
    UnsupportedCommand { kind: CommandClassKind, command: u8 },

    #[error("Malformed {kind} report: {reason}")]
    MalformedReport {
        kind: CommandClassKind,
        reason: String,
    },

    #[error("Node {node_id} has no endpoint {endpoint}")]
    UnknownEndpoint { node_id: u8, endpoint: u8 },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Transport error: {0}")]
    TransportError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
