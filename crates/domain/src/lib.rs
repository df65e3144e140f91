//! Domain layer - Protocol and home-automation model with no I/O
//!
//! This crate contains:
//! - Network addressing (Node, Endpoint)
//! - Wire frames and command classes (encode/decode, capability sub-state)
//! - Domain values (State, Command, Item) and item bindings
//! - Value-change and domain events
//! - Collaborator interfaces (Controller, EventSink, EventPublisher)
//!
//! Principles:
//! - No dependencies on infrastructure
//! - Protocol rules enforced where the bytes are produced
//! - Testable in isolation

pub mod binding;
pub mod command_class;
pub mod controller;
pub mod error;
pub mod event;
pub mod frame;
pub mod node;
pub mod value;

// Re-export commonly used types
pub use binding::{BindingArguments, ItemBinding};
pub use command_class::{CommandClass, CommandClassInstance, CommandClassKind};
pub use controller::Controller;
pub use error::DomainError;
pub use event::{DomainEvent, EventSink, ValueEvent};
pub use frame::{Frame, FramePriority};
pub use node::{Endpoint, EndpointId, Node, NodeId};
pub use value::{
    Command, CommandKind, Item, ItemName, ItemType, ProtocolKind, ProtocolValue, State, StateKind,
};
