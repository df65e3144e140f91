use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use domain::binding::BindingArguments;
use domain::command_class::{CommandClass, CommandClassKind};
use domain::controller::Controller;
use domain::event::{EventSink, ValueEvent};
use domain::frame::Frame;
use domain::node::{EndpointId, Node, NodeId};
use domain::value::{Command, CommandKind, Item, ItemName, ProtocolValue, State};

use super::registry::ConverterRegistry;

/// Why an event or command was dropped. Logged once, never propagated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Diagnostic {
    #[error(
        "No state converter for item {item} (node {node_id}, endpoint {endpoint}), ignoring event: {event}"
    )]
    NoStateConverter {
        item: ItemName,
        node_id: NodeId,
        endpoint: EndpointId,
        event: ValueEvent,
    },

    #[error(
        "NODE {node_id}: No command converter for item {item}, type {command}, endpoint {endpoint}, ignoring command"
    )]
    NoCommandConverter {
        node_id: NodeId,
        item: ItemName,
        command: CommandKind,
        endpoint: EndpointId,
    },

    #[error("NODE {node_id}: Encoding {kind} command failed for endpoint {endpoint}")]
    EncodeFailed {
        node_id: NodeId,
        kind: CommandClassKind,
        endpoint: EndpointId,
    },

    #[error("NODE {node_id}: Endpoint {endpoint} does not expose {kind}")]
    EndpointUnavailable {
        node_id: NodeId,
        kind: CommandClassKind,
        endpoint: EndpointId,
    },

    #[error("Command class {actual} handed to the {expected} converter")]
    CommandClassMismatch {
        expected: CommandClassKind,
        actual: CommandClassKind,
    },

    #[error("No converter for command class {0}")]
    UnsupportedCommandClass(CommandClassKind),
}

/// Observable result of one event or command invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A decoded state was published to the event sink
    Published(State),
    /// Frames were handed to the controller; `echoed` is the optimistic state update
    Sent {
        frames: usize,
        echoed: Option<State>,
    },
    Dropped(Diagnostic),
}

impl Outcome {
    pub fn is_dropped(&self) -> bool {
        matches!(self, Self::Dropped(_))
    }
}

/// Collaborators and value converters shared by a capability converter
pub struct ConverterContext {
    controller: Arc<dyn Controller>,
    sink: Arc<dyn EventSink>,
    registry: ConverterRegistry,
}

impl ConverterContext {
    pub fn new(
        controller: Arc<dyn Controller>,
        sink: Arc<dyn EventSink>,
        registry: ConverterRegistry,
    ) -> Self {
        Self {
            controller,
            sink,
            registry,
        }
    }

    pub fn controller(&self) -> &dyn Controller {
        self.controller.as_ref()
    }

    pub fn sink(&self) -> &dyn EventSink {
        self.sink.as_ref()
    }

    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    /// Logs the diagnostic and turns it into a dropped outcome
    pub fn drop_with(&self, diagnostic: Diagnostic) -> Outcome {
        warn!("{}", diagnostic);
        Outcome::Dropped(diagnostic)
    }
}

/// Translates one command class kind between wire and domain representations.
///
/// Implementors supply the capability-specific parts (refresh frame, command
/// encoding, cadence); decoding events and orchestrating commands is shared.
pub trait CapabilityConverter: Send + Sync {
    type CommandClass: CommandClass;

    fn context(&self) -> &ConverterContext;

    fn kind(&self) -> CommandClassKind;

    /// Poll cadence in seconds. Zero disables polling for the capability.
    fn refresh_interval_secs(&self) -> u32;

    /// Poll request for the capability's current value, if it defines one
    fn build_refresh_frame(
        &self,
        node: &Node,
        command_class: &Self::CommandClass,
        endpoint: EndpointId,
        arguments: &BindingArguments,
    ) -> Option<Frame>;

    /// Encodes a converted command value into the frames to transmit, in order.
    /// `None` aborts the command; no frame is sent.
    fn encode_command(
        &self,
        command_class: &mut Self::CommandClass,
        value: ProtocolValue,
    ) -> Option<Vec<Frame>>;

    /// Decodes an inbound value change and publishes it as the item's state.
    fn on_value_event(
        &self,
        event: &ValueEvent,
        item: &Item,
        _arguments: &BindingArguments,
    ) -> Outcome {
        let ctx = self.context();
        let state = ctx
            .registry()
            .lookup_state(item, event.value.kind())
            .and_then(|converter| converter.convert(&event.value));

        let Some(state) = state else {
            return ctx.drop_with(Diagnostic::NoStateConverter {
                item: item.name.clone(),
                node_id: event.node_id,
                endpoint: event.endpoint,
                event: *event,
            });
        };

        ctx.sink().publish(&item.name, state);
        Outcome::Published(state)
    }

    /// Converts a domain command and transmits the resulting frames.
    ///
    /// Commands that are also states are echoed to the sink right away,
    /// without waiting for the device to confirm.
    fn on_command(
        &self,
        item: &Item,
        command: &Command,
        node: &Node,
        command_class: &mut Self::CommandClass,
        endpoint: EndpointId,
        _arguments: &BindingArguments,
    ) -> Outcome {
        let ctx = self.context();
        let node_id = node.id();

        let value = ctx
            .registry()
            .lookup_command(command.kind())
            .map(|converter| converter.convert(command));

        let value = match value {
            None => {
                return ctx.drop_with(Diagnostic::NoCommandConverter {
                    node_id,
                    item: item.name.clone(),
                    command: command.kind(),
                    endpoint,
                });
            }
            Some(None) => {
                return ctx.drop_with(Diagnostic::EncodeFailed {
                    node_id,
                    kind: self.kind(),
                    endpoint,
                });
            }
            Some(Some(value)) => value,
        };

        if !endpoint.is_root() && !node.supports(endpoint, self.kind()) {
            return ctx.drop_with(Diagnostic::EndpointUnavailable {
                node_id,
                kind: self.kind(),
                endpoint,
            });
        }

        let frames = self
            .encode_command(command_class, value)
            .and_then(|frames| {
                frames
                    .into_iter()
                    .map(|frame| node.encapsulate(frame, self.kind(), endpoint))
                    .collect::<Option<Vec<_>>>()
            });

        let Some(frames) = frames else {
            return ctx.drop_with(Diagnostic::EncodeFailed {
                node_id,
                kind: self.kind(),
                endpoint,
            });
        };

        let count = frames.len();
        for frame in frames {
            ctx.controller().send(frame);
        }

        let echoed = command.as_state();
        if let Some(state) = echoed {
            ctx.sink().publish(&item.name, state);
        }

        Outcome::Sent {
            frames: count,
            echoed,
        }
    }
}
