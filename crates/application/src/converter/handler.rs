use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use domain::binding::BindingArguments;
use domain::command_class::{CommandClass, CommandClassInstance, CommandClassKind};
use domain::controller::Controller;
use domain::event::{EventSink, ValueEvent};
use domain::frame::Frame;
use domain::node::{EndpointId, Node};
use domain::value::{Command, Item};

use super::battery::BatteryConverter;
use super::capability::{CapabilityConverter, Diagnostic, Outcome};
use super::switch_binary::SwitchBinaryConverter;
use super::wake_up::WakeUpConverter;

/// A capability converter for one of the supported command class kinds
pub enum Converter {
    WakeUp(WakeUpConverter),
    Battery(BatteryConverter),
    SwitchBinary(SwitchBinaryConverter),
}

impl Converter {
    /// Builds the converter for `kind`, if the bridge has one
    pub fn for_kind(
        kind: CommandClassKind,
        controller: Arc<dyn Controller>,
        sink: Arc<dyn EventSink>,
    ) -> Option<Self> {
        match kind {
            CommandClassKind::WakeUp => Some(Self::WakeUp(WakeUpConverter::new(controller, sink))),
            CommandClassKind::Battery => {
                Some(Self::Battery(BatteryConverter::new(controller, sink)))
            }
            CommandClassKind::SwitchBinary => Some(Self::SwitchBinary(
                SwitchBinaryConverter::new(controller, sink),
            )),
            CommandClassKind::MultiChannel => None,
        }
    }

    pub fn kind(&self) -> CommandClassKind {
        match self {
            Self::WakeUp(c) => c.kind(),
            Self::Battery(c) => c.kind(),
            Self::SwitchBinary(c) => c.kind(),
        }
    }

    pub fn refresh_interval_secs(&self) -> u32 {
        match self {
            Self::WakeUp(c) => c.refresh_interval_secs(),
            Self::Battery(c) => c.refresh_interval_secs(),
            Self::SwitchBinary(c) => c.refresh_interval_secs(),
        }
    }

    pub fn build_refresh_frame(
        &self,
        node: &Node,
        command_class: &CommandClassInstance,
        endpoint: EndpointId,
        arguments: &BindingArguments,
    ) -> Result<Option<Frame>, Diagnostic> {
        match (self, command_class) {
            (Self::WakeUp(c), CommandClassInstance::WakeUp(cc)) => {
                Ok(c.build_refresh_frame(node, cc, endpoint, arguments))
            }
            (Self::Battery(c), CommandClassInstance::Battery(cc)) => {
                Ok(c.build_refresh_frame(node, cc, endpoint, arguments))
            }
            (Self::SwitchBinary(c), CommandClassInstance::SwitchBinary(cc)) => {
                Ok(c.build_refresh_frame(node, cc, endpoint, arguments))
            }
            _ => Err(self.mismatch(command_class)),
        }
    }

    pub fn on_value_event(
        &self,
        event: &ValueEvent,
        item: &Item,
        arguments: &BindingArguments,
    ) -> Outcome {
        match self {
            Self::WakeUp(c) => c.on_value_event(event, item, arguments),
            Self::Battery(c) => c.on_value_event(event, item, arguments),
            Self::SwitchBinary(c) => c.on_value_event(event, item, arguments),
        }
    }

    pub fn on_command(
        &self,
        item: &Item,
        command: &Command,
        node: &Node,
        command_class: &mut CommandClassInstance,
        endpoint: EndpointId,
        arguments: &BindingArguments,
    ) -> Outcome {
        match (self, command_class) {
            (Self::WakeUp(c), CommandClassInstance::WakeUp(cc)) => {
                c.on_command(item, command, node, cc, endpoint, arguments)
            }
            (Self::Battery(c), CommandClassInstance::Battery(cc)) => {
                c.on_command(item, command, node, cc, endpoint, arguments)
            }
            (Self::SwitchBinary(c), CommandClassInstance::SwitchBinary(cc)) => {
                c.on_command(item, command, node, cc, endpoint, arguments)
            }
            (_, cc) => {
                let diagnostic = self.mismatch(cc);
                warn!("{}", diagnostic);
                Outcome::Dropped(diagnostic)
            }
        }
    }

    fn mismatch(&self, command_class: &CommandClassInstance) -> Diagnostic {
        Diagnostic::CommandClassMismatch {
            expected: self.kind(),
            actual: command_class.kind(),
        }
    }
}

/// Owns one converter per supported command class kind and routes
/// events, commands and refresh requests to it.
pub struct ConverterHandler {
    converters: HashMap<CommandClassKind, Converter>,
}

impl ConverterHandler {
    pub fn new(controller: Arc<dyn Controller>, sink: Arc<dyn EventSink>) -> Self {
        let converters = [
            CommandClassKind::WakeUp,
            CommandClassKind::Battery,
            CommandClassKind::SwitchBinary,
        ]
        .into_iter()
        .filter_map(|kind| {
            Converter::for_kind(kind, controller.clone(), sink.clone()).map(|c| (kind, c))
        })
        .collect();

        Self { converters }
    }

    pub fn converter(&self, kind: CommandClassKind) -> Option<&Converter> {
        self.converters.get(&kind)
    }

    pub fn supports(&self, kind: CommandClassKind) -> bool {
        self.converters.contains_key(&kind)
    }

    /// Resolved poll cadence for a binding: the `refresh_interval` argument
    /// when present and valid, otherwise the converter's default.
    pub fn refresh_interval(&self, kind: CommandClassKind, arguments: &BindingArguments) -> u32 {
        let Some(converter) = self.converter(kind) else {
            return 0;
        };

        match arguments.refresh_interval() {
            Ok(Some(secs)) => secs,
            Ok(None) => converter.refresh_interval_secs(),
            Err(e) => {
                warn!(%kind, error = %e, "Ignoring refresh_interval argument");
                converter.refresh_interval_secs()
            }
        }
    }

    pub fn handle_event(
        &self,
        event: &ValueEvent,
        item: &Item,
        arguments: &BindingArguments,
    ) -> Outcome {
        match self.converter(event.kind) {
            Some(converter) => converter.on_value_event(event, item, arguments),
            None => unsupported(event.kind),
        }
    }

    pub fn receive_command(
        &self,
        item: &Item,
        command: &Command,
        node: &Node,
        command_class: &mut CommandClassInstance,
        endpoint: EndpointId,
        arguments: &BindingArguments,
    ) -> Outcome {
        let kind = command_class.kind();
        match self.converter(kind) {
            Some(converter) => {
                debug!(node_id = %node.id(), item = %item.name, ?command, "Receiving command");
                converter.on_command(item, command, node, command_class, endpoint, arguments)
            }
            None => unsupported(kind),
        }
    }

    pub fn refresh_frame(
        &self,
        node: &Node,
        command_class: &CommandClassInstance,
        endpoint: EndpointId,
        arguments: &BindingArguments,
    ) -> Option<Frame> {
        let converter = self.converter(command_class.kind())?;
        match converter.build_refresh_frame(node, command_class, endpoint, arguments) {
            Ok(frame) => frame,
            Err(diagnostic) => {
                warn!("{}", diagnostic);
                None
            }
        }
    }
}

fn unsupported(kind: CommandClassKind) -> Outcome {
    let diagnostic = Diagnostic::UnsupportedCommandClass(kind);
    warn!("{}", diagnostic);
    Outcome::Dropped(diagnostic)
}
