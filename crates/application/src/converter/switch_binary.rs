use std::sync::Arc;

use tracing::debug;

use domain::binding::BindingArguments;
use domain::command_class::{CommandClassKind, SwitchBinaryCommandClass};
use domain::controller::Controller;
use domain::event::EventSink;
use domain::frame::Frame;
use domain::node::{EndpointId, Node};
use domain::value::ProtocolValue;

use super::capability::{CapabilityConverter, ConverterContext};
use super::command::OnOffCommandConverter;
use super::registry::ConverterRegistry;
use super::state::IntegerOnOffConverter;

/// Switches report their own changes; polling is opt-in per binding.
const REFRESH_INTERVAL: u32 = 0;

/// Converter for the binary switch command class
pub struct SwitchBinaryConverter {
    context: ConverterContext,
}

impl SwitchBinaryConverter {
    pub fn new(controller: Arc<dyn Controller>, sink: Arc<dyn EventSink>) -> Self {
        let registry = ConverterRegistry::new()
            .with_state(IntegerOnOffConverter)
            .with_command(OnOffCommandConverter);

        Self {
            context: ConverterContext::new(controller, sink, registry),
        }
    }
}

impl CapabilityConverter for SwitchBinaryConverter {
    type CommandClass = SwitchBinaryCommandClass;

    fn context(&self) -> &ConverterContext {
        &self.context
    }

    fn kind(&self) -> CommandClassKind {
        CommandClassKind::SwitchBinary
    }

    fn refresh_interval_secs(&self) -> u32 {
        REFRESH_INTERVAL
    }

    fn build_refresh_frame(
        &self,
        node: &Node,
        command_class: &SwitchBinaryCommandClass,
        endpoint: EndpointId,
        _arguments: &BindingArguments,
    ) -> Option<Frame> {
        debug!(node_id = %node.id(), %endpoint, "Generating poll message for SWITCH_BINARY");
        node.encapsulate(command_class.get_value_message(), self.kind(), endpoint)
    }

    fn encode_command(
        &self,
        command_class: &mut SwitchBinaryCommandClass,
        value: ProtocolValue,
    ) -> Option<Vec<Frame>> {
        let level = value.as_integer()?;
        command_class.set_value_message(level).map(|frame| vec![frame])
    }
}
