use std::sync::Arc;

use tracing::debug;

use domain::binding::BindingArguments;
use domain::command_class::{CommandClass, CommandClassKind, WakeUpCommandClass};
use domain::controller::Controller;
use domain::event::EventSink;
use domain::frame::Frame;
use domain::node::{EndpointId, Node};
use domain::value::ProtocolValue;

use super::capability::{CapabilityConverter, ConverterContext};
use super::command::{DecimalCommandConverter, IntegerCommandConverter};
use super::registry::ConverterRegistry;
use super::state::{DecimalDecimalConverter, IntegerDecimalConverter, IntegerPercentConverter};

/// The wake-up interval only changes on explicit commands; it is never polled.
const REFRESH_INTERVAL: u32 = 0;

/// Converter for the wake-up command class.
///
/// A set command always produces two frames: the interval set, then a
/// read-back of the interval so the item ends up reflecting what the device
/// accepted rather than what was asked for.
pub struct WakeUpConverter {
    context: ConverterContext,
}

impl WakeUpConverter {
    pub fn new(controller: Arc<dyn Controller>, sink: Arc<dyn EventSink>) -> Self {
        let registry = ConverterRegistry::new()
            .with_state(IntegerDecimalConverter)
            .with_state(IntegerPercentConverter)
            .with_command(DecimalCommandConverter)
            .with_state(DecimalDecimalConverter)
            // Shadowed by DecimalCommandConverter; fractional intervals are
            // rejected when encoding instead of being rounded.
            .with_command(IntegerCommandConverter);

        Self {
            context: ConverterContext::new(controller, sink, registry),
        }
    }
}

impl CapabilityConverter for WakeUpConverter {
    type CommandClass = WakeUpCommandClass;

    fn context(&self) -> &ConverterContext {
        &self.context
    }

    fn kind(&self) -> CommandClassKind {
        CommandClassKind::WakeUp
    }

    fn refresh_interval_secs(&self) -> u32 {
        REFRESH_INTERVAL
    }

    fn build_refresh_frame(
        &self,
        _node: &Node,
        _command_class: &WakeUpCommandClass,
        _endpoint: EndpointId,
        _arguments: &BindingArguments,
    ) -> Option<Frame> {
        None
    }

    fn encode_command(
        &self,
        command_class: &mut WakeUpCommandClass,
        value: ProtocolValue,
    ) -> Option<Vec<Frame>> {
        let interval = value.as_integer().and_then(|v| u32::try_from(v).ok())?;
        let target = self.context.controller().own_node_id();

        let set = command_class.set_interval(interval, target)?;
        debug!(
            node_id = %command_class.node_id(),
            interval,
            "Setting wake-up interval, requesting read-back"
        );
        let read_back = command_class.request_interval();

        Some(vec![set, read_back])
    }
}
