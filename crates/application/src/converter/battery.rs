use std::sync::Arc;

use tracing::debug;

use domain::binding::BindingArguments;
use domain::command_class::{BatteryCommandClass, CommandClassKind};
use domain::controller::Controller;
use domain::event::EventSink;
use domain::frame::Frame;
use domain::node::{EndpointId, Node};
use domain::value::ProtocolValue;

use super::capability::{CapabilityConverter, ConverterContext};
use super::registry::ConverterRegistry;
use super::state::{IntegerDecimalConverter, IntegerPercentConverter};

const REFRESH_INTERVAL: u32 = 3600;

/// Converter for the battery command class. Read-only: no command converters.
pub struct BatteryConverter {
    context: ConverterContext,
}

impl BatteryConverter {
    pub fn new(controller: Arc<dyn Controller>, sink: Arc<dyn EventSink>) -> Self {
        let registry = ConverterRegistry::new()
            .with_state(IntegerDecimalConverter)
            .with_state(IntegerPercentConverter);

        Self {
            context: ConverterContext::new(controller, sink, registry),
        }
    }
}

impl CapabilityConverter for BatteryConverter {
    type CommandClass = BatteryCommandClass;

    fn context(&self) -> &ConverterContext {
        &self.context
    }

    fn kind(&self) -> CommandClassKind {
        CommandClassKind::Battery
    }

    fn refresh_interval_secs(&self) -> u32 {
        REFRESH_INTERVAL
    }

    fn build_refresh_frame(
        &self,
        node: &Node,
        command_class: &BatteryCommandClass,
        endpoint: EndpointId,
        _arguments: &BindingArguments,
    ) -> Option<Frame> {
        debug!(node_id = %node.id(), %endpoint, "Generating poll message for BATTERY");
        node.encapsulate(command_class.get_value_message(), self.kind(), endpoint)
    }

    fn encode_command(
        &self,
        _command_class: &mut BatteryCommandClass,
        _value: ProtocolValue,
    ) -> Option<Vec<Frame>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::capability::{Diagnostic, Outcome};
    use domain::command_class::CommandClass;
    use domain::controller::MockController;
    use domain::event::MockEventSink;
    use domain::node::{Endpoint, NodeId};
    use domain::value::{Command, Item, ItemName, ItemType, Percent, State};
    use mockall::predicate::eq;

    fn node() -> Node {
        Node::new(NodeId::new(6).unwrap(), vec![]).with_endpoint(Endpoint::new(
            EndpointId::new(1),
            vec![CommandClassKind::Battery],
        ))
    }

    fn command_class() -> BatteryCommandClass {
        BatteryCommandClass::new(NodeId::new(6).unwrap(), EndpointId::new(1), 1)
    }

    #[test]
    fn test_refresh_frame_is_encapsulated() {
        let converter = BatteryConverter::new(
            Arc::new(MockController::new()),
            Arc::new(MockEventSink::new()),
        );
        assert_eq!(converter.refresh_interval_secs(), 3600);

        let frame = converter
            .build_refresh_frame(
                &node(),
                &command_class(),
                EndpointId::new(1),
                &BindingArguments::default(),
            )
            .unwrap();
        assert_eq!(frame.payload(), &[0x60, 0x0D, 0x00, 0x01, 0x80, 0x02]);
    }

    #[test]
    fn test_level_report_as_percent() {
        let mut sink = MockEventSink::new();
        sink.expect_publish()
            .with(
                eq(ItemName::new("Battery_Level").unwrap()),
                eq(State::Percent(Percent::new(80).unwrap())),
            )
            .times(1)
            .return_const(());

        let converter = BatteryConverter::new(Arc::new(MockController::new()), Arc::new(sink));
        let mut cc = command_class();
        let events = cc.handle_report(&[0x80, 0x03, 80]).unwrap();

        let item = Item::new(ItemName::new("Battery_Level").unwrap(), ItemType::Dimmer);
        let outcome = converter.on_value_event(&events[0], &item, &BindingArguments::default());
        assert!(matches!(outcome, Outcome::Published(State::Percent(_))));
    }

    #[test]
    fn test_commands_are_dropped() {
        let mut controller = MockController::new();
        controller.expect_send().never();
        let mut sink = MockEventSink::new();
        sink.expect_publish().never();

        let converter = BatteryConverter::new(Arc::new(controller), Arc::new(sink));
        let item = Item::new(ItemName::new("Battery_Level").unwrap(), ItemType::Number);
        let outcome = converter.on_command(
            &item,
            &Command::Decimal(50.0),
            &node(),
            &mut command_class(),
            EndpointId::new(1),
            &BindingArguments::default(),
        );

        assert!(matches!(
            outcome,
            Outcome::Dropped(Diagnostic::NoCommandConverter { .. })
        ));
    }
}
