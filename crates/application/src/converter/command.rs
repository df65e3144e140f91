//! Command converters: domain command -> protocol value.

use domain::value::{Command, CommandKind, OnOff, ProtocolKind, ProtocolValue};

/// Level the protocol uses for "on"
const ON_LEVEL: i64 = 0xFF;

/// Converts one domain command kind into one protocol value kind.
///
/// `convert` is total over `command_kind()`; it only returns `None` when
/// handed a command of another kind.
pub trait CommandConverter: Send + Sync {
    fn command_kind(&self) -> CommandKind;

    fn protocol_kind(&self) -> ProtocolKind;

    fn convert(&self, command: &Command) -> Option<ProtocolValue>;
}

/// Decimal command -> decimal value, unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct DecimalCommandConverter;

impl CommandConverter for DecimalCommandConverter {
    fn command_kind(&self) -> CommandKind {
        CommandKind::Decimal
    }

    fn protocol_kind(&self) -> ProtocolKind {
        ProtocolKind::Decimal
    }

    fn convert(&self, command: &Command) -> Option<ProtocolValue> {
        match *command {
            Command::Decimal(v) => Some(ProtocolValue::Decimal(v)),
            _ => None,
        }
    }
}

/// Decimal command -> integer value, rounded to the nearest integer
#[derive(Debug, Default, Clone, Copy)]
pub struct IntegerCommandConverter;

impl CommandConverter for IntegerCommandConverter {
    fn command_kind(&self) -> CommandKind {
        CommandKind::Decimal
    }

    fn protocol_kind(&self) -> ProtocolKind {
        ProtocolKind::Integer
    }

    fn convert(&self, command: &Command) -> Option<ProtocolValue> {
        match *command {
            Command::Decimal(v) => Some(ProtocolValue::Integer(v.round() as i64)),
            _ => None,
        }
    }
}

/// On/off command -> 0x00 / 0xFF level
#[derive(Debug, Default, Clone, Copy)]
pub struct OnOffCommandConverter;

impl CommandConverter for OnOffCommandConverter {
    fn command_kind(&self) -> CommandKind {
        CommandKind::OnOff
    }

    fn protocol_kind(&self) -> ProtocolKind {
        ProtocolKind::Integer
    }

    fn convert(&self, command: &Command) -> Option<ProtocolValue> {
        match *command {
            Command::OnOff(OnOff::On) => Some(ProtocolValue::Integer(ON_LEVEL)),
            Command::OnOff(OnOff::Off) => Some(ProtocolValue::Integer(0)),
            _ => None,
        }
    }
}
