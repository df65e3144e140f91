//! State converters: protocol value -> domain state.

use domain::value::{OnOff, Percent, ProtocolKind, ProtocolValue, State, StateKind};

/// Converts one protocol value kind into one domain state kind.
///
/// `convert` is total over `protocol_kind()`; it only returns `None` when
/// handed a value of another kind.
pub trait StateConverter: Send + Sync {
    fn protocol_kind(&self) -> ProtocolKind;

    fn state_kind(&self) -> StateKind;

    fn convert(&self, value: &ProtocolValue) -> Option<State>;
}

/// Integer -> decimal state
#[derive(Debug, Default, Clone, Copy)]
pub struct IntegerDecimalConverter;

impl StateConverter for IntegerDecimalConverter {
    fn protocol_kind(&self) -> ProtocolKind {
        ProtocolKind::Integer
    }

    fn state_kind(&self) -> StateKind {
        StateKind::Decimal
    }

    fn convert(&self, value: &ProtocolValue) -> Option<State> {
        match *value {
            ProtocolValue::Integer(v) => Some(State::Decimal(v as f64)),
            _ => None,
        }
    }
}

/// Integer -> percent state, saturating at 0 and 100
#[derive(Debug, Default, Clone, Copy)]
pub struct IntegerPercentConverter;

impl StateConverter for IntegerPercentConverter {
    fn protocol_kind(&self) -> ProtocolKind {
        ProtocolKind::Integer
    }

    fn state_kind(&self) -> StateKind {
        StateKind::Percent
    }

    fn convert(&self, value: &ProtocolValue) -> Option<State> {
        match *value {
            ProtocolValue::Integer(v) => Some(State::Percent(Percent::saturating(v))),
            _ => None,
        }
    }
}

/// Decimal -> decimal state
#[derive(Debug, Default, Clone, Copy)]
pub struct DecimalDecimalConverter;

impl StateConverter for DecimalDecimalConverter {
    fn protocol_kind(&self) -> ProtocolKind {
        ProtocolKind::Decimal
    }

    fn state_kind(&self) -> StateKind {
        StateKind::Decimal
    }

    fn convert(&self, value: &ProtocolValue) -> Option<State> {
        match *value {
            ProtocolValue::Decimal(v) => Some(State::Decimal(v)),
            _ => None,
        }
    }
}

/// Integer -> on/off state; any non-zero level is on
#[derive(Debug, Default, Clone, Copy)]
pub struct IntegerOnOffConverter;

impl StateConverter for IntegerOnOffConverter {
    fn protocol_kind(&self) -> ProtocolKind {
        ProtocolKind::Integer
    }

    fn state_kind(&self) -> StateKind {
        StateKind::OnOff
    }

    fn convert(&self, value: &ProtocolValue) -> Option<State> {
        match *value {
            ProtocolValue::Integer(0) => Some(State::OnOff(OnOff::Off)),
            ProtocolValue::Integer(_) => Some(State::OnOff(OnOff::On)),
            _ => None,
        }
    }
}
