//! Command classes: versioned protocol capabilities attached to a node endpoint.
//!
//! Each command class encodes its own requests into [`Frame`]s and decodes the
//! reports it receives into [`ValueEvent`]s, holding whatever sub-state the
//! capability needs between the two.

mod battery;
pub mod multi_channel;
mod switch_binary;
mod wake_up;

pub use battery::BatteryCommandClass;
pub use switch_binary::SwitchBinaryCommandClass;
pub use wake_up::{IntervalCapabilities, WakeUpCommandClass, WakeUpNegotiation};

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::event::ValueEvent;
use crate::frame::Frame;
use crate::node::{EndpointId, NodeId};

/// Command class identifiers known to the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandClassKind {
    SwitchBinary,
    MultiChannel,
    Battery,
    WakeUp,
}

impl CommandClassKind {
    pub fn key(&self) -> u8 {
        match self {
            Self::SwitchBinary => 0x25,
            Self::MultiChannel => 0x60,
            Self::Battery => 0x80,
            Self::WakeUp => 0x84,
        }
    }

    pub fn from_key(key: u8) -> Option<Self> {
        match key {
            0x25 => Some(Self::SwitchBinary),
            0x60 => Some(Self::MultiChannel),
            0x80 => Some(Self::Battery),
            0x84 => Some(Self::WakeUp),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SwitchBinary => "SWITCH_BINARY",
            Self::MultiChannel => "MULTI_CHANNEL",
            Self::Battery => "BATTERY",
            Self::WakeUp => "WAKE_UP",
        }
    }
}

impl std::fmt::Display for CommandClassKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Behaviour shared by every command class instance
pub trait CommandClass: Send + Sync {
    fn kind(&self) -> CommandClassKind;

    fn version(&self) -> u8;

    fn node_id(&self) -> NodeId;

    fn endpoint(&self) -> EndpointId;

    /// Decodes an application command (`[class, command, params...]`) received
    /// from the node, updating internal state.
    fn handle_report(&mut self, payload: &[u8]) -> Result<Vec<ValueEvent>>;
}

/// A command class instance bound to one (node, endpoint, kind)
#[derive(Debug, Clone, PartialEq)]
pub enum CommandClassInstance {
    WakeUp(WakeUpCommandClass),
    Battery(BatteryCommandClass),
    SwitchBinary(SwitchBinaryCommandClass),
}

impl CommandClassInstance {
    /// Creates a fresh instance of `kind` for the given address.
    pub fn new(
        kind: CommandClassKind,
        node_id: NodeId,
        endpoint: EndpointId,
        version: u8,
    ) -> Result<Self> {
        match kind {
            CommandClassKind::WakeUp => Ok(Self::WakeUp(WakeUpCommandClass::new(
                node_id, endpoint, version,
            ))),
            CommandClassKind::Battery => Ok(Self::Battery(BatteryCommandClass::new(
                node_id, endpoint, version,
            ))),
            CommandClassKind::SwitchBinary => Ok(Self::SwitchBinary(
                SwitchBinaryCommandClass::new(node_id, endpoint, version),
            )),
            CommandClassKind::MultiChannel => {
                Err(DomainError::UnsupportedCommandClass(kind.key()))
            }
        }
    }

    fn inner(&self) -> &dyn CommandClass {
        match self {
            Self::WakeUp(cc) => cc,
            Self::Battery(cc) => cc,
            Self::SwitchBinary(cc) => cc,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn CommandClass {
        match self {
            Self::WakeUp(cc) => cc,
            Self::Battery(cc) => cc,
            Self::SwitchBinary(cc) => cc,
        }
    }
}

impl CommandClass for CommandClassInstance {
    fn kind(&self) -> CommandClassKind {
        self.inner().kind()
    }

    fn version(&self) -> u8 {
        self.inner().version()
    }

    fn node_id(&self) -> NodeId {
        self.inner().node_id()
    }

    fn endpoint(&self) -> EndpointId {
        self.inner().endpoint()
    }

    fn handle_report(&mut self, payload: &[u8]) -> Result<Vec<ValueEvent>> {
        self.inner_mut().handle_report(payload)
    }
}

/// Splits a report payload into its command byte and parameters,
/// checking the class byte matches `kind`.
pub(crate) fn split_report(kind: CommandClassKind, payload: &[u8]) -> Result<(u8, &[u8])> {
    match payload {
        [class, command, params @ ..] if *class == kind.key() => Ok((*command, params)),
        [class, ..] if *class != kind.key() => Err(DomainError::MalformedReport {
            kind,
            reason: format!("unexpected command class 0x{class:02X}"),
        }),
        _ => Err(DomainError::MalformedReport {
            kind,
            reason: "payload too short".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        for kind in [
            CommandClassKind::SwitchBinary,
            CommandClassKind::MultiChannel,
            CommandClassKind::Battery,
            CommandClassKind::WakeUp,
        ] {
            assert_eq!(CommandClassKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(CommandClassKind::from_key(0x20), None);
    }

    #[test]
    fn test_label_and_serde_name_match() {
        let json = serde_json::to_string(&CommandClassKind::WakeUp).unwrap();
        assert_eq!(json, "\"WAKE_UP\"");
        assert_eq!(CommandClassKind::WakeUp.to_string(), "WAKE_UP");
    }

    #[test]
    fn test_instance_for_kind() {
        let node = NodeId::new(9).unwrap();
        let cc = CommandClassInstance::new(CommandClassKind::Battery, node, EndpointId::ROOT, 1)
            .unwrap();
        assert_eq!(cc.kind(), CommandClassKind::Battery);
        assert_eq!(cc.node_id(), node);
        assert_eq!(cc.version(), 1);

        assert_eq!(
            CommandClassInstance::new(CommandClassKind::MultiChannel, node, EndpointId::ROOT, 2),
            Err(DomainError::UnsupportedCommandClass(0x60))
        );
    }

    #[test]
    fn test_split_report() {
        let (command, params) = split_report(CommandClassKind::Battery, &[0x80, 0x03, 0x55]).unwrap();
        assert_eq!(command, 0x03);
        assert_eq!(params, &[0x55]);

        assert!(split_report(CommandClassKind::Battery, &[0x84, 0x03]).is_err());
        assert!(split_report(CommandClassKind::Battery, &[0x80]).is_err());
    }
}
