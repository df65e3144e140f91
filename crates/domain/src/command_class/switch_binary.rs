use super::{CommandClass, CommandClassKind, split_report};
use crate::error::{DomainError, Result};
use crate::event::ValueEvent;
use crate::frame::{Frame, FramePriority};
use crate::node::{EndpointId, NodeId};
use crate::value::ProtocolValue;

const SWITCH_BINARY_SET: u8 = 0x01;
const SWITCH_BINARY_GET: u8 = 0x02;
const SWITCH_BINARY_REPORT: u8 = 0x03;

/// Binary switch command class
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchBinaryCommandClass {
    node_id: NodeId,
    endpoint: EndpointId,
    version: u8,
    level: Option<u8>,
}

impl SwitchBinaryCommandClass {
    pub fn new(node_id: NodeId, endpoint: EndpointId, version: u8) -> Self {
        Self {
            node_id,
            endpoint,
            version,
            level: None,
        }
    }

    pub fn level(&self) -> Option<u8> {
        self.level
    }

    /// Legal levels are 0x00 (off), 0x01..=0x63 and 0xFF (on)
    pub fn set_value_message(&self, level: i64) -> Option<Frame> {
        let level = u8::try_from(level).ok()?;
        if level > 0x63 && level != 0xFF {
            return None;
        }
        Some(Frame::send_data(
            self.node_id,
            FramePriority::Set,
            vec![CommandClassKind::SwitchBinary.key(), SWITCH_BINARY_SET, level],
        ))
    }

    pub fn get_value_message(&self) -> Frame {
        Frame::send_data(
            self.node_id,
            FramePriority::Get,
            vec![CommandClassKind::SwitchBinary.key(), SWITCH_BINARY_GET],
        )
        .with_expected_reply(CommandClassKind::SwitchBinary, SWITCH_BINARY_REPORT)
    }
}

impl CommandClass for SwitchBinaryCommandClass {
    fn kind(&self) -> CommandClassKind {
        CommandClassKind::SwitchBinary
    }

    fn version(&self) -> u8 {
        self.version
    }

    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn endpoint(&self) -> EndpointId {
        self.endpoint
    }

    fn handle_report(&mut self, payload: &[u8]) -> Result<Vec<ValueEvent>> {
        let (command, params) = split_report(CommandClassKind::SwitchBinary, payload)?;
        if command != SWITCH_BINARY_REPORT {
            return Err(DomainError::UnsupportedCommand {
                kind: CommandClassKind::SwitchBinary,
                command,
            });
        }

        let level = *params.first().ok_or_else(|| DomainError::MalformedReport {
            kind: CommandClassKind::SwitchBinary,
            reason: "missing switch value".to_string(),
        })?;
        self.level = Some(level);

        Ok(vec![ValueEvent::new(
            self.node_id,
            self.endpoint,
            CommandClassKind::SwitchBinary,
            ProtocolValue::Integer(i64::from(level)),
        )])
    }
}
