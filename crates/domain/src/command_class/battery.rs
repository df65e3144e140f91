use super::{CommandClass, CommandClassKind, split_report};
use crate::error::{DomainError, Result};
use crate::event::ValueEvent;
use crate::frame::{Frame, FramePriority};
use crate::node::{EndpointId, NodeId};
use crate::value::ProtocolValue;

const BATTERY_GET: u8 = 0x02;
const BATTERY_REPORT: u8 = 0x03;

/// Level byte devices send instead of a percentage when the battery is low
const LOW_BATTERY_WARNING: u8 = 0xFF;

/// Battery command class (read-only)
#[derive(Debug, Clone, PartialEq)]
pub struct BatteryCommandClass {
    node_id: NodeId,
    endpoint: EndpointId,
    version: u8,
    level: Option<u8>,
    low_battery: bool,
}

impl BatteryCommandClass {
    pub fn new(node_id: NodeId, endpoint: EndpointId, version: u8) -> Self {
        Self {
            node_id,
            endpoint,
            version,
            level: None,
            low_battery: false,
        }
    }

    pub fn level(&self) -> Option<u8> {
        self.level
    }

    pub fn is_low(&self) -> bool {
        self.low_battery
    }

    pub fn get_value_message(&self) -> Frame {
        Frame::send_data(
            self.node_id,
            FramePriority::Get,
            vec![CommandClassKind::Battery.key(), BATTERY_GET],
        )
        .with_expected_reply(CommandClassKind::Battery, BATTERY_REPORT)
    }
}

impl CommandClass for BatteryCommandClass {
    fn kind(&self) -> CommandClassKind {
        CommandClassKind::Battery
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
        let (command, params) = split_report(CommandClassKind::Battery, payload)?;
        if command != BATTERY_REPORT {
            return Err(DomainError::UnsupportedCommand {
                kind: CommandClassKind::Battery,
                command,
            });
        }

        let raw = *params.first().ok_or_else(|| DomainError::MalformedReport {
            kind: CommandClassKind::Battery,
            reason: "missing battery level".to_string(),
        })?;

        self.low_battery = raw == LOW_BATTERY_WARNING;
        let level = if self.low_battery { 0 } else { raw.min(100) };
        self.level = Some(level);

        Ok(vec![ValueEvent::new(
            self.node_id,
            self.endpoint,
            CommandClassKind::Battery,
            ProtocolValue::Integer(i64::from(level)),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn battery() -> BatteryCommandClass {
        BatteryCommandClass::new(NodeId::new(8).unwrap(), EndpointId::ROOT, 1)
    }

    #[test]
    fn test_get_value_message() {
        let frame = battery().get_value_message();
        assert_eq!(frame.payload(), &[0x80, 0x02]);
        assert_eq!(frame.priority(), FramePriority::Get);
    }

    #[test]
    fn test_report_level() {
        let mut cc = battery();
        let events = cc.handle_report(&[0x80, 0x03, 0x4B]).unwrap();
        assert_eq!(events[0].value, ProtocolValue::Integer(75));
        assert_eq!(cc.level(), Some(75));
        assert!(!cc.is_low());
    }

    #[test]
    fn test_low_battery_warning_reports_zero() {
        let mut cc = battery();
        let events = cc.handle_report(&[0x80, 0x03, 0xFF]).unwrap();
        assert_eq!(events[0].value, ProtocolValue::Integer(0));
        assert!(cc.is_low());
    }

    #[test]
    fn test_missing_level_rejected() {
        let mut cc = battery();
        assert!(cc.handle_report(&[0x80, 0x03]).is_err());
        assert!(cc.level().is_none());
    }
}
