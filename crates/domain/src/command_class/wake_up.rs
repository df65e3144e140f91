use super::{CommandClass, CommandClassKind, split_report};
use crate::error::{DomainError, Result};
use crate::event::ValueEvent;
use crate::frame::{Frame, FramePriority};
use crate::node::{EndpointId, NodeId};
use crate::value::ProtocolValue;

const WAKE_UP_INTERVAL_SET: u8 = 0x04;
const WAKE_UP_INTERVAL_GET: u8 = 0x05;
const WAKE_UP_INTERVAL_REPORT: u8 = 0x06;
const WAKE_UP_NOTIFICATION: u8 = 0x07;
const WAKE_UP_NO_MORE_INFORMATION: u8 = 0x08;
const WAKE_UP_INTERVAL_CAPABILITIES_GET: u8 = 0x09;
const WAKE_UP_INTERVAL_CAPABILITIES_REPORT: u8 = 0x0A;

/// Intervals are carried as 24-bit values
pub const MAX_INTERVAL: u32 = 0x00FF_FFFF;

/// Progress of a wake-up interval negotiation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WakeUpNegotiation {
    /// No set request outstanding
    #[default]
    Idle,
    /// A set frame was produced and its read-back has not been requested yet
    IntervalRequested,
}

/// Interval range a device advertises (version 2 and later)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalCapabilities {
    pub min: u32,
    pub max: u32,
    pub default: u32,
    pub step: u32,
}

impl IntervalCapabilities {
    pub fn allows(&self, interval: u32) -> bool {
        (self.min..=self.max).contains(&interval)
    }
}

/// Wake-up command class: governs the duty cycle of battery devices that are
/// only reachable while awake.
#[derive(Debug, Clone, PartialEq)]
pub struct WakeUpCommandClass {
    node_id: NodeId,
    endpoint: EndpointId,
    version: u8,
    interval: Option<u32>,
    target_node: Option<NodeId>,
    capabilities: Option<IntervalCapabilities>,
    negotiation: WakeUpNegotiation,
    pending_interval: Option<u32>,
    read_back_requested: bool,
    awake: bool,
}

impl WakeUpCommandClass {
    pub fn new(node_id: NodeId, endpoint: EndpointId, version: u8) -> Self {
        Self {
            node_id,
            endpoint,
            version,
            interval: None,
            target_node: None,
            capabilities: None,
            negotiation: WakeUpNegotiation::Idle,
            pending_interval: None,
            read_back_requested: false,
            awake: false,
        }
    }

    /// Seeds the last known device interval
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Last interval confirmed by the device
    pub fn interval(&self) -> Option<u32> {
        self.interval
    }

    /// Interval requested by the last set, until a report confirms it
    pub fn pending_interval(&self) -> Option<u32> {
        self.pending_interval
    }

    pub fn negotiation(&self) -> WakeUpNegotiation {
        self.negotiation
    }

    pub fn read_back_requested(&self) -> bool {
        self.read_back_requested
    }

    pub fn capabilities(&self) -> Option<IntervalCapabilities> {
        self.capabilities
    }

    /// Node the device reports its wake-up notifications to
    pub fn target_node(&self) -> Option<NodeId> {
        self.target_node
    }

    pub fn is_awake(&self) -> bool {
        self.awake
    }

    /// Builds an interval set frame naming `target` as the notification receiver.
    ///
    /// Returns `None` when the interval does not fit the protocol field or lies
    /// outside the range the device advertised.
    pub fn set_interval(&mut self, interval: u32, target: NodeId) -> Option<Frame> {
        if interval > MAX_INTERVAL {
            return None;
        }
        if let Some(caps) = self.capabilities {
            if !caps.allows(interval) {
                return None;
            }
        }

        let [_, high, mid, low] = interval.to_be_bytes();
        let frame = Frame::send_data(
            self.node_id,
            FramePriority::Config,
            vec![
                CommandClassKind::WakeUp.key(),
                WAKE_UP_INTERVAL_SET,
                high,
                mid,
                low,
                target.value(),
            ],
        );

        self.negotiation = WakeUpNegotiation::IntervalRequested;
        self.pending_interval = Some(interval);
        Some(frame)
    }

    /// Builds an interval read-back frame. Completes any outstanding set.
    pub fn request_interval(&mut self) -> Frame {
        self.negotiation = WakeUpNegotiation::Idle;
        self.read_back_requested = true;
        Frame::send_data(
            self.node_id,
            FramePriority::Get,
            vec![CommandClassKind::WakeUp.key(), WAKE_UP_INTERVAL_GET],
        )
        .with_expected_reply(CommandClassKind::WakeUp, WAKE_UP_INTERVAL_REPORT)
    }

    /// Interval capabilities request; only defined from version 2
    pub fn capabilities_get(&self) -> Option<Frame> {
        if self.version < 2 {
            return None;
        }
        Some(
            Frame::send_data(
                self.node_id,
                FramePriority::Get,
                vec![
                    CommandClassKind::WakeUp.key(),
                    WAKE_UP_INTERVAL_CAPABILITIES_GET,
                ],
            )
            .with_expected_reply(CommandClassKind::WakeUp, WAKE_UP_INTERVAL_CAPABILITIES_REPORT),
        )
    }

    /// Tells the device it may go back to sleep
    pub fn no_more_information(&mut self) -> Frame {
        self.awake = false;
        Frame::send_data(
            self.node_id,
            FramePriority::High,
            vec![CommandClassKind::WakeUp.key(), WAKE_UP_NO_MORE_INFORMATION],
        )
    }

    fn event(&self, value: ProtocolValue) -> ValueEvent {
        ValueEvent::new(self.node_id, self.endpoint, CommandClassKind::WakeUp, value)
    }

    fn malformed(reason: &str) -> DomainError {
        DomainError::MalformedReport {
            kind: CommandClassKind::WakeUp,
            reason: reason.to_string(),
        }
    }
}

fn be24(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]])
}

impl CommandClass for WakeUpCommandClass {
    fn kind(&self) -> CommandClassKind {
        CommandClassKind::WakeUp
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
        let (command, params) = split_report(CommandClassKind::WakeUp, payload)?;
        match command {
            WAKE_UP_INTERVAL_REPORT => {
                if params.len() < 3 {
                    return Err(Self::malformed("interval report too short"));
                }
                let interval = be24(&params[..3]);
                // Target node byte is optional in older firmware
                self.target_node = params.get(3).and_then(|id| NodeId::new(*id).ok());
                self.interval = Some(interval);
                self.pending_interval = None;
                self.read_back_requested = false;
                Ok(vec![self.event(ProtocolValue::Integer(i64::from(interval)))])
            }
            WAKE_UP_INTERVAL_CAPABILITIES_REPORT => {
                if params.len() < 12 {
                    return Err(Self::malformed("capabilities report too short"));
                }
                self.capabilities = Some(IntervalCapabilities {
                    min: be24(&params[0..3]),
                    max: be24(&params[3..6]),
                    default: be24(&params[6..9]),
                    step: be24(&params[9..12]),
                });
                Ok(Vec::new())
            }
            WAKE_UP_NOTIFICATION => {
                self.awake = true;
                Ok(Vec::new())
            }
            other => Err(DomainError::UnsupportedCommand {
                kind: CommandClassKind::WakeUp,
                command: other,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wake_up() -> WakeUpCommandClass {
        WakeUpCommandClass::new(NodeId::new(5).unwrap(), EndpointId::ROOT, 2).with_interval(3600)
    }

    fn controller() -> NodeId {
        NodeId::new(1).unwrap()
    }

    #[test]
    fn test_set_interval_encodes_24_bit_big_endian() {
        let mut cc = wake_up();
        let frame = cc.set_interval(7200, controller()).unwrap();

        assert_eq!(frame.payload(), &[0x84, 0x04, 0x00, 0x1C, 0x20, 0x01]);
        assert_eq!(frame.priority(), FramePriority::Config);
        assert_eq!(frame.node_id().value(), 5);
    }

    #[test]
    fn test_set_then_read_back_negotiation() {
        let mut cc = wake_up();
        assert_eq!(cc.negotiation(), WakeUpNegotiation::Idle);

        cc.set_interval(7200, controller()).unwrap();
        assert_eq!(cc.negotiation(), WakeUpNegotiation::IntervalRequested);
        assert_eq!(cc.pending_interval(), Some(7200));
        assert_eq!(cc.interval(), Some(3600));

        let read_back = cc.request_interval();
        assert_eq!(read_back.payload(), &[0x84, 0x05]);
        assert_eq!(cc.negotiation(), WakeUpNegotiation::Idle);
        assert!(cc.read_back_requested());
    }

    #[test]
    fn test_interval_out_of_protocol_range() {
        let mut cc = wake_up();
        assert!(cc.set_interval(MAX_INTERVAL + 1, controller()).is_none());
        assert_eq!(cc.negotiation(), WakeUpNegotiation::Idle);
        assert_eq!(cc.pending_interval(), None);
    }

    #[test]
    fn test_interval_outside_advertised_capabilities() {
        let mut cc = wake_up();
        cc.handle_report(&[
            0x84, 0x0A, 0x00, 0x01, 0x2C, 0x01, 0x51, 0x80, 0x00, 0x0E, 0x10, 0x00, 0x00, 0x3C,
        ])
        .unwrap();

        let caps = cc.capabilities().unwrap();
        assert_eq!(caps.min, 300);
        assert_eq!(caps.max, 86400);
        assert_eq!(caps.default, 3600);
        assert_eq!(caps.step, 60);

        assert!(cc.set_interval(60, controller()).is_none());
        assert!(cc.set_interval(7200, controller()).is_some());
    }

    #[test]
    fn test_interval_report_confirms_value() {
        let mut cc = wake_up();
        cc.set_interval(7200, controller()).unwrap();
        cc.request_interval();

        let events = cc
            .handle_report(&[0x84, 0x06, 0x00, 0x1C, 0x20, 0x01])
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].value, ProtocolValue::Integer(7200));
        assert_eq!(events[0].kind, CommandClassKind::WakeUp);
        assert_eq!(cc.interval(), Some(7200));
        assert_eq!(cc.pending_interval(), None);
        assert!(!cc.read_back_requested());
        assert_eq!(cc.target_node(), Some(controller()));
    }

    #[test]
    fn test_notification_marks_awake() {
        let mut cc = wake_up();
        assert!(cc.handle_report(&[0x84, 0x07]).unwrap().is_empty());
        assert!(cc.is_awake());

        let frame = cc.no_more_information();
        assert_eq!(frame.payload(), &[0x84, 0x08]);
        assert!(!cc.is_awake());
    }

    #[test]
    fn test_capabilities_get_requires_v2() {
        let v1 = WakeUpCommandClass::new(NodeId::new(5).unwrap(), EndpointId::ROOT, 1);
        assert!(v1.capabilities_get().is_none());
        assert_eq!(wake_up().capabilities_get().unwrap().payload(), &[0x84, 0x09]);
    }

    #[test]
    fn test_short_report_rejected() {
        let mut cc = wake_up();
        assert!(matches!(
            cc.handle_report(&[0x84, 0x06, 0x00]),
            Err(DomainError::MalformedReport { .. })
        ));
    }

    #[test]
    fn test_unknown_command_rejected() {
        let mut cc = wake_up();
        assert_eq!(
            cc.handle_report(&[0x84, 0x55]),
            Err(DomainError::UnsupportedCommand {
                kind: CommandClassKind::WakeUp,
                command: 0x55
            })
        );
    }
}
