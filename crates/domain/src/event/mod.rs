use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod publisher;
mod sink;
mod value_event;

pub use publisher::EventPublisher;
pub use sink::EventSink;
#[cfg(any(test, feature = "mocks"))]
pub use sink::MockEventSink;
pub use value_event::ValueEvent;

use crate::value::{ItemName, State};

/// Events the bridge publishes towards the home-automation core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomainEvent {
    /// An item received a new state, either decoded from the device or
    /// echoed from a command
    ItemStateUpdated {
        item: ItemName,
        state: State,
        timestamp: DateTime<Utc>,
    },

    /// Bridge heartbeat
    BridgeHeartbeat {
        bridge_id: String,
        uptime_secs: u64,
        active_bindings: usize,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// Create an ItemStateUpdated event
    pub fn item_state_updated(item: ItemName, state: State) -> Self {
        Self::ItemStateUpdated {
            item,
            state,
            timestamp: Utc::now(),
        }
    }

    /// Create a BridgeHeartbeat event
    pub fn bridge_heartbeat(
        bridge_id: impl Into<String>,
        uptime_secs: u64,
        active_bindings: usize,
    ) -> Self {
        Self::BridgeHeartbeat {
            bridge_id: bridge_id.into(),
            uptime_secs,
            active_bindings,
            timestamp: Utc::now(),
        }
    }

    /// Get the timestamp of this event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::ItemStateUpdated { timestamp, .. } => *timestamp,
            Self::BridgeHeartbeat { timestamp, .. } => *timestamp,
        }
    }

    /// Get the event type as string
    pub fn event_type(&self) -> &str {
        match self {
            Self::ItemStateUpdated { .. } => "ItemStateUpdated",
            Self::BridgeHeartbeat { .. } => "BridgeHeartbeat",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::OnOff;

    #[test]
    fn test_item_state_updated_event() {
        let item = ItemName::new("Lamp_Kitchen").unwrap();
        let event = DomainEvent::item_state_updated(item.clone(), State::OnOff(OnOff::On));

        assert_eq!(event.event_type(), "ItemStateUpdated");
        match event {
            DomainEvent::ItemStateUpdated {
                item: name, state, ..
            } => {
                assert_eq!(name, item);
                assert_eq!(state, State::OnOff(OnOff::On));
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn test_bridge_heartbeat_event() {
        let event = DomainEvent::bridge_heartbeat("bridge-1", 300, 4);

        assert_eq!(event.event_type(), "BridgeHeartbeat");
        match event {
            DomainEvent::BridgeHeartbeat {
                bridge_id,
                uptime_secs,
                active_bindings,
                ..
            } => {
                assert_eq!(bridge_id, "bridge-1");
                assert_eq!(uptime_secs, 300);
                assert_eq!(active_bindings, 4);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn test_event_serialization() {
        let event = DomainEvent::item_state_updated(
            ItemName::new("WakeUp_Interval").unwrap(),
            State::Decimal(7200.0),
        );

        let json_str = serde_json::to_string(&event).unwrap();
        let deserialized: DomainEvent = serde_json::from_str(&json_str).unwrap();

        assert_eq!(deserialized.event_type(), "ItemStateUpdated");
    }
}
