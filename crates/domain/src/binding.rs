use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::command_class::CommandClassKind;
use crate::error::{DomainError, Result};
use crate::node::{EndpointId, NodeId};
use crate::value::Item;

/// Argument key overriding a capability's refresh cadence (seconds)
pub const REFRESH_INTERVAL_KEY: &str = "refresh_interval";

/// Read-only, string-keyed arguments attached to an item binding.
/// Unknown keys are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingArguments(HashMap<String, String>);

impl BindingArguments {
    pub fn new(arguments: HashMap<String, String>) -> Self {
        Self(arguments)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Refresh override in seconds. `Ok(None)` when the key is absent.
    pub fn refresh_interval(&self) -> Result<Option<u32>> {
        match self.get(REFRESH_INTERVAL_KEY) {
            None => Ok(None),
            Some(raw) => raw.trim().parse::<u32>().map(Some).map_err(|_| {
                DomainError::InvalidConfiguration(format!(
                    "{REFRESH_INTERVAL_KEY} must be a non-negative integer, got '{raw}'"
                ))
            }),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for BindingArguments {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Binds a domain item to one command class on a node endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemBinding {
    pub item: Item,
    pub node_id: NodeId,
    #[serde(default)]
    pub endpoint: EndpointId,
    pub command_class: CommandClassKind,
    #[serde(default)]
    pub arguments: BindingArguments,
}

impl ItemBinding {
    pub fn new(
        item: Item,
        node_id: NodeId,
        endpoint: EndpointId,
        command_class: CommandClassKind,
        arguments: BindingArguments,
    ) -> Self {
        Self {
            item,
            node_id,
            endpoint,
            command_class,
            arguments,
        }
    }

    /// Whether this binding addresses the given capability instance
    pub fn targets(&self, node_id: NodeId, endpoint: EndpointId, kind: CommandClassKind) -> bool {
        self.node_id == node_id && self.endpoint == endpoint && self.command_class == kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{ItemName, ItemType};
    use serde_json::json;

    #[test]
    fn test_missing_refresh_interval() {
        let args = BindingArguments::default();
        assert_eq!(args.refresh_interval(), Ok(None));
    }

    #[test]
    fn test_refresh_interval_override() {
        let args: BindingArguments = [("refresh_interval", " 60 "), ("unknown", "x")]
            .into_iter()
            .collect();
        assert_eq!(args.refresh_interval(), Ok(Some(60)));
        assert_eq!(args.get("unknown"), Some("x"));
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_invalid_refresh_interval() {
        let args: BindingArguments = [("refresh_interval", "often")].into_iter().collect();
        assert!(matches!(
            args.refresh_interval(),
            Err(DomainError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_binding_deserialization_defaults() {
        let binding: ItemBinding = serde_json::from_value(json!({
            "item": { "name": "Sensor_Battery", "item_type": "Number" },
            "node_id": 6,
            "command_class": "BATTERY"
        }))
        .unwrap();

        assert_eq!(binding.item.name, ItemName::new("Sensor_Battery").unwrap());
        assert_eq!(binding.item.item_type, ItemType::Number);
        assert!(binding.endpoint.is_root());
        assert!(binding.arguments.is_empty());
        assert!(binding.targets(
            NodeId::new(6).unwrap(),
            EndpointId::ROOT,
            CommandClassKind::Battery
        ));
    }
}
