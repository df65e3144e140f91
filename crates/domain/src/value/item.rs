use crate::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

use super::state::StateKind;

/// Value object representing a domain item name
///
/// Rules:
/// - Must be non-empty
/// - Must contain only alphanumeric and underscore characters
/// - Max length 100 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

impl ItemName {
    /// Create a new ItemName with validation
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(DomainError::InvalidItemName(
                "Item name cannot be empty".to_string(),
            ));
        }

        if name.len() > 100 {
            return Err(DomainError::InvalidItemName(format!(
                "Item name too long: {} chars (max 100)",
                name.len()
            )));
        }

        if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(DomainError::InvalidItemName(format!(
                "Item name {name} must contain only alphanumeric and underscore"
            )));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ItemName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ItemName> for String {
    fn from(name: ItemName) -> Self {
        name.0
    }
}

impl std::fmt::Display for ItemName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declared type of a domain item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Number,
    Dimmer,
    Switch,
    String,
}

impl ItemType {
    /// State kinds this item type accepts, most specific first
    pub fn accepted_states(&self) -> &'static [StateKind] {
        match self {
            Self::Number => &[StateKind::Decimal],
            Self::Dimmer => &[StateKind::Percent, StateKind::OnOff],
            Self::Switch => &[StateKind::OnOff],
            Self::String => &[],
        }
    }

    pub fn accepts(&self, kind: StateKind) -> bool {
        self.accepted_states().contains(&kind)
    }
}

/// Reference to a domain item: routing name plus declared type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub name: ItemName,
    pub item_type: ItemType,
}

impl Item {
    pub fn new(name: ItemName, item_type: ItemType) -> Self {
        Self { name, item_type }
    }
}
