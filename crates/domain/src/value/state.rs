use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};

/// Binary on/off value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OnOff {
    On,
    Off,
}

impl OnOff {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }
}

/// Percentage in the range 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Percent(u8);

impl Percent {
    pub const ZERO: Percent = Percent(0);
    pub const HUNDRED: Percent = Percent(100);

    pub fn new(value: u8) -> Result<Self> {
        if value > 100 {
            return Err(DomainError::InvalidValue(format!(
                "Percent out of range: {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Clamps any integer into the percent range
    pub fn saturating(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Percent {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Percent> for u8 {
    fn from(p: Percent) -> Self {
        p.0
    }
}

/// Kind of a domain state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    Decimal,
    Percent,
    OnOff,
}

/// Typed value held by a domain item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum State {
    Decimal(f64),
    Percent(Percent),
    OnOff(OnOff),
}

impl State {
    pub fn kind(&self) -> StateKind {
        match self {
            Self::Decimal(_) => StateKind::Decimal,
            Self::Percent(_) => StateKind::Percent,
            Self::OnOff(_) => StateKind::OnOff,
        }
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decimal(v) => write!(f, "{}", v),
            Self::Percent(p) => write!(f, "{}", p.value()),
            Self::OnOff(v) => write!(f, "{}", v.as_str()),
        }
    }
}
