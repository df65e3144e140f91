use serde::{Deserialize, Serialize};

/// Kind of a protocol-native value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolKind {
    Integer,
    Decimal,
}

/// Value as carried by a command class report or set command
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum ProtocolValue {
    Integer(i64),
    Decimal(f64),
}

impl ProtocolValue {
    pub fn kind(&self) -> ProtocolKind {
        match self {
            Self::Integer(_) => ProtocolKind::Integer,
            Self::Decimal(_) => ProtocolKind::Decimal,
        }
    }

    /// Integer representation, if the value has no fractional part
    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            Self::Integer(v) => Some(v),
            Self::Decimal(v) => {
                if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64
                {
                    Some(v as i64)
                } else {
                    None
                }
            }
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Integer(v) => v as f64,
            Self::Decimal(v) => v,
        }
    }
}

impl std::fmt::Display for ProtocolValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{}", v),
            Self::Decimal(v) => write!(f, "{}", v),
        }
    }
}
