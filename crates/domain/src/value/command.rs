use serde::{Deserialize, Serialize};

use super::state::{OnOff, Percent, State};

/// Relative step command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IncreaseDecrease {
    Increase,
    Decrease,
}

/// Runtime kind of a domain command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    Decimal,
    Percent,
    OnOff,
    IncreaseDecrease,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Decimal => "DecimalType",
            Self::Percent => "PercentType",
            Self::OnOff => "OnOffType",
            Self::IncreaseDecrease => "IncreaseDecreaseType",
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed command sent by the domain core to an item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Command {
    Decimal(f64),
    Percent(Percent),
    OnOff(OnOff),
    IncreaseDecrease(IncreaseDecrease),
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Decimal(_) => CommandKind::Decimal,
            Self::Percent(_) => CommandKind::Percent,
            Self::OnOff(_) => CommandKind::OnOff,
            Self::IncreaseDecrease(_) => CommandKind::IncreaseDecrease,
        }
    }

    /// The state this command represents, if it is also a valid state value
    pub fn as_state(&self) -> Option<State> {
        match *self {
            Self::Decimal(v) => Some(State::Decimal(v)),
            Self::Percent(p) => Some(State::Percent(p)),
            Self::OnOff(v) => Some(State::OnOff(v)),
            Self::IncreaseDecrease(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_commands_are_states() {
        assert_eq!(
            Command::Decimal(7200.0).as_state(),
            Some(State::Decimal(7200.0))
        );
        assert_eq!(
            Command::OnOff(OnOff::On).as_state(),
            Some(State::OnOff(OnOff::On))
        );
    }

    #[test]
    fn test_step_command_is_not_a_state() {
        assert_eq!(
            Command::IncreaseDecrease(IncreaseDecrease::Increase).as_state(),
            None
        );
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Command::Decimal(1.0).kind().to_string(), "DecimalType");
        assert_eq!(
            Command::IncreaseDecrease(IncreaseDecrease::Decrease).kind(),
            CommandKind::IncreaseDecrease
        );
    }
}
