mod command;
mod item;
mod protocol;
mod state;

pub use command::{Command, CommandKind, IncreaseDecrease};
pub use item::{Item, ItemName, ItemType};
pub use protocol::{ProtocolKind, ProtocolValue};
pub use state::{OnOff, Percent, State, StateKind};
