//! Translation between command class values and item states/commands.
//!
//! Value converters ([`state`], [`command`]) each handle one pairing of a
//! protocol value kind with a domain kind. A [`ConverterRegistry`] holds an
//! ordered set of them per capability, and a [`CapabilityConverter`] uses that
//! registry to decode inbound events and encode outbound commands.

pub mod battery;
pub mod capability;
pub mod command;
pub mod handler;
pub mod registry;
pub mod state;
pub mod switch_binary;
pub mod wake_up;

pub use battery::BatteryConverter;
pub use capability::{CapabilityConverter, ConverterContext, Diagnostic, Outcome};
pub use command::{
    CommandConverter, DecimalCommandConverter, IntegerCommandConverter, OnOffCommandConverter,
};
pub use handler::{Converter, ConverterHandler};
pub use registry::ConverterRegistry;
pub use state::{
    DecimalDecimalConverter, IntegerDecimalConverter, IntegerOnOffConverter,
    IntegerPercentConverter, StateConverter,
};
pub use switch_binary::SwitchBinaryConverter;
pub use wake_up::WakeUpConverter;
