use domain::value::{CommandKind, Item, ProtocolKind};

use super::command::CommandConverter;
use super::state::StateConverter;

/// Ordered set of value converters available to one capability converter.
///
/// Lookups scan in registration order and return the first match, so the
/// order converters are added in decides which domain representation wins
/// when several share a protocol kind. Populated once, read-only afterwards.
#[derive(Default)]
pub struct ConverterRegistry {
    state_converters: Vec<Box<dyn StateConverter>>,
    command_converters: Vec<Box<dyn CommandConverter>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(mut self, converter: impl StateConverter + 'static) -> Self {
        self.state_converters.push(Box::new(converter));
        self
    }

    pub fn with_command(mut self, converter: impl CommandConverter + 'static) -> Self {
        self.command_converters.push(Box::new(converter));
        self
    }

    /// First state converter for `kind` whose state the item accepts
    pub fn lookup_state(&self, item: &Item, kind: ProtocolKind) -> Option<&dyn StateConverter> {
        self.state_converters
            .iter()
            .find(|c| c.protocol_kind() == kind && item.item_type.accepts(c.state_kind()))
            .map(|c| c.as_ref())
    }

    /// First command converter for `kind`
    pub fn lookup_command(&self, kind: CommandKind) -> Option<&dyn CommandConverter> {
        self.command_converters
            .iter()
            .find(|c| c.command_kind() == kind)
            .map(|c| c.as_ref())
    }

    pub fn state_converters(&self) -> impl Iterator<Item = &dyn StateConverter> {
        self.state_converters.iter().map(|c| c.as_ref())
    }

    pub fn command_converters(&self) -> impl Iterator<Item = &dyn CommandConverter> {
        self.command_converters.iter().map(|c| c.as_ref())
    }
}

#[cfg(test)]
pub(crate) mod round_trip {
    use domain::value::{Command, CommandKind, OnOff, Percent, State};

    use super::ConverterRegistry;

    /// Representative commands for each command kind that is also a state
    pub(crate) fn samples(kind: CommandKind) -> Vec<Command> {
        match kind {
            CommandKind::Decimal => vec![Command::Decimal(7200.0), Command::Decimal(21.5)],
            CommandKind::OnOff => vec![Command::OnOff(OnOff::On), Command::OnOff(OnOff::Off)],
            CommandKind::Percent => [0, 55, 100]
                .into_iter()
                .map(|p| Command::Percent(Percent::new(p).unwrap()))
                .collect(),
            CommandKind::IncreaseDecrease => Vec::new(),
        }
    }

    /// Command -> protocol value -> state through the converters the registry selects
    pub(crate) fn convert_back(registry: &ConverterRegistry, command: &Command) -> Option<State> {
        let expected = command.as_state()?.kind();
        let value = registry.lookup_command(command.kind())?.convert(command)?;
        registry
            .state_converters()
            .find(|c| c.protocol_kind() == value.kind() && c.state_kind() == expected)?
            .convert(&value)
    }

    /// Every command kind the registry accepts comes back as the same state
    pub(crate) fn assert_round_trips(registry: &ConverterRegistry) {
        let mut kinds: Vec<CommandKind> = Vec::new();
        for converter in registry.command_converters() {
            if !kinds.contains(&converter.command_kind()) {
                kinds.push(converter.command_kind());
            }
        }
        assert!(!kinds.is_empty());

        for kind in kinds {
            let samples = samples(kind);
            assert!(!samples.is_empty(), "no samples for {kind}");
            for command in samples {
                assert_eq!(
                    convert_back(registry, &command),
                    command.as_state(),
                    "{command:?} did not survive the round trip"
                );
            }
        }
    }
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("state_converters", &self.state_converters.len())
            .field("command_converters", &self.command_converters.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::command::{DecimalCommandConverter, IntegerCommandConverter};
    use crate::converter::state::{
        DecimalDecimalConverter, IntegerDecimalConverter, IntegerOnOffConverter,
        IntegerPercentConverter,
    };
    use domain::value::{ItemName, ItemType, StateKind};

    fn item(item_type: ItemType) -> Item {
        Item::new(ItemName::new("Test_Item").unwrap(), item_type)
    }

    fn registry() -> ConverterRegistry {
        ConverterRegistry::new()
            .with_state(IntegerDecimalConverter)
            .with_state(IntegerPercentConverter)
            .with_command(DecimalCommandConverter)
            .with_state(DecimalDecimalConverter)
            .with_command(IntegerCommandConverter)
    }

    #[test]
    fn test_state_lookup_filters_by_item_type() {
        let registry = registry();

        let number = registry
            .lookup_state(&item(ItemType::Number), ProtocolKind::Integer)
            .unwrap();
        assert_eq!(number.state_kind(), StateKind::Decimal);

        let dimmer = registry
            .lookup_state(&item(ItemType::Dimmer), ProtocolKind::Integer)
            .unwrap();
        assert_eq!(dimmer.state_kind(), StateKind::Percent);
    }

    #[test]
    fn test_state_lookup_not_found() {
        let registry = registry();
        assert!(
            registry
                .lookup_state(&item(ItemType::Switch), ProtocolKind::Integer)
                .is_none()
        );
        assert!(
            registry
                .lookup_state(&item(ItemType::String), ProtocolKind::Decimal)
                .is_none()
        );
    }

    #[test]
    fn test_first_registered_wins() {
        let registry = registry();
        let converter = registry.lookup_command(CommandKind::Decimal).unwrap();
        assert_eq!(converter.protocol_kind(), ProtocolKind::Decimal);

        let reversed = ConverterRegistry::new()
            .with_command(IntegerCommandConverter)
            .with_command(DecimalCommandConverter);
        let converter = reversed.lookup_command(CommandKind::Decimal).unwrap();
        assert_eq!(converter.protocol_kind(), ProtocolKind::Integer);
    }

    #[test]
    fn test_shared_protocol_kind_resolved_by_order() {
        let on_off_first = ConverterRegistry::new()
            .with_state(IntegerOnOffConverter)
            .with_state(IntegerPercentConverter);
        let converter = on_off_first
            .lookup_state(&item(ItemType::Dimmer), ProtocolKind::Integer)
            .unwrap();
        assert_eq!(converter.state_kind(), StateKind::OnOff);
    }

    #[test]
    fn test_command_lookup_not_found() {
        assert!(registry().lookup_command(CommandKind::OnOff).is_none());
        assert!(ConverterRegistry::new().lookup_command(CommandKind::Decimal).is_none());
    }
}
