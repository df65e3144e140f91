use crate::value::{ItemName, State};

/// Publishes decoded domain state to the home-automation core.
///
/// Fire-and-forget: implementations must not block the caller.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait EventSink: Send + Sync {
    fn publish(&self, item: &ItemName, state: State);
}
