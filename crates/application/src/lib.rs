//! Application layer - Converters, routing and polling

pub mod converter;
pub mod dispatcher;
pub mod messaging;
pub mod network;
pub mod scheduler;

pub use converter::{ConverterHandler, Diagnostic, Outcome};
pub use dispatcher::InboundDispatcher;
pub use messaging::{CommandListener, FrameListener};
pub use network::{CapabilityKey, Network};
pub use scheduler::RefreshScheduler;
