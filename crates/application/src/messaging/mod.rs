pub mod command_listener;
pub mod frame_listener;

pub use command_listener::CommandListener;
pub use frame_listener::FrameListener;
