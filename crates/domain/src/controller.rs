use crate::frame::Frame;
use crate::node::NodeId;

/// Transport sink and sole owner of the physical link.
///
/// `send` is fire-and-forget: queuing, retries and transport failures are the
/// controller's concern and are never reported back to the caller.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait Controller: Send + Sync {
    /// Node address of the controller itself on the mesh
    fn own_node_id(&self) -> NodeId;

    fn send(&self, frame: Frame);
}
