mod entity;
mod node_id;

pub use entity::{Endpoint, Node};
pub use node_id::{EndpointId, NodeId};
