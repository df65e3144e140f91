use crate::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Network address of a device on the mesh.
///
/// Rules:
/// - 0 is never a valid node address
/// - Max address is 232 (addresses above are reserved by the protocol)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct NodeId(u8);

impl NodeId {
    pub const MAX: u8 = 232;

    /// Create a new NodeId with validation
    pub fn new(id: u8) -> Result<Self> {
        if id == 0 || id > Self::MAX {
            return Err(DomainError::InvalidNodeId(id));
        }
        Ok(Self(id))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for NodeId {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<NodeId> for u8 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sub-address within a node. Endpoint 0 is the root device.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EndpointId(u8);

impl EndpointId {
    pub const ROOT: EndpointId = EndpointId(0);

    pub fn new(id: u8) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == 0
    }
}

impl From<u8> for EndpointId {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for EndpointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_node_id() {
        let id = NodeId::new(12).unwrap();
        assert_eq!(id.value(), 12);
        assert_eq!(format!("{}", id), "12");
    }

    #[test]
    fn test_zero_node_id_rejected() {
        assert_eq!(NodeId::new(0), Err(DomainError::InvalidNodeId(0)));
    }

    #[test]
    fn test_reserved_node_id_rejected() {
        assert!(NodeId::new(232).is_ok());
        assert!(NodeId::new(233).is_err());
    }

    #[test]
    fn test_node_id_deserialization_validates() {
        let ok: NodeId = serde_json::from_str("5").unwrap();
        assert_eq!(ok.value(), 5);
        assert!(serde_json::from_str::<NodeId>("0").is_err());
    }

    #[test]
    fn test_root_endpoint() {
        assert!(EndpointId::ROOT.is_root());
        assert!(EndpointId::default().is_root());
        assert!(!EndpointId::new(2).is_root());
    }
}
