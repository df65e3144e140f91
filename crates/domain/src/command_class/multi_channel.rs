//! Multi-channel (endpoint) encapsulation of application commands.

use super::CommandClassKind;
use crate::error::{DomainError, Result};
use crate::node::EndpointId;

pub const MULTI_INSTANCE_ENCAP: u8 = 0x06;
pub const MULTI_CHANNEL_ENCAP: u8 = 0x0D;

/// Wraps `inner` for delivery to `endpoint` (v2 and later).
pub fn encapsulate(endpoint: EndpointId, inner: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(inner.len() + 4);
    payload.extend_from_slice(&[
        CommandClassKind::MultiChannel.key(),
        MULTI_CHANNEL_ENCAP,
        EndpointId::ROOT.value(),
        endpoint.value(),
    ]);
    payload.extend_from_slice(inner);
    payload
}

/// Wraps `inner` for delivery to instance `endpoint` (v1 multi-instance).
pub fn encapsulate_instance(endpoint: EndpointId, inner: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(inner.len() + 3);
    payload.extend_from_slice(&[
        CommandClassKind::MultiChannel.key(),
        MULTI_INSTANCE_ENCAP,
        endpoint.value(),
    ]);
    payload.extend_from_slice(inner);
    payload
}

/// Strips multi-channel encapsulation from an inbound payload, returning the
/// source endpoint and the inner command. Non-encapsulated payloads come from
/// the root endpoint.
pub fn decapsulate(payload: &[u8]) -> Result<(EndpointId, &[u8])> {
    let key = CommandClassKind::MultiChannel.key();
    match payload {
        [class, MULTI_CHANNEL_ENCAP, source, _destination, inner @ ..] if *class == key => {
            non_empty(inner).map(|inner| (EndpointId::new(*source), inner))
        }
        [class, MULTI_INSTANCE_ENCAP, instance, inner @ ..] if *class == key => {
            non_empty(inner).map(|inner| (EndpointId::new(*instance), inner))
        }
        [class, ..] if *class == key => Err(DomainError::MalformedReport {
            kind: CommandClassKind::MultiChannel,
            reason: "not an encapsulation frame".to_string(),
        }),
        _ => Ok((EndpointId::ROOT, payload)),
    }
}

fn non_empty(inner: &[u8]) -> Result<&[u8]> {
    if inner.len() < 2 {
        return Err(DomainError::MalformedReport {
            kind: CommandClassKind::MultiChannel,
            reason: "encapsulated command too short".to_string(),
        });
    }
    Ok(inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decapsulate_v2() {
        // Reports carry the node's endpoint as source
        let mut report = encapsulate(EndpointId::new(3), &[0x25, 0x03, 0xFF]);
        report[2] = 3;
        report[3] = 0;
        let (endpoint, inner) = decapsulate(&report).unwrap();
        assert_eq!(endpoint, EndpointId::new(3));
        assert_eq!(inner, &[0x25, 0x03, 0xFF]);
    }

    #[test]
    fn test_decapsulate_v1() {
        let payload = encapsulate_instance(EndpointId::new(2), &[0x80, 0x03, 0x40]);
        let (endpoint, inner) = decapsulate(&payload).unwrap();
        assert_eq!(endpoint, EndpointId::new(2));
        assert_eq!(inner, &[0x80, 0x03, 0x40]);
    }

    #[test]
    fn test_plain_payload_is_root() {
        let (endpoint, inner) = decapsulate(&[0x84, 0x06, 0x00, 0x0E, 0x10, 0x01]).unwrap();
        assert!(endpoint.is_root());
        assert_eq!(inner.len(), 6);
    }

    #[test]
    fn test_truncated_encapsulation_rejected() {
        assert!(decapsulate(&[0x60, 0x0D, 0x01, 0x00, 0x25]).is_err());
        assert!(decapsulate(&[0x60, 0x08]).is_err());
    }
}
