//! Attribute reads and discovery.

use super::{Addressing, Command};
use crate::constants::*;
use crate::error::{ProtocolError, ProtocolResult};

/// Client to server.
const DIRECTION_TO_SERVER: u8 = 0x00;

/// Read a list of attributes of one cluster.
///
/// At most 255 attributes fit in one request.
pub fn read_attributes(
    addressing: &Addressing,
    target: u16,
    endpoint: u8,
    cluster: u16,
    attributes: &[u16],
) -> ProtocolResult<Command> {
    let count = u8::try_from(attributes.len()).map_err(|_| {
        ProtocolError::invalid_data(format!(
            "cannot read {} attributes in one request",
            attributes.len()
        ))
    })?;

    let mut payload = addressing.header(target, endpoint);
    payload.extend_from_slice(&cluster.to_be_bytes());
    payload.push(DIRECTION_TO_SERVER);
    // Not manufacturer specific.
    payload.push(0x00);
    payload.extend_from_slice(&0u16.to_be_bytes());
    payload.push(count);
    for attribute in attributes {
        payload.extend_from_slice(&attribute.to_be_bytes());
    }
    Ok(Command::new(CMD_READ_ATTRIBUTE, payload))
}

/// Read a single attribute.
pub fn read_attribute(
    addressing: &Addressing,
    target: u16,
    endpoint: u8,
    cluster: u16,
    attribute: u16,
) -> Command {
    let mut payload = addressing.header(target, endpoint);
    payload.extend_from_slice(&cluster.to_be_bytes());
    payload.extend_from_slice(&[DIRECTION_TO_SERVER, 0x00, 0x00, 0x00, 0x01]);
    payload.extend_from_slice(&attribute.to_be_bytes());
    Command::new(CMD_READ_ATTRIBUTE, payload)
}

/// Read `count` consecutive attributes starting at `first`.
///
/// Identifiers past 0xFFFF are not requested.
pub fn read_attribute_range(
    addressing: &Addressing,
    target: u16,
    endpoint: u8,
    cluster: u16,
    first: u16,
    count: u8,
) -> Command {
    let ids: Vec<u16> = (first..=u16::MAX).take(count as usize).collect();
    let mut payload = addressing.header(target, endpoint);
    payload.extend_from_slice(&cluster.to_be_bytes());
    payload.extend_from_slice(&[DIRECTION_TO_SERVER, 0x00, 0x00, 0x00]);
    payload.push(ids.len() as u8);
    for id in ids {
        payload.extend_from_slice(&id.to_be_bytes());
    }
    Command::new(CMD_READ_ATTRIBUTE, payload)
}

/// Discover the attributes of a cluster, starting at `start`.
///
/// Each discovered attribute comes back as its own discovery message.
pub fn discover_attributes(
    addressing: &Addressing,
    target: u16,
    endpoint: u8,
    cluster: u16,
    start: u16,
    manufacturer: Option<u16>,
    max_attributes: u8,
) -> Command {
    let mut payload = addressing.header(target, endpoint);
    payload.extend_from_slice(&cluster.to_be_bytes());
    payload.extend_from_slice(&start.to_be_bytes());
    payload.push(DIRECTION_TO_SERVER);
    payload.push(manufacturer.is_some() as u8);
    payload.extend_from_slice(&manufacturer.unwrap_or(0).to_be_bytes());
    payload.push(max_attributes);
    Command::new(CMD_DISCOVER_ATTRIBUTES, payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_attribute_payload() {
        let cmd = read_attribute(&Addressing::default(), 0xAB01, 0x01, 0x0000, 0x0005);
        assert_eq!(cmd.msg_type, 0x0100);
        assert_eq!(
            cmd.payload,
            vec![
                0x02, 0xAB, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x05
            ]
        );
    }

    #[test]
    fn test_read_attributes_matches_single() {
        let addressing = Addressing::default();
        let many = read_attributes(&addressing, 0xAB01, 0x01, 0x0000, &[0x0005]).unwrap();
        assert_eq!(many, read_attribute(&addressing, 0xAB01, 0x01, 0x0000, 0x0005));
        assert!(read_attributes(&addressing, 0xAB01, 0x01, 0x0000, &[0; 256]).is_err());
    }

    #[test]
    fn test_read_attribute_range() {
        let cmd = read_attribute_range(&Addressing::default(), 0x1234, 0x01, 0x0000, 0xFFFE, 5);
        let tail = &cmd.payload[cmd.payload.len() - 5..];
        assert_eq!(tail, &[0x02, 0xFF, 0xFE, 0xFF, 0xFF]);
    }

    #[test]
    fn test_discover_attributes_payload() {
        let cmd = discover_attributes(
            &Addressing::default(),
            0x1234,
            0x01,
            0x0402,
            0x0000,
            Some(0x115F),
            0xFF,
        );
        assert_eq!(cmd.msg_type, 0x0140);
        assert_eq!(
            cmd.payload,
            vec![
                0x02, 0x12, 0x34, 0x01, 0x01, 0x04, 0x02, 0x00, 0x00, 0x00, 0x01, 0x11, 0x5F, 0xFF,
            ]
        );
    }
}
