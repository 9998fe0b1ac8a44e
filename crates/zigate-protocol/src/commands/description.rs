//! Device discovery: addresses and descriptors.

use super::{Addressing, Command};
use crate::constants::*;
use crate::types::IeeeAddress;

/// Ask a device for its short address.
pub fn network_address(target: u16, ieee: IeeeAddress, extended: bool, start_index: u8) -> Command {
    let mut payload = target.to_be_bytes().to_vec();
    payload.extend_from_slice(&ieee.to_bytes());
    payload.push(extended as u8);
    payload.push(start_index);
    Command::new(CMD_NETWORK_ADDRESS, payload)
}

/// Ask a device for its IEEE address, and optionally its children.
pub fn ieee_address(
    addressing: &Addressing,
    target: u16,
    extended: bool,
    start_index: u8,
) -> Command {
    let mut payload = target.to_be_bytes().to_vec();
    payload.push(addressing.address_mode);
    payload.push(extended as u8);
    payload.push(start_index);
    Command::new(CMD_IEEE_ADDRESS, payload)
}

pub fn node_descriptor(target: u16) -> Command {
    Command::new(CMD_NODE_DESCRIPTOR, target.to_be_bytes().to_vec())
}

/// Ask for the clusters of one endpoint.
pub fn simple_descriptor(target: u16, endpoint: u8) -> Command {
    let mut payload = target.to_be_bytes().to_vec();
    payload.push(endpoint);
    Command::new(CMD_SIMPLE_DESCRIPTOR, payload)
}

pub fn power_descriptor(target: u16) -> Command {
    Command::new(CMD_POWER_DESCRIPTOR, target.to_be_bytes().to_vec())
}

pub fn active_endpoints(target: u16) -> Command {
    Command::new(CMD_ACTIVE_ENDPOINTS, target.to_be_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_address_payload() {
        let cmd = network_address(0xABCD, IeeeAddress(0x0102_0304_0506_0708), true, 2);
        assert_eq!(cmd.msg_type, CMD_NETWORK_ADDRESS);
        assert_eq!(
            cmd.payload,
            vec![0xAB, 0xCD, 1, 2, 3, 4, 5, 6, 7, 8, 0x01, 0x02]
        );
    }

    #[test]
    fn test_ieee_address_payload() {
        let cmd = ieee_address(&Addressing::default(), 0x1234, false, 0);
        assert_eq!(cmd.payload, vec![0x12, 0x34, 0x02, 0x00, 0x00]);
    }

    #[test]
    fn test_descriptor_requests() {
        assert_eq!(simple_descriptor(0x1234, 1).payload, vec![0x12, 0x34, 0x01]);
        assert_eq!(node_descriptor(0x1234).msg_type, 0x0042);
        assert_eq!(active_endpoints(0x1234).payload, vec![0x12, 0x34]);
    }
}
