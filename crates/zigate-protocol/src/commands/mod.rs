//! Commands that can be sent to the dongle.
//!
//! Builders are grouped by capability and are plain functions returning a
//! [`Command`]; nothing here touches a connection. Commands that address a
//! device take an [`Addressing`] describing how the dongle should reach it.

pub mod actions;
pub mod attributes;
pub mod description;
pub mod network;

use crate::error::ProtocolResult;
use crate::frame::build_command;

/// A message type and its unescaped payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Message type code.
    pub msg_type: u16,
    /// Payload bytes.
    pub payload: Vec<u8>,
}

impl Command {
    /// Create a command.
    pub fn new(msg_type: u16, payload: Vec<u8>) -> Self {
        Command { msg_type, payload }
    }

    /// A command without payload.
    pub fn bare(msg_type: u16) -> Self {
        Command::new(msg_type, Vec::new())
    }

    /// Encode to a complete frame ready for the transport.
    pub fn encode(&self) -> ProtocolResult<Vec<u8>> {
        build_command(self.msg_type, &self.payload)
    }
}

/// How addressed commands reach their target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addressing {
    /// Address mode byte; 0x02 is short address.
    pub address_mode: u8,
    /// Endpoint on the dongle the command originates from.
    pub source_endpoint: u8,
}

impl Default for Addressing {
    fn default() -> Self {
        Addressing {
            address_mode: 0x02,
            source_endpoint: 0x01,
        }
    }
}

impl Addressing {
    /// Common prefix: mode, target short address, source and destination
    /// endpoints.
    pub fn header(&self, target: u16, endpoint: u8) -> Vec<u8> {
        let mut payload = Vec::with_capacity(16);
        payload.push(self.address_mode);
        payload.extend_from_slice(&target.to_be_bytes());
        payload.push(self.source_endpoint);
        payload.push(endpoint);
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addressing_header() {
        let header = Addressing::default().header(0xAB01, 0x03);
        assert_eq!(header, vec![0x02, 0xAB, 0x01, 0x01, 0x03]);
    }

    #[test]
    fn test_command_encode() {
        let command = Command::new(0x0049, vec![0xFF, 0xFC, 0x1E, 0x00]);
        let frame = command.encode().unwrap();
        assert_eq!(frame.first(), Some(&0x01));
        assert_eq!(frame.last(), Some(&0x03));
        let parsed = crate::frame::FrameAssembler::new().feed(&frame);
        let frame = parsed[0].as_ref().unwrap();
        assert_eq!(frame.msg_type, 0x0049);
        assert_eq!(frame.body, vec![0xFF, 0xFC, 0x1E, 0x00]);
    }
}
