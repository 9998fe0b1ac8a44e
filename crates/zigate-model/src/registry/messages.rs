//! Message-type dispatch table.

use std::collections::HashMap;

use zigate_protocol::{Message, MessageLayout, ProtocolResult, LAYOUTS};

/// Maps a message type code to its layout and decoder.
#[derive(Clone)]
pub struct MessageRegistry {
    layouts: HashMap<u16, &'static MessageLayout>,
}

impl MessageRegistry {
    /// Registry of every layout the protocol crate declares.
    pub fn new() -> Self {
        Self::from_layouts(LAYOUTS)
    }

    /// Registry over a custom layout table. A later entry replaces an
    /// earlier one with the same type code.
    pub fn from_layouts(layouts: &'static [MessageLayout]) -> Self {
        Self {
            layouts: layouts
                .iter()
                .map(|layout| (layout.msg_type, layout))
                .collect(),
        }
    }

    /// Layout registered for a message type.
    pub fn get(&self, msg_type: u16) -> Option<&'static MessageLayout> {
        self.layouts.get(&msg_type).copied()
    }

    /// Display name of a message type.
    pub fn name(&self, msg_type: u16) -> Option<&'static str> {
        self.get(msg_type).map(|layout| layout.name)
    }

    /// Decode a body. `None` when the type is not registered.
    pub fn decode(&self, msg_type: u16, body: &[u8]) -> Option<ProtocolResult<Message>> {
        self.get(msg_type).map(|layout| layout.decode_body(body))
    }

    /// Number of registered message types.
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

impl Default for MessageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zigate_protocol::{MSG_ATTRIBUTE_REPORT, MSG_VERSION};

    #[test]
    fn test_registry_covers_layouts() {
        let registry = MessageRegistry::new();
        assert_eq!(registry.len(), LAYOUTS.len());
        assert_eq!(registry.name(MSG_ATTRIBUTE_REPORT), Some("Attribute report"));
        assert!(registry.get(0x9999).is_none());
    }

    #[test]
    fn test_decode_through_registry() {
        let registry = MessageRegistry::new();
        let message = registry
            .decode(MSG_VERSION, &[0x00, 0x03, 0x03, 0x1D])
            .unwrap()
            .unwrap();
        assert_eq!(
            message,
            Message::Version {
                major: 3,
                installer: 0x031D,
            }
        );
        assert!(registry.decode(0x8999, &[]).is_none());
    }
}
