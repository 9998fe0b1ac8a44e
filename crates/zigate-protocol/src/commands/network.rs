//! Coordinator and network management.

use super::Command;
use crate::constants::*;

/// Query the network state.
pub fn network_state() -> Command {
    Command::bare(CMD_NETWORK_STATE)
}

/// Query the firmware version; answered by a version message.
pub fn get_version() -> Command {
    Command::bare(CMD_GET_VERSION)
}

/// Restart the dongle.
pub fn reset() -> Command {
    Command::bare(CMD_RESET)
}

/// Erase the network tables stored on the dongle.
pub fn erase_persistent_data() -> Command {
    Command::bare(CMD_ERASE_PERSISTENT_DATA)
}

pub fn factory_reset() -> Command {
    Command::bare(CMD_FACTORY_RESET)
}

pub fn permit_join_status() -> Command {
    Command::bare(CMD_PERMIT_JOIN_STATUS)
}

/// Ask for the devices known to the coordinator.
pub fn list_devices() -> Command {
    Command::bare(CMD_LIST_DEVICES)
}

/// Let devices join through every router for `seconds`.
pub fn permit_join(seconds: u8) -> Command {
    let mut payload = BROADCAST_ROUTERS.to_be_bytes().to_vec();
    payload.push(seconds);
    payload.push(0x00);
    Command::new(CMD_PERMIT_JOIN, payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permit_join_payload() {
        let cmd = permit_join(30);
        assert_eq!(cmd.msg_type, 0x0049);
        assert_eq!(cmd.payload, vec![0xFF, 0xFC, 0x1E, 0x00]);
    }

    #[test]
    fn test_bare_commands() {
        assert_eq!(get_version(), Command::new(0x0010, vec![]));
        assert_eq!(list_devices().msg_type, 0x0015);
        assert!(factory_reset().payload.is_empty());
    }
}
