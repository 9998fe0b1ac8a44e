//! Actions on devices: identify, on/off and level control.

use super::{Addressing, Command};
use crate::constants::*;

/// On/off cluster command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OnOffCommand {
    Off = 0,
    On = 1,
    Toggle = 2,
}

/// Make a device identify itself for `seconds`; zero stops identifying.
pub fn identify(addressing: &Addressing, target: u16, endpoint: u8, seconds: u16) -> Command {
    let mut payload = addressing.header(target, endpoint);
    if seconds == 0 {
        return Command::new(CMD_IDENTIFY_STOP, payload);
    }
    payload.extend_from_slice(&seconds.to_be_bytes());
    Command::new(CMD_IDENTIFY, payload)
}

/// Stop identifying.
pub fn identify_stop(addressing: &Addressing, target: u16, endpoint: u8) -> Command {
    identify(addressing, target, endpoint, 0)
}

/// Switch without effects.
pub fn switch(
    addressing: &Addressing,
    target: u16,
    endpoint: u8,
    command: OnOffCommand,
) -> Command {
    let mut payload = addressing.header(target, endpoint);
    payload.push(command as u8);
    Command::new(CMD_ON_OFF, payload)
}

/// Move to `level` over `transition_time` tenths of a second.
///
/// Transition times above 0xFFFF are clamped; 0xFFFF means as fast as
/// possible.
pub fn move_to_level(
    addressing: &Addressing,
    target: u16,
    endpoint: u8,
    with_on_off: bool,
    level: u8,
    transition_time: u32,
) -> Command {
    let mut payload = addressing.header(target, endpoint);
    payload.push(with_on_off as u8);
    payload.push(level);
    payload.extend_from_slice(&clamp_transition(transition_time).to_be_bytes());
    Command::new(CMD_MOVE_TO_LEVEL, payload)
}

/// Step the level by `step` (negative steps down), at most 255 either way.
pub fn move_step(
    addressing: &Addressing,
    target: u16,
    endpoint: u8,
    with_on_off: bool,
    step: i16,
    transition_time: u32,
) -> Command {
    let mut payload = addressing.header(target, endpoint);
    payload.push(with_on_off as u8);
    payload.push((step < 0) as u8);
    payload.push(step.unsigned_abs().min(u8::MAX as u16) as u8);
    payload.extend_from_slice(&clamp_transition(transition_time).to_be_bytes());
    Command::new(CMD_MOVE_STEP, payload)
}

/// Stop a level move in progress.
pub fn stop_move(addressing: &Addressing, target: u16, endpoint: u8, with_on_off: bool) -> Command {
    let msg_type = if with_on_off {
        CMD_STOP_MOVE_WITH_ON_OFF
    } else {
        CMD_STOP_MOVE
    };
    Command::new(msg_type, addressing.header(target, endpoint))
}

fn clamp_transition(transition_time: u32) -> u16 {
    transition_time.min(u16::MAX as u32) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: Addressing = Addressing {
        address_mode: 0x02,
        source_endpoint: 0x01,
    };

    #[test]
    fn test_identify() {
        let cmd = identify(&ADDR, 0x1234, 0x01, 5);
        assert_eq!(cmd.msg_type, 0x0070);
        assert_eq!(cmd.payload, vec![0x02, 0x12, 0x34, 0x01, 0x01, 0x00, 0x05]);

        let stop = identify_stop(&ADDR, 0x1234, 0x01);
        assert_eq!(stop.msg_type, 0x0071);
        assert_eq!(stop.payload.len(), 5);
    }

    #[test]
    fn test_switch() {
        let cmd = switch(&ADDR, 0x1234, 0x02, OnOffCommand::Toggle);
        assert_eq!(cmd.msg_type, 0x0092);
        assert_eq!(cmd.payload, vec![0x02, 0x12, 0x34, 0x01, 0x02, 0x02]);
    }

    #[test]
    fn test_move_to_level_clamps_transition() {
        let cmd = move_to_level(&ADDR, 0x1234, 0x01, true, 0x80, 10);
        assert_eq!(&cmd.payload[5..], &[0x01, 0x80, 0x00, 0x0A]);

        let cmd = move_to_level(&ADDR, 0x1234, 0x01, false, 0xFE, 100_000);
        assert_eq!(&cmd.payload[5..], &[0x00, 0xFE, 0xFF, 0xFF]);
    }

    #[test]
    fn test_move_step_direction() {
        let cmd = move_step(&ADDR, 0x1234, 0x01, true, -300, 0);
        assert_eq!(cmd.msg_type, 0x0082);
        assert_eq!(&cmd.payload[5..], &[0x01, 0x01, 0xFF, 0x00, 0x00]);

        let cmd = move_step(&ADDR, 0x1234, 0x01, false, 20, 5);
        assert_eq!(&cmd.payload[5..], &[0x00, 0x00, 0x14, 0x00, 0x05]);
    }

    #[test]
    fn test_stop_move() {
        assert_eq!(stop_move(&ADDR, 0x1234, 0x01, true).msg_type, 0x0084);
        assert_eq!(stop_move(&ADDR, 0x1234, 0x01, false).msg_type, 0x0083);
    }
}
