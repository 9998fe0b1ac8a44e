//! Byte stuffing and checksum.
//!
//! The dongle reserves three control bytes on the wire:
//!
//! | byte   | meaning        |
//! |--------|----------------|
//! | `0x01` | start of frame |
//! | `0x02` | escape         |
//! | `0x03` | end of frame   |
//!
//! Every byte below `0x10` inside a frame is sent as `0x02` followed by the
//! byte XOR `0x10`, so none of the control bytes can appear literally between
//! the delimiters.

/// Start-of-frame marker.
pub const START_BYTE: u8 = 0x01;
/// Escape marker.
pub const ESCAPE_BYTE: u8 = 0x02;
/// End-of-frame marker.
pub const END_BYTE: u8 = 0x03;
/// Value XORed into escaped bytes.
pub const ESCAPE_MASK: u8 = 0x10;

/// Escape a byte sequence for transmission.
pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() * 2);
    encode_into(data, &mut out);
    out
}

/// Escape `data` and append the result to `out`.
pub fn encode_into(data: &[u8], out: &mut Vec<u8>) {
    for &byte in data {
        if byte < ESCAPE_MASK {
            out.push(ESCAPE_BYTE);
            out.push(byte ^ ESCAPE_MASK);
        } else {
            out.push(byte);
        }
    }
}

/// Reverse [`encode`].
///
/// A trailing escape marker with no byte after it is dropped.
pub fn decode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut escaped = false;
    for &byte in data {
        if escaped {
            out.push(byte ^ ESCAPE_MASK);
            escaped = false;
        } else if byte == ESCAPE_BYTE {
            escaped = true;
        } else {
            out.push(byte);
        }
    }
    out
}

/// XOR checksum over the message type, length and body.
pub fn checksum(msg_type: [u8; 2], length: [u8; 2], body: &[u8]) -> u8 {
    body.iter()
        .fold(msg_type[0] ^ msg_type[1] ^ length[0] ^ length[1], |acc, b| acc ^ b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_escapes_low_bytes() {
        assert_eq!(encode(&[0x00, 0x10, 0x0F, 0xAB]), vec![0x02, 0x10, 0x10, 0x02, 0x1F, 0xAB]);
    }

    #[test]
    fn test_decode_reverses_escape() {
        assert_eq!(decode(&[0x02, 0x10, 0x10, 0x02, 0x1F, 0xAB]), vec![0x00, 0x10, 0x0F, 0xAB]);
    }

    #[test]
    fn test_round_trip_all_bytes() {
        let data: Vec<u8> = (0..=255u8).collect();
        assert_eq!(decode(&encode(&data)), data);
    }

    #[test]
    fn test_encoded_never_contains_delimiters() {
        let data: Vec<u8> = (0..=255u8).chain((0..=255u8).rev()).collect();
        let encoded = encode(&data);
        assert!(!encoded.contains(&START_BYTE));
        assert!(!encoded.contains(&END_BYTE));

        let mut iter = encoded.iter();
        while let Some(&b) = iter.next() {
            if b == ESCAPE_BYTE {
                let next = *iter.next().expect("escape must be followed by a byte");
                assert!(next ^ ESCAPE_MASK < ESCAPE_MASK);
            }
        }
    }

    #[test]
    fn test_trailing_escape_dropped() {
        assert_eq!(decode(&[0x41, 0x02]), vec![0x41]);
    }

    #[test]
    fn test_checksum_known_value() {
        // Get Version request: type 0x0010, length 0, no body.
        assert_eq!(checksum([0x00, 0x10], [0x00, 0x00], &[]), 0x10);
        // Permit join: type 0x0049, length 4, body FFFC1E00.
        let body = [0xFF, 0xFC, 0x1E, 0x00];
        assert_eq!(checksum([0x00, 0x49], [0x00, 0x04], &body), 0x49 ^ 0x04 ^ 0xFF ^ 0xFC ^ 0x1E);
    }
}
