//! Frame encoding/decoding utilities.
//!
//! A ZiGate frame is delimited by `0x01` and `0x03`; everything in between is
//! byte-stuffed (see [`crate::codec`]):
//!
//! ```text
//! +------+----------+--------+----------+------------------+------+
//! | 0x01 | msg_type | length | checksum | body[0..length]  | 0x03 |
//! |      | u16 BE   | u16 BE | u8 (xor) | (last byte RSSI) |      |
//! +------+----------+--------+----------+------------------+------+
//! ```
//!
//! Frames sent by the dongle carry the link quality of the received packet
//! as the last byte of the body; the length field and the checksum cover it.

use bytes::{Buf, BytesMut};
use tracing::{trace, warn};

use crate::codec::{self, END_BYTE, START_BYTE};
use crate::error::{ProtocolError, ProtocolResult};

/// Unescaped header size: message type, length and checksum.
pub const HEADER_LEN: usize = 5;

/// Largest body the 16-bit length field can describe.
pub const MAX_BODY_LEN: usize = u16::MAX as usize;

/// Largest possible frame on the wire: every byte escaped, plus both markers.
pub const MAX_WIRE_FRAME_LEN: usize = 2 * (HEADER_LEN + MAX_BODY_LEN) + 2;

/// One unescaped, validated frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message type code.
    pub msg_type: u16,
    /// Body length declared in the header.
    pub length: u16,
    /// Checksum carried in the header.
    pub checksum: u8,
    /// Body bytes, including the trailing RSSI byte on inbound frames.
    pub body: Vec<u8>,
    /// Last body byte of an inbound frame. The firmware appends the signal
    /// strength there on most messages; [`MessageLayout::rssi`] only reports
    /// it when the body is longer than the layout's fixed part.
    ///
    /// [`MessageLayout::rssi`]: crate::MessageLayout::rssi
    pub rssi: Option<u8>,
}

impl Frame {
    /// Build an outbound frame, computing length and checksum.
    pub fn new(msg_type: u16, body: Vec<u8>) -> ProtocolResult<Self> {
        let length = u16::try_from(body.len()).map_err(|_| {
            ProtocolError::invalid_data(format!(
                "body of {} bytes exceeds the {} byte maximum",
                body.len(),
                MAX_BODY_LEN
            ))
        })?;
        let checksum = codec::checksum(msg_type.to_be_bytes(), length.to_be_bytes(), &body);
        Ok(Frame {
            msg_type,
            length,
            checksum,
            body,
            rssi: None,
        })
    }

    /// Parse the unescaped bytes found between the frame markers.
    pub fn parse(data: &[u8]) -> ProtocolResult<Self> {
        if data.len() < HEADER_LEN {
            return Err(ProtocolError::FrameTooShort {
                expected: HEADER_LEN,
                actual: data.len(),
            });
        }

        let msg_type = u16::from_be_bytes([data[0], data[1]]);
        let length = u16::from_be_bytes([data[2], data[3]]);
        let checksum = data[4];
        let body = &data[HEADER_LEN..];

        if length as usize != body.len() {
            return Err(ProtocolError::LengthMismatch {
                declared: length as usize,
                actual: body.len(),
            });
        }

        let computed = codec::checksum([data[0], data[1]], [data[2], data[3]], body);
        if computed != checksum {
            return Err(ProtocolError::ChecksumMismatch {
                expected: checksum,
                actual: computed,
            });
        }

        Ok(Frame {
            msg_type,
            length,
            checksum,
            body: body.to_vec(),
            rssi: body.last().copied(),
        })
    }

    /// Unescaped header and body, without markers.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + self.body.len());
        buf.extend_from_slice(&self.msg_type.to_be_bytes());
        buf.extend_from_slice(&self.length.to_be_bytes());
        buf.push(self.checksum);
        buf.extend_from_slice(&self.body);
        buf
    }

    /// Escaped, delimited bytes ready for the transport.
    pub fn encode(&self) -> Vec<u8> {
        let raw = self.to_bytes();
        let mut buf = Vec::with_capacity(raw.len() * 2 + 2);
        buf.push(START_BYTE);
        codec::encode_into(&raw, &mut buf);
        buf.push(END_BYTE);
        buf
    }
}

/// Build a complete outbound frame for a message type and payload.
pub fn build_command(msg_type: u16, payload: &[u8]) -> ProtocolResult<Vec<u8>> {
    Ok(Frame::new(msg_type, payload.to_vec())?.encode())
}

/// Splits an inbound byte stream into frames.
///
/// Bytes are accumulated across calls; a frame split over several reads is
/// returned once its end marker arrives.
#[derive(Debug)]
pub struct FrameAssembler {
    /// Buffer for accumulating incoming data.
    buffer: BytesMut,
    /// Unterminated bytes kept before old data is dropped.
    max_pending: usize,
    /// Total bytes thrown away as noise or overflow.
    discarded: u64,
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameAssembler {
    /// Create an assembler with the default pending limit.
    pub fn new() -> Self {
        Self::with_max_pending(MAX_WIRE_FRAME_LEN)
    }

    /// Create an assembler that keeps at most `max_pending` unterminated bytes.
    pub fn with_max_pending(max_pending: usize) -> Self {
        FrameAssembler {
            buffer: BytesMut::with_capacity(1024),
            max_pending: max_pending.max(HEADER_LEN + 2),
            discarded: 0,
        }
    }

    /// Add received data to the buffer.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Add received data and drain every frame it completes.
    pub fn feed(&mut self, data: &[u8]) -> Vec<ProtocolResult<Frame>> {
        self.push(data);
        let mut frames = Vec::new();
        while let Some(frame) = self.next_frame() {
            frames.push(frame);
        }
        frames
    }

    /// Try to extract the next frame from the buffer.
    ///
    /// Returns `None` when no end marker is buffered. A frame that fails its
    /// length or checksum check is returned as an error and removed, so the
    /// following frames are still reachable.
    pub fn next_frame(&mut self) -> Option<ProtocolResult<Frame>> {
        loop {
            let Some(end) = self.buffer.iter().position(|&b| b == END_BYTE) else {
                self.enforce_limit();
                return None;
            };

            let Some(start) = self.buffer[..end].iter().position(|&b| b == START_BYTE) else {
                warn!(bytes = end + 1, "discarding data without start marker");
                self.discard(end + 1);
                continue;
            };

            if start > 0 {
                warn!(bytes = start, "discarding noise before start marker");
                self.discard(start);
                continue;
            }

            let raw = self.buffer.split_to(end + 1);
            let decoded = codec::decode(&raw[1..end]);
            let result = Frame::parse(&decoded);
            match &result {
                Ok(frame) => trace!(
                    msg_type = format_args!("{:04X}", frame.msg_type),
                    encoded = %hex::encode(&raw),
                    decoded = %hex::encode(&decoded),
                    "frame received"
                ),
                Err(e) => warn!(error = %e, decoded = %hex::encode(&decoded), "frame discarded"),
            }
            return Some(result);
        }
    }

    fn enforce_limit(&mut self) {
        if self.buffer.len() <= self.max_pending {
            return;
        }
        let keep_from = match self.buffer.iter().rposition(|&b| b == START_BYTE) {
            Some(pos) if pos > 0 => pos,
            _ => self.buffer.len(),
        };
        warn!(
            bytes = keep_from,
            limit = self.max_pending,
            "pending data exceeds limit without end marker"
        );
        self.discard(keep_from);
    }

    fn discard(&mut self, count: usize) {
        self.buffer.advance(count);
        self.discarded += count as u64;
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Total bytes dropped as noise or overflow since creation.
    pub fn discarded_bytes(&self) -> u64 {
        self.discarded
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
