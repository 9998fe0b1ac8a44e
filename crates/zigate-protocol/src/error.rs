//! Protocol error types.

use thiserror::Error;

/// Errors that can occur while framing or decoding ZiGate messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame is too short to hold the message header.
    #[error("frame too short: expected at least {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Expected minimum length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// The length field disagrees with the number of body bytes.
    #[error("bad length: header declares {declared} bytes, body has {actual}")]
    LengthMismatch {
        /// Length carried in the header.
        declared: usize,
        /// Length of the body actually received.
        actual: usize,
    },

    /// The checksum byte disagrees with the computed checksum.
    #[error("bad checksum: header carries 0x{expected:02X}, computed 0x{actual:02X}")]
    ChecksumMismatch {
        /// Checksum carried in the header.
        expected: u8,
        /// Checksum computed over the received bytes.
        actual: u8,
    },

    /// A schema field ran past the end of the buffer.
    #[error("field '{field}' truncated at offset {offset}: needs {needed} bytes, {available} available")]
    Truncated {
        /// Name of the field being decoded.
        field: &'static str,
        /// Byte offset where the field starts.
        offset: usize,
        /// Bytes the field needs.
        needed: usize,
        /// Bytes left in the buffer.
        available: usize,
    },

    /// A decoded record lacks a field an interpreter needs.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A decoded field holds a different kind of value than expected.
    #[error("field '{field}' is not {expected}")]
    UnexpectedFieldKind {
        /// Field name.
        field: &'static str,
        /// Description of the expected value kind.
        expected: &'static str,
    },

    /// A length or count prefix is the last field of its schema.
    #[error("prefix field '{0}' has no following field")]
    UnpairedField(&'static str),

    /// Invalid data in a field.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl ProtocolError {
    /// Create a truncation error for a field.
    pub fn truncated(field: &'static str, offset: usize, needed: usize, available: usize) -> Self {
        ProtocolError::Truncated {
            field,
            offset,
            needed,
            available,
        }
    }

    /// Create an invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        ProtocolError::InvalidData(message.into())
    }

    /// Short machine-friendly name of the error kind, used as a metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            ProtocolError::FrameTooShort { .. } => "too_short",
            ProtocolError::LengthMismatch { .. } => "length",
            ProtocolError::ChecksumMismatch { .. } => "checksum",
            ProtocolError::Truncated { .. } => "truncated",
            ProtocolError::MissingField(_) => "missing_field",
            ProtocolError::UnexpectedFieldKind { .. } => "field_kind",
            ProtocolError::UnpairedField(_) => "unpaired_field",
            ProtocolError::InvalidData(_) => "invalid_data",
        }
    }

    /// Whether this error invalidates the frame itself rather than its contents.
    pub fn is_framing(&self) -> bool {
        matches!(
            self,
            ProtocolError::FrameTooShort { .. }
                | ProtocolError::LengthMismatch { .. }
                | ProtocolError::ChecksumMismatch { .. }
        )
    }
}

/// Result type alias for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
