//! Common Zigbee types used in the protocol.

use std::fmt;

use bitflags::bitflags;

use crate::error::{ProtocolError, ProtocolResult};

/// A 64-bit IEEE (MAC) address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IeeeAddress(pub u64);

impl IeeeAddress {
    /// Parse from the 16-digit hex token produced by a 64-bit schema field.
    pub fn from_token(token: &str) -> ProtocolResult<Self> {
        if token.len() != 16 {
            return Err(ProtocolError::invalid_data(format!(
                "IEEE address '{token}' is not 16 hex digits"
            )));
        }
        u64::from_str_radix(token, 16)
            .map(IeeeAddress)
            .map_err(|_| ProtocolError::invalid_data(format!("IEEE address '{token}' is not hex")))
    }

    /// Big-endian bytes, as sent on the wire.
    pub fn to_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for IeeeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Zigbee primitive data type, as carried in attribute records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZigbeeType {
    /// 0x00: no data.
    NoData,
    /// 0x08..=0x0F: general data of 1 to 8 bytes.
    Data,
    /// 0x10.
    Boolean,
    /// 0x18..=0x1F.
    Bitmap,
    /// 0x20..=0x27.
    Unsigned,
    /// 0x28..=0x2F, two's complement.
    Signed,
    /// 0x30..=0x31.
    Enum,
    /// 0x39: single precision float.
    Float,
    /// 0x41 and 0x43.
    OctetString,
    /// 0x42 and 0x44.
    CharString,
    /// 0xFF.
    Unknown,
    /// Any other tag.
    Other(u8),
}

impl ZigbeeType {
    /// Classify a type tag.
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            0x00 => ZigbeeType::NoData,
            0x08..=0x0F => ZigbeeType::Data,
            0x10 => ZigbeeType::Boolean,
            0x18..=0x1F => ZigbeeType::Bitmap,
            0x20..=0x27 => ZigbeeType::Unsigned,
            0x28..=0x2F => ZigbeeType::Signed,
            0x30 | 0x31 => ZigbeeType::Enum,
            0x39 => ZigbeeType::Float,
            0x41 | 0x43 => ZigbeeType::OctetString,
            0x42 | 0x44 => ZigbeeType::CharString,
            0xFF => ZigbeeType::Unknown,
            other => ZigbeeType::Other(other),
        }
    }

    /// Whether values of this type are integers.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            ZigbeeType::Data
                | ZigbeeType::Bitmap
                | ZigbeeType::Unsigned
                | ZigbeeType::Signed
                | ZigbeeType::Enum
        )
    }
}

bitflags! {
    /// MAC capability flags of a joining device.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MacCapability: u8 {
        const ALTERNATE_PAN_COORDINATOR = 0x01;
        /// Full function device.
        const FULL_FUNCTION_DEVICE = 0x02;
        const MAINS_POWERED = 0x04;
        const RECEIVER_ON_WHEN_IDLE = 0x08;
        const SECURITY_CAPABLE = 0x40;
        const ALLOCATE_ADDRESS = 0x80;
    }
}

bitflags! {
    /// Server roles advertised in a node descriptor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ServerMask: u16 {
        const PRIMARY_TRUST_CENTER = 0x0001;
        const BACKUP_TRUST_CENTER = 0x0002;
        const PRIMARY_BINDING_CACHE = 0x0004;
        const BACKUP_BINDING_CACHE = 0x0008;
        const PRIMARY_DISCOVERY_CACHE = 0x0010;
        const BACKUP_DISCOVERY_CACHE = 0x0020;
        const NETWORK_MANAGER = 0x0040;
    }
}

bitflags! {
    /// Descriptor capability field of a node descriptor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DescriptorCapability: u8 {
        const EXTENDED_ACTIVE_ENDPOINT_LIST = 0x01;
        const EXTENDED_SIMPLE_DESCRIPTOR_LIST = 0x02;
    }
}

bitflags! {
    /// IAS zone status bits. Bits 10 to 15 are reserved.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ZoneStatus: u16 {
        const ALARM_1 = 0x0001;
        const ALARM_2 = 0x0002;
        const TAMPER = 0x0004;
        const BATTERY_LOW = 0x0008;
        const SUPERVISION_REPORTS = 0x0010;
        const RESTORE_REPORTS = 0x0020;
        const TROUBLE = 0x0040;
        const AC_MAINS_FAULT = 0x0080;
        const TEST_MODE = 0x0100;
        const BATTERY_DEFECT = 0x0200;
    }
}

bitflags! {
    /// Power sources of a power descriptor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PowerSources: u8 {
        const MAINS = 0x01;
        const RECHARGEABLE_BATTERY = 0x02;
        const DISPOSABLE_BATTERY = 0x04;
    }
}

/// Logical type from the node descriptor bit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalType {
    Coordinator,
    Router,
    EndDevice,
    Reserved(u8),
}

impl From<u8> for LogicalType {
    fn from(value: u8) -> Self {
        match value {
            0 => LogicalType::Coordinator,
            1 => LogicalType::Router,
            2 => LogicalType::EndDevice,
            other => LogicalType::Reserved(other),
        }
    }
}

/// Receiver mode from the power descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerMode {
    /// Receiver on when idle.
    AlwaysOn,
    /// Receiver switched on periodically.
    Periodic,
    /// Receiver switched on when stimulated.
    Stimulated,
    Reserved(u8),
}

impl From<u8> for PowerMode {
    fn from(value: u8) -> Self {
        match value {
            0 => PowerMode::AlwaysOn,
            1 => PowerMode::Periodic,
            2 => PowerMode::Stimulated,
            other => PowerMode::Reserved(other),
        }
    }
}

/// Remaining charge from the power descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerLevel {
    CriticallyLow,
    Approx33,
    Approx66,
    Full,
    Reserved(u8),
}

impl From<u8> for PowerLevel {
    fn from(value: u8) -> Self {
        match value {
            0b0000 => PowerLevel::CriticallyLow,
            0b0100 => PowerLevel::Approx33,
            0b1000 => PowerLevel::Approx66,
            0b1100 => PowerLevel::Full,
            other => PowerLevel::Reserved(other),
        }
    }
}

/// Severity of a dongle log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Information,
    Debug,
    Unknown(u8),
}

impl From<u8> for LogLevel {
    fn from(value: u8) -> Self {
        match value {
            0 => LogLevel::Emergency,
            1 => LogLevel::Alert,
            2 => LogLevel::Critical,
            3 => LogLevel::Error,
            4 => LogLevel::Warning,
            5 => LogLevel::Notice,
            6 => LogLevel::Information,
            7 => LogLevel::Debug,
            other => LogLevel::Unknown(other),
        }
    }
}

/// Outcome of a command, as reported by a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    InvalidParameters,
    UnhandledCommand,
    CommandFailed,
    Busy,
    StackAlreadyStarted,
    /// Failure carrying a stack event code.
    Event(u8),
}

impl From<u8> for Status {
    fn from(value: u8) -> Self {
        match value {
            0 => Status::Success,
            1 => Status::InvalidParameters,
            2 => Status::UnhandledCommand,
            3 => Status::CommandFailed,
            4 => Status::Busy,
            5 => Status::StackAlreadyStarted,
            other => Status::Event(other),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => write!(f, "Success"),
            Status::InvalidParameters => write!(f, "Invalid parameters"),
            Status::UnhandledCommand => write!(f, "Unhandled command"),
            Status::CommandFailed => write!(f, "Command failed"),
            Status::Busy => write!(f, "Busy"),
            Status::StackAlreadyStarted => write!(f, "Stack already started"),
            Status::Event(code) => write!(f, "Failed with event code: {code}"),
        }
    }
}
