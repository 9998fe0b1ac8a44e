//! Property value types and conversion traits.
//!
//! This module provides:
//! - [`PropertyValue`] - The dynamic value stored for each device property
//! - [`FromPropertyValue`] - Trait for extracting typed values from a PropertyValue

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Property Value Enum
// ============================================================================

/// Last-known value of a device property.
///
/// Serializes untagged: timestamps as RFC 3339 strings, bytes as arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value (i64).
    Integer(i64),
    /// Floating point value (f64).
    Float(f64),
    /// Point in time, such as `last_seen`.
    Timestamp(DateTime<Utc>),
    /// String value.
    String(String),
    /// Raw bytes that have no textual form.
    Bytes(Vec<u8>),
    /// Null value.
    Null,
}

impl PropertyValue {
    /// Convert to i64 if possible.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Convert to u64 if possible.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            PropertyValue::Integer(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Convert to f64 if possible.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(v) => Some(*v),
            PropertyValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            PropertyValue::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            PropertyValue::Timestamp(v) => Some(*v),
            _ => None,
        }
    }

    /// Check if the value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(v) => write!(f, "{}", v),
            PropertyValue::Integer(v) => write!(f, "{}", v),
            PropertyValue::Float(v) => write!(f, "{}", v),
            PropertyValue::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
            PropertyValue::String(v) => write!(f, "{}", v),
            PropertyValue::Bytes(v) => write!(f, "{}", hex::encode(v)),
            PropertyValue::Null => write!(f, "null"),
        }
    }
}

// ============================================================================
// From implementations for PropertyValue
// ============================================================================

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Integer(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Integer(v as i64)
    }
}

impl From<i16> for PropertyValue {
    fn from(v: i16) -> Self {
        PropertyValue::Integer(v as i64)
    }
}

/// Values above `i64::MAX` keep their big-endian bytes.
impl From<u64> for PropertyValue {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(v) => PropertyValue::Integer(v),
            Err(_) => PropertyValue::Bytes(v.to_be_bytes().to_vec()),
        }
    }
}

impl From<u32> for PropertyValue {
    fn from(v: u32) -> Self {
        PropertyValue::Integer(v as i64)
    }
}

impl From<u16> for PropertyValue {
    fn from(v: u16) -> Self {
        PropertyValue::Integer(v as i64)
    }
}

impl From<u8> for PropertyValue {
    fn from(v: u8) -> Self {
        PropertyValue::Integer(v as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<f32> for PropertyValue {
    fn from(v: f32) -> Self {
        PropertyValue::Float(v as f64)
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::String(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::String(v.to_string())
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<Vec<u8>> for PropertyValue {
    fn from(v: Vec<u8>) -> Self {
        PropertyValue::Bytes(v)
    }
}

impl From<&[u8]> for PropertyValue {
    fn from(v: &[u8]) -> Self {
        PropertyValue::Bytes(v.to_vec())
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(v: DateTime<Utc>) -> Self {
        PropertyValue::Timestamp(v)
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => PropertyValue::Null,
        }
    }
}

// ============================================================================
// Type-Safe Property Value Extraction
// ============================================================================

/// Trait for types that can be extracted from a PropertyValue.
pub trait FromPropertyValue: Sized {
    /// Extract a value, or `None` if the stored value has another type.
    fn from_property_value(value: &PropertyValue) -> Option<Self>;
}

impl FromPropertyValue for i64 {
    fn from_property_value(value: &PropertyValue) -> Option<Self> {
        value.as_i64()
    }
}

impl FromPropertyValue for u64 {
    fn from_property_value(value: &PropertyValue) -> Option<Self> {
        value.as_u64()
    }
}

impl FromPropertyValue for f64 {
    fn from_property_value(value: &PropertyValue) -> Option<Self> {
        value.as_f64()
    }
}

impl FromPropertyValue for bool {
    fn from_property_value(value: &PropertyValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromPropertyValue for String {
    fn from_property_value(value: &PropertyValue) -> Option<Self> {
        value.as_str().map(|s| s.to_string())
    }
}

impl FromPropertyValue for Vec<u8> {
    fn from_property_value(value: &PropertyValue) -> Option<Self> {
        value.as_bytes().map(|b| b.to_vec())
    }
}

impl FromPropertyValue for DateTime<Utc> {
    fn from_property_value(value: &PropertyValue) -> Option<Self> {
        value.as_timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(PropertyValue::from(-12i16), PropertyValue::Integer(-12));
        assert_eq!(PropertyValue::from(Some("on-press")).as_str(), Some("on-press"));
        assert!(PropertyValue::from(None::<f64>).is_null());
        assert_eq!(PropertyValue::from(2.5f32).as_f64(), Some(2.5));
        assert_eq!(PropertyValue::Integer(-1).as_u64(), None);
    }

    #[test]
    fn test_large_unsigned_keeps_bytes() {
        let value = PropertyValue::from(u64::MAX);
        assert_eq!(value.as_bytes(), Some(&[0xFF; 8][..]));
        assert_eq!(value.to_string(), "ffffffffffffffff");
    }

    #[test]
    fn test_from_property_value() {
        let value = PropertyValue::from(23.61);
        assert_eq!(f64::from_property_value(&value), Some(23.61));
        assert_eq!(bool::from_property_value(&value), None);

        let raw = PropertyValue::from(vec![0x09u8, 0x29]);
        assert_eq!(Vec::<u8>::from_property_value(&raw), Some(vec![0x09, 0x29]));
    }

    #[test]
    fn test_serializes_untagged() {
        let json = serde_json::to_string(&PropertyValue::from("shake")).unwrap();
        assert_eq!(json, "\"shake\"");
        let json = serde_json::to_string(&PropertyValue::from(vec![1u8, 2])).unwrap();
        assert_eq!(json, "[1,2]");
        let json = serde_json::to_string(&PropertyValue::Null).unwrap();
        assert_eq!(json, "null");
    }
}
