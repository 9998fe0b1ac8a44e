//! Attribute interpreters keyed by (cluster, attribute).
//!
//! An interpreter turns the data bytes of one attribute record into named
//! [`Reading`]s. Pairs with no interpreter still get a generic reading from
//! [`coerce`], driven by the record's Zigbee type tag.

use std::collections::HashMap;

use zigate_protocol::*;

use crate::properties::PropertyValue;

/// One interpreted property of an attribute report.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub property: String,
    pub value: PropertyValue,
}

impl Reading {
    pub fn new(property: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

/// Interprets the data bytes of one attribute.
pub type Interpreter = fn(&[u8]) -> Vec<Reading>;

/// Table of attribute interpreters.
#[derive(Clone)]
pub struct AttributeRegistry {
    interpreters: HashMap<(u16, u16), Interpreter>,
}

impl AttributeRegistry {
    /// Registry with every built-in interpreter.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for &(cluster, attribute, interpreter) in BUILTIN {
            registry.register(cluster, attribute, interpreter);
        }
        registry
    }

    /// Registry with no interpreters.
    pub fn empty() -> Self {
        Self {
            interpreters: HashMap::new(),
        }
    }

    /// Add or replace an interpreter, returning the one it replaced.
    pub fn register(
        &mut self,
        cluster: u16,
        attribute: u16,
        interpreter: Interpreter,
    ) -> Option<Interpreter> {
        self.interpreters.insert((cluster, attribute), interpreter)
    }

    /// Interpreter for a cluster attribute.
    pub fn get(&self, cluster: u16, attribute: u16) -> Option<Interpreter> {
        self.interpreters.get(&(cluster, attribute)).copied()
    }

    /// Whether an interpreter is registered for the attribute.
    pub fn contains(&self, cluster: u16, attribute: u16) -> bool {
        self.interpreters.contains_key(&(cluster, attribute))
    }

    /// Run the interpreter for a report. `None` when there is none.
    pub fn interpret(&self, report: &AttributeReport) -> Option<Vec<Reading>> {
        self.get(report.cluster, report.attribute)
            .map(|interpreter| interpreter(&report.data))
    }

    /// Number of registered interpreters.
    pub fn len(&self) -> usize {
        self.interpreters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interpreters.is_empty()
    }
}

impl Default for AttributeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Name of the generic property of an attribute, e.g. `0402_0000`.
pub fn generic_property(cluster: u16, attribute: u16) -> String {
    format!("{:04x}_{:04x}", cluster, attribute)
}

/// Generic typed and raw readings of a report, or nothing for type 0xFF.
pub fn generic_readings(report: &AttributeReport) -> Vec<Reading> {
    let Some(value) = coerce(report.attribute_type, &report.data) else {
        return Vec::new();
    };
    let name = generic_property(report.cluster, report.attribute);
    vec![
        Reading::new(format!("{name}_raw"), report.data.clone()),
        Reading::new(name, value),
    ]
}

/// Coerce attribute data by its Zigbee type tag.
///
/// Returns `None` for the unknown type (0xFF), which is not recorded.
pub fn coerce(attribute_type: u8, data: &[u8]) -> Option<PropertyValue> {
    let value = match ZigbeeType::from_tag(attribute_type) {
        ZigbeeType::Unknown => return None,
        ZigbeeType::NoData => PropertyValue::Null,
        ZigbeeType::Boolean => data
            .first()
            .map_or(PropertyValue::Null, |b| PropertyValue::Bool(*b != 0)),
        ZigbeeType::Signed => match be_signed(data) {
            Some(v) => PropertyValue::Integer(v),
            None => raw_or_null(data),
        },
        kind if kind.is_integer() => match be_unsigned(data) {
            Some(v) => PropertyValue::from(v),
            None => raw_or_null(data),
        },
        ZigbeeType::Float => match be_f32(data) {
            Some(v) => PropertyValue::from(v),
            None => raw_or_null(data),
        },
        ZigbeeType::OctetString => PropertyValue::Bytes(data.to_vec()),
        _ => match std::str::from_utf8(data) {
            Ok(text) => PropertyValue::String(text.to_string()),
            Err(_) => PropertyValue::Bytes(data.to_vec()),
        },
    };
    Some(value)
}

fn raw_or_null(data: &[u8]) -> PropertyValue {
    if data.is_empty() {
        PropertyValue::Null
    } else {
        PropertyValue::Bytes(data.to_vec())
    }
}

// ============================================================================
// Byte Helpers
// ============================================================================

/// Big-endian unsigned value of 1 to 8 bytes.
fn be_unsigned(data: &[u8]) -> Option<u64> {
    if data.is_empty() || data.len() > 8 {
        return None;
    }
    Some(data.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
}

/// Big-endian two's complement value of 1 to 8 bytes.
fn be_signed(data: &[u8]) -> Option<i64> {
    let value = be_unsigned(data)?;
    let shift = 64 - 8 * data.len() as u32;
    Some(((value << shift) as i64) >> shift)
}

fn be_f32(data: &[u8]) -> Option<f32> {
    let bytes: [u8; 4] = data.try_into().ok()?;
    Some(f32::from_be_bytes(bytes))
}

fn is_unused(data: &[u8]) -> bool {
    !data.is_empty() && data.iter().all(|&b| b == 0xFF)
}

// ============================================================================
// Built-in Interpreters
// ============================================================================

const BUILTIN: &[(u16, u16, Interpreter)] = &[
    (CLUSTER_BASIC, ATTR_BASIC_MODEL, model),
    (CLUSTER_BASIC, ATTR_BASIC_XIAOMI_INFO, xiaomi_battery),
    (CLUSTER_ON_OFF, ATTR_ON_OFF, on_off),
    (CLUSTER_ON_OFF, ATTR_MULTI_CLICK, multi_click),
    (CLUSTER_LEVEL_CONTROL, ATTR_CURRENT_LEVEL, current_level),
    (CLUSTER_LEVEL_CONTROL, ATTR_MAX_LEVEL, max_level),
    (CLUSTER_ANALOG_INPUT, ATTR_PRESENT_VALUE, rotation),
    (CLUSTER_ANALOG_INPUT, ATTR_ROTATION_ANNOUNCE, rotation_announce),
    (CLUSTER_MULTISTATE_INPUT, ATTR_PRESENT_VALUE, gesture),
    (CLUSTER_ILLUMINANCE, ATTR_MEASURED_VALUE, illuminance),
    (CLUSTER_ILLUMINANCE, ATTR_MIN_MEASURED_VALUE, illuminance_min),
    (CLUSTER_ILLUMINANCE, ATTR_MAX_MEASURED_VALUE, illuminance_max),
    (CLUSTER_ILLUMINANCE, ATTR_TOLERANCE, illuminance_tolerance),
    (CLUSTER_ILLUMINANCE, ATTR_LIGHT_SENSOR_TYPE, illuminance_sensor),
    (CLUSTER_TEMPERATURE, ATTR_MEASURED_VALUE, temperature),
    (CLUSTER_PRESSURE, ATTR_MEASURED_VALUE, pressure),
    (CLUSTER_PRESSURE, ATTR_SCALED_VALUE, detailed_pressure),
    (CLUSTER_PRESSURE, ATTR_SCALE, pressure_scale),
    (CLUSTER_HUMIDITY, ATTR_MEASURED_VALUE, humidity),
    (CLUSTER_OCCUPANCY, ATTR_OCCUPANCY, occupancy),
];

fn model(data: &[u8]) -> Vec<Reading> {
    let text = String::from_utf8_lossy(data);
    vec![Reading::new("type", text.trim_end_matches('\0'))]
}

/// Xiaomi private structure; battery millivolts at bytes 2..4, little-endian.
fn xiaomi_battery(data: &[u8]) -> Vec<Reading> {
    match data.get(2..4) {
        Some(&[lo, hi]) => {
            let millivolts = u16::from_le_bytes([lo, hi]);
            vec![Reading::new("battery", millivolts as f64 / 1000.0)]
        }
        _ => Vec::new(),
    }
}

/// 0x00 is a press (or closed contact).
fn on_off(data: &[u8]) -> Vec<Reading> {
    let Some(&value) = data.first() else {
        return Vec::new();
    };
    let state = if value == 0x00 { "on-press" } else { "off-release" };
    vec![Reading::new("on_off", value != 0x00), Reading::new("state", state)]
}

fn multi_click(data: &[u8]) -> Vec<Reading> {
    let Some(clicks) = be_unsigned(data) else {
        return Vec::new();
    };
    vec![
        Reading::new("clicks", clicks),
        Reading::new("state", format!("multi_{clicks}")),
    ]
}

fn current_level(data: &[u8]) -> Vec<Reading> {
    let Some(level) = be_unsigned(data) else {
        return Vec::new();
    };
    vec![
        Reading::new("level", level),
        Reading::new("level_percent", level as f64 / 254.0 * 100.0),
    ]
}

fn max_level(data: &[u8]) -> Vec<Reading> {
    be_unsigned(data)
        .map(|level| vec![Reading::new("level_max", level)])
        .unwrap_or_default()
}

fn rotation(data: &[u8]) -> Vec<Reading> {
    be_f32(data)
        .map(|angle| vec![Reading::new("rotation", angle)])
        .unwrap_or_default()
}

fn rotation_announce(data: &[u8]) -> Vec<Reading> {
    vec![Reading::new("rotation_announce", hex::encode(data))]
}

/// Cube gestures. For rotations the second byte packs
/// `type(2) | from face(3) | to face(3)`; type 2 is a 180° turn.
fn gesture(data: &[u8]) -> Vec<Reading> {
    let gesture = match data {
        [0x00, 0x00] => "shake".to_string(),
        [0x02, face] => format!("tap{face}"),
        [0x01, face] => format!("slide{face}"),
        [0x00, bits] => {
            let (kind, from, to) = (bits >> 6, (bits >> 3) & 0x07, bits & 0x07);
            if kind == 2 {
                "rotation180".to_string()
            } else {
                format!("rotation90_from{from}_to{to}")
            }
        }
        _ => return Vec::new(),
    };
    vec![Reading::new("gesture", gesture)]
}

fn illuminance(data: &[u8]) -> Vec<Reading> {
    be_signed(data)
        .map(|lux| vec![Reading::new("illuminance", lux)])
        .unwrap_or_default()
}

fn illuminance_bound(property: &'static str, data: &[u8]) -> Vec<Reading> {
    if is_unused(data) {
        return Vec::new();
    }
    be_signed(data)
        .map(|lux| vec![Reading::new(property, lux)])
        .unwrap_or_default()
}

fn illuminance_min(data: &[u8]) -> Vec<Reading> {
    illuminance_bound("illuminance_min", data)
}

fn illuminance_max(data: &[u8]) -> Vec<Reading> {
    illuminance_bound("illuminance_max", data)
}

fn illuminance_tolerance(data: &[u8]) -> Vec<Reading> {
    be_signed(data)
        .map(|tolerance| vec![Reading::new("illuminance_tolerance", tolerance)])
        .unwrap_or_default()
}

fn illuminance_sensor(data: &[u8]) -> Vec<Reading> {
    let sensor = match data {
        [0x00] => "Photodiode",
        [0x01] => "CMOS",
        [0x02..=0x3F] => "Reserved",
        [0x40..=0xFE] => "Reserved for manufacturer",
        _ => "Unknown",
    };
    vec![Reading::new("illuminance_sensor", sensor)]
}

/// Hundredths of a degree Celsius.
fn temperature(data: &[u8]) -> Vec<Reading> {
    be_signed(data)
        .map(|centi| vec![Reading::new("temperature", centi as f64 / 100.0)])
        .unwrap_or_default()
}

/// Millibars.
fn pressure(data: &[u8]) -> Vec<Reading> {
    be_unsigned(data)
        .map(|mbar| vec![Reading::new("pressure", mbar)])
        .unwrap_or_default()
}

/// Tenths of a millibar.
fn detailed_pressure(data: &[u8]) -> Vec<Reading> {
    be_unsigned(data)
        .map(|deci| vec![Reading::new("detailed_pressure", deci as f64 / 10.0)])
        .unwrap_or_default()
}

fn pressure_scale(_data: &[u8]) -> Vec<Reading> {
    Vec::new()
}

/// Hundredths of a percent.
fn humidity(data: &[u8]) -> Vec<Reading> {
    be_unsigned(data)
        .map(|centi| vec![Reading::new("humidity", centi as f64 / 100.0)])
        .unwrap_or_default()
}

fn occupancy(data: &[u8]) -> Vec<Reading> {
    match data {
        [0x01] => vec![Reading::new("event", "presence detected")],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn report(cluster: u16, attribute: u16, attribute_type: u8, data: &[u8]) -> AttributeReport {
        AttributeReport {
            sequence: 1,
            short_addr: 0x1234,
            endpoint: 1,
            cluster,
            attribute,
            status: 0,
            attribute_type,
            data: data.to_vec(),
        }
    }

    fn single(readings: Vec<Reading>) -> (String, PropertyValue) {
        assert_eq!(readings.len(), 1, "{readings:?}");
        let reading = readings.into_iter().next().unwrap();
        (reading.property, reading.value)
    }

    #[test]
    fn test_byte_helpers() {
        assert_eq!(be_unsigned(&[0x01, 0x00]), Some(256));
        assert_eq!(be_unsigned(&[]), None);
        assert_eq!(be_signed(&[0xFF, 0xFE]), Some(-2));
        assert_eq!(be_signed(&[0x80]), Some(-128));
        assert_eq!(be_signed(&[0x7F, 0xFF]), Some(0x7FFF));
    }

    #[test]
    fn test_temperature() {
        let (name, value) = single(temperature(&[0x09, 0x39]));
        assert_eq!(name, "temperature");
        assert_relative_eq!(value.as_f64().unwrap(), 23.61);

        let (_, value) = single(temperature(&[0xFF, 0x38]));
        assert_relative_eq!(value.as_f64().unwrap(), -2.0);
    }

    #[test]
    fn test_humidity_and_pressure() {
        let (_, value) = single(humidity(&[0x11, 0x94]));
        assert_relative_eq!(value.as_f64().unwrap(), 45.0);

        let (_, value) = single(pressure(&[0x03, 0xF5]));
        assert_eq!(value, PropertyValue::Integer(1013));

        let (name, value) = single(detailed_pressure(&[0x27, 0x9A]));
        assert_eq!(name, "detailed_pressure");
        assert_relative_eq!(value.as_f64().unwrap(), 1013.8);

        let registry = AttributeRegistry::new();
        assert!(registry.contains(CLUSTER_PRESSURE, ATTR_SCALE));
        let scale = report(CLUSTER_PRESSURE, ATTR_SCALE, 0x28, &[0xFF]);
        assert!(registry.interpret(&scale).unwrap().is_empty());
    }

    #[test]
    fn test_battery() {
        let data = [0x01, 0x21, 0xD1, 0x0B, 0x03, 0x28];
        let (name, value) = single(xiaomi_battery(&data));
        assert_eq!(name, "battery");
        assert_relative_eq!(value.as_f64().unwrap(), 3.025);
        assert!(xiaomi_battery(&[0x01, 0x21]).is_empty());
    }

    #[test]
    fn test_on_off_and_clicks() {
        let readings = on_off(&[0x00]);
        assert_eq!(readings[0], Reading::new("on_off", false));
        assert_eq!(readings[1], Reading::new("state", "on-press"));
        assert_eq!(on_off(&[0x01])[1], Reading::new("state", "off-release"));

        let readings = multi_click(&[0x03]);
        assert_eq!(readings[0], Reading::new("clicks", 3u8));
        assert_eq!(readings[1], Reading::new("state", "multi_3"));
    }

    #[test]
    fn test_level() {
        let readings = current_level(&[0xFE]);
        assert_eq!(readings[0], Reading::new("level", 254u8));
        assert_relative_eq!(readings[1].value.as_f64().unwrap(), 100.0);
        let (name, _) = single(max_level(&[0xFF]));
        assert_eq!(name, "level_max");
    }

    #[test]
    fn test_cube() {
        let (_, value) = single(rotation(&1.5f32.to_be_bytes()));
        assert_relative_eq!(value.as_f64().unwrap(), 1.5);
        let (_, value) = single(rotation_announce(&[0x05, 0x00]));
        assert_eq!(value.as_str(), Some("0500"));

        let samples = [
            [0x00, 0x00],
            [0x02, 0x03],
            [0x01, 0x05],
            [0x00, 0x83],
            [0x00, 0x4A],
        ];
        let gestures: Vec<_> = samples
            .iter()
            .map(|data| single(gesture(data)).1.to_string())
            .collect();
        assert_eq!(
            gestures,
            ["shake", "tap3", "slide5", "rotation180", "rotation90_from1_to2"]
        );
        assert!(gesture(&[0x07, 0x00]).is_empty());
    }

    #[test]
    fn test_illuminance() {
        let (_, value) = single(illuminance(&[0x01, 0x2C]));
        assert_eq!(value, PropertyValue::Integer(300));
        assert!(illuminance_min(&[0xFF, 0xFF]).is_empty());
        assert!(illuminance_max(&[0xFF, 0xFF]).is_empty());
        let (name, value) = single(illuminance_max(&[0x03, 0xE8]));
        assert_eq!(name, "illuminance_max");
        assert_eq!(value, PropertyValue::Integer(1000));

        let sensors: Vec<_> = [0x00u8, 0x01, 0x20, 0x40, 0xFF]
            .iter()
            .map(|b| single(illuminance_sensor(&[*b])).1.to_string())
            .collect();
        assert_eq!(
            sensors,
            ["Photodiode", "CMOS", "Reserved", "Reserved for manufacturer", "Unknown"]
        );
    }

    #[test]
    fn test_occupancy_and_model() {
        assert_eq!(occupancy(&[0x01]), vec![Reading::new("event", "presence detected")]);
        assert!(occupancy(&[0x00]).is_empty());
        assert_eq!(
            model(b"lumi.sensor_ht\0"),
            vec![Reading::new("type", "lumi.sensor_ht")]
        );
    }

    #[test]
    fn test_coerce_by_type() {
        assert_eq!(coerce(0x00, &[]), Some(PropertyValue::Null));
        assert_eq!(coerce(0x10, &[0x01]), Some(PropertyValue::Bool(true)));
        assert_eq!(coerce(0x21, &[0x01, 0x00]), Some(PropertyValue::Integer(256)));
        assert_eq!(coerce(0x29, &[0xFF, 0x38]), Some(PropertyValue::Integer(-200)));
        assert_eq!(coerce(0x30, &[0x02]), Some(PropertyValue::Integer(2)));
        assert_eq!(coerce(0x42, b"abc"), Some(PropertyValue::from("abc")));
        assert_eq!(coerce(0x41, &[0x00, 0x01]), Some(PropertyValue::Bytes(vec![0x00, 0x01])));
        assert_eq!(coerce(0x42, &[0xFF, 0xFE]), Some(PropertyValue::Bytes(vec![0xFF, 0xFE])));
        assert_eq!(coerce(0x39, &2.0f32.to_be_bytes()), Some(PropertyValue::Float(2.0)));
        assert_eq!(coerce(0xFF, &[0x01]), None);
    }

    #[test]
    fn test_generic_readings() {
        let readings = generic_readings(&report(0x0B05, 0x011D, 0x20, &[0x2A]));
        assert_eq!(readings[0], Reading::new("0b05_011d_raw", vec![0x2Au8]));
        assert_eq!(readings[1], Reading::new("0b05_011d", 42u8));
        assert!(generic_readings(&report(0x0B05, 0x011D, 0xFF, &[0x2A])).is_empty());
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = AttributeRegistry::new();
        assert_eq!(registry.len(), BUILTIN.len());
        let sample = report(0x0B05, 0x0000, 0x20, &[0x01]);
        assert!(registry.interpret(&sample).is_none());

        fn custom(_: &[u8]) -> Vec<Reading> {
            vec![Reading::new("custom", true)]
        }
        assert!(registry.register(0x0B05, 0x0000, custom).is_none());
        let readings = registry.interpret(&sample).unwrap();
        assert_eq!(readings, vec![Reading::new("custom", true)]);
    }
}
