//! Protocol constants
//!
//! Message type codes, command codes and the Zigbee cluster and attribute
//! identifiers the decoders know about.

// ============================================================================
// Message Types (dongle → host)
// ============================================================================

/// A device joined or rejoined the network.
pub const MSG_DEVICE_ANNOUNCE: u16 = 0x004D;
/// Status of the last command.
pub const MSG_STATUS: u16 = 0x8000;
/// Log line from the dongle firmware.
pub const MSG_LOG: u16 = 0x8001;
/// Clusters of an endpoint.
pub const MSG_CLUSTER_LIST: u16 = 0x8003;
/// Attributes of a cluster.
pub const MSG_ATTRIBUTE_LIST: u16 = 0x8004;
/// Commands of a cluster.
pub const MSG_COMMAND_LIST: u16 = 0x8005;
/// Firmware version.
pub const MSG_VERSION: u16 = 0x8010;
/// Whether the network is accepting new devices.
pub const MSG_PERMIT_JOIN_STATUS: u16 = 0x8014;
/// Devices known to the coordinator.
pub const MSG_DEVICE_LIST: u16 = 0x8015;
/// Network address response.
pub const MSG_NETWORK_ADDRESS: u16 = 0x8040;
/// IEEE address response.
pub const MSG_IEEE_ADDRESS: u16 = 0x8041;
/// Node descriptor response.
pub const MSG_NODE_DESCRIPTOR: u16 = 0x8042;
/// Simple descriptor response.
pub const MSG_SIMPLE_DESCRIPTOR: u16 = 0x8043;
/// Power descriptor response.
pub const MSG_POWER_DESCRIPTOR: u16 = 0x8044;
/// Active endpoints response.
pub const MSG_ACTIVE_ENDPOINTS: u16 = 0x8045;
/// A device left the network.
pub const MSG_LEAVE_INDICATION: u16 = 0x8048;
/// Default response to a cluster command.
pub const MSG_DEFAULT_RESPONSE: u16 = 0x8101;
/// Attribute report sent by a device.
pub const MSG_ATTRIBUTE_REPORT: u16 = 0x8100;
/// Response to a read attribute request.
pub const MSG_READ_ATTRIBUTE_RESPONSE: u16 = 0x8102;
/// Response to a write attribute request.
pub const MSG_WRITE_ATTRIBUTE_RESPONSE: u16 = 0x8110;
/// One attribute found by a discovery request.
pub const MSG_ATTRIBUTE_DISCOVERY: u16 = 0x8140;
/// IAS zone status change.
pub const MSG_ZONE_STATUS_CHANGE: u16 = 0x8401;
/// Route discovery confirmation.
pub const MSG_ROUTE_DISCOVERY_CONFIRM: u16 = 0x8701;
/// APS data confirm failure.
pub const MSG_APS_DATA_CONFIRM_FAIL: u16 = 0x8702;

/// Message types whose body carries an attribute record.
pub const ATTRIBUTE_MESSAGES: [u16; 3] = [
    MSG_ATTRIBUTE_REPORT,
    MSG_READ_ATTRIBUTE_RESPONSE,
    MSG_WRITE_ATTRIBUTE_RESPONSE,
];

// ============================================================================
// Command Codes (host → dongle)
// ============================================================================

pub const CMD_NETWORK_STATE: u16 = 0x0009;
pub const CMD_GET_VERSION: u16 = 0x0010;
pub const CMD_RESET: u16 = 0x0011;
pub const CMD_ERASE_PERSISTENT_DATA: u16 = 0x0012;
pub const CMD_FACTORY_RESET: u16 = 0x0013;
pub const CMD_PERMIT_JOIN_STATUS: u16 = 0x0014;
pub const CMD_LIST_DEVICES: u16 = 0x0015;
pub const CMD_NETWORK_ADDRESS: u16 = 0x0040;
pub const CMD_IEEE_ADDRESS: u16 = 0x0041;
pub const CMD_NODE_DESCRIPTOR: u16 = 0x0042;
pub const CMD_SIMPLE_DESCRIPTOR: u16 = 0x0043;
pub const CMD_POWER_DESCRIPTOR: u16 = 0x0044;
pub const CMD_ACTIVE_ENDPOINTS: u16 = 0x0045;
pub const CMD_PERMIT_JOIN: u16 = 0x0049;
pub const CMD_IDENTIFY: u16 = 0x0070;
pub const CMD_IDENTIFY_STOP: u16 = 0x0071;
pub const CMD_MOVE_TO_LEVEL: u16 = 0x0081;
pub const CMD_MOVE_STEP: u16 = 0x0082;
pub const CMD_STOP_MOVE: u16 = 0x0083;
pub const CMD_STOP_MOVE_WITH_ON_OFF: u16 = 0x0084;
pub const CMD_ON_OFF: u16 = 0x0092;
pub const CMD_READ_ATTRIBUTE: u16 = 0x0100;
pub const CMD_DISCOVER_ATTRIBUTES: u16 = 0x0140;

/// Short address meaning "every router and the coordinator".
pub const BROADCAST_ROUTERS: u16 = 0xFFFC;

// ============================================================================
// Clusters
// ============================================================================

pub const CLUSTER_BASIC: u16 = 0x0000;
pub const CLUSTER_POWER_CONFIG: u16 = 0x0001;
pub const CLUSTER_ON_OFF: u16 = 0x0006;
pub const CLUSTER_LEVEL_CONTROL: u16 = 0x0008;
pub const CLUSTER_ANALOG_INPUT: u16 = 0x000C;
pub const CLUSTER_MULTISTATE_INPUT: u16 = 0x0012;
pub const CLUSTER_ILLUMINANCE: u16 = 0x0400;
pub const CLUSTER_TEMPERATURE: u16 = 0x0402;
pub const CLUSTER_PRESSURE: u16 = 0x0403;
pub const CLUSTER_HUMIDITY: u16 = 0x0405;
pub const CLUSTER_OCCUPANCY: u16 = 0x0406;
pub const CLUSTER_IAS_ZONE: u16 = 0x0500;

/// Human readable name of a cluster, `"unknown"` if not listed.
pub fn cluster_name(cluster: u16) -> &'static str {
    match cluster {
        0x0000 => "General: Basic",
        0x0001 => "General: Power Config",
        0x0002 => "General: Temperature Config",
        0x0003 => "General: Identify",
        0x0004 => "General: Groups",
        0x0005 => "General: Scenes",
        0x0006 => "General: On/Off",
        0x0007 => "General: On/Off Config",
        0x0008 => "General: Level Control",
        0x0009 => "General: Alarms",
        0x000A => "General: Time",
        0x000C => "General: Analog Input",
        0x000F => "General: Binary Input Basic",
        0x0012 => "General: Multistate Input",
        0x0019 => "General: OTA",
        0x0020 => "General: Poll Control",
        0x0101 => "General: Door Lock",
        0x0201 => "HVAC: Thermostat",
        0x0202 => "HVAC: Fan Control",
        0x0300 => "Lighting: Color Control",
        0x0400 => "Measurement: Illuminance",
        0x0402 => "Measurement: Temperature",
        0x0403 => "Measurement: Atmospheric Pressure",
        0x0405 => "Measurement: Humidity",
        0x0406 => "Measurement: Occupancy Sensing",
        0x0500 => "Security & Safety: IAS Zone",
        0x0702 => "Smart Energy: Metering",
        0x0B05 => "Misc: Diagnostics",
        0x1000 => "ZLL: Commissioning",
        0xFF01 | 0xFF02 => "Xiaomi private",
        _ => "unknown",
    }
}

// ============================================================================
// Attributes
// ============================================================================

pub const ATTR_BASIC_MODEL: u16 = 0x0005;
pub const ATTR_BASIC_XIAOMI_INFO: u16 = 0xFF01;
pub const ATTR_ON_OFF: u16 = 0x0000;
pub const ATTR_MULTI_CLICK: u16 = 0x8000;
pub const ATTR_CURRENT_LEVEL: u16 = 0x0000;
pub const ATTR_MAX_LEVEL: u16 = 0x0011;
pub const ATTR_PRESENT_VALUE: u16 = 0x0055;
pub const ATTR_ROTATION_ANNOUNCE: u16 = 0xFF05;
pub const ATTR_MEASURED_VALUE: u16 = 0x0000;
pub const ATTR_MIN_MEASURED_VALUE: u16 = 0x0001;
pub const ATTR_MAX_MEASURED_VALUE: u16 = 0x0002;
pub const ATTR_TOLERANCE: u16 = 0x0003;
pub const ATTR_LIGHT_SENSOR_TYPE: u16 = 0x0004;
pub const ATTR_SCALED_VALUE: u16 = 0x0010;
pub const ATTR_SCALE: u16 = 0x0014;
pub const ATTR_OCCUPANCY: u16 = 0x0000;
