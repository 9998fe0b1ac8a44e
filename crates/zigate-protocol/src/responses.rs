//! Messages received from the dongle.
//!
//! Each message type has a static [`Schema`] describing its body and a
//! decoder turning the resulting [`Record`] into a typed [`Message`]. The
//! pairs are listed in [`LAYOUTS`].

use crate::constants::*;
use crate::error::{ProtocolError, ProtocolResult};
use crate::schema::FieldKind::*;
use crate::schema::{field, Record, Schema};
use crate::types::*;

/// Attribute record shared by reports and read/write responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeReport {
    /// Sequence number; zero right after pairing.
    pub sequence: u8,
    /// Short address of the reporting device.
    pub short_addr: u16,
    /// Source endpoint.
    pub endpoint: u8,
    /// Cluster identifier.
    pub cluster: u16,
    /// Attribute identifier.
    pub attribute: u16,
    /// Attribute status.
    pub status: u8,
    /// Zigbee type tag of the data.
    pub attribute_type: u8,
    /// Attribute value bytes.
    pub data: Vec<u8>,
}

impl AttributeReport {
    /// Build from a record decoded with [`ATTRIBUTE_SCHEMA`].
    pub fn from_record(record: &Record) -> ProtocolResult<Self> {
        Ok(AttributeReport {
            sequence: record.u8("sequence")?,
            short_addr: record.u16("short_addr")?,
            endpoint: record.u8("endpoint")?,
            cluster: record.u16("cluster_id")?,
            attribute: record.u16("attribute_id")?,
            status: record.u8("attribute_status")?,
            attribute_type: record.u8("attribute_type")?,
            data: record.bytes("attribute_data")?.to_vec(),
        })
    }

    /// The data type, classified.
    pub fn zigbee_type(&self) -> ZigbeeType {
        ZigbeeType::from_tag(self.attribute_type)
    }
}

/// One entry of the device list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEntry {
    /// Index in the coordinator's table.
    pub id: u8,
    pub short_addr: u16,
    pub ieee: IeeeAddress,
    /// Non-zero when mains powered.
    pub power_source: u8,
    pub link_quality: u8,
}

impl DeviceEntry {
    fn from_record(record: &Record) -> ProtocolResult<Self> {
        Ok(DeviceEntry {
            id: record.u8("ID")?,
            short_addr: record.u16("addr")?,
            ieee: IeeeAddress::from_token(record.token("IEEE")?)?,
            power_source: record.u8("power_source")?,
            link_quality: record.u8("link_quality")?,
        })
    }
}

/// Node descriptor contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDescriptor {
    pub sequence: u8,
    pub status: u8,
    pub short_addr: u16,
    pub manufacturer_code: u16,
    pub max_rx: u16,
    pub max_tx: u16,
    pub server_mask: ServerMask,
    pub descriptor_capability: DescriptorCapability,
    pub mac_flags: MacCapability,
    pub max_buffer_size: u16,
    pub logical_type: LogicalType,
    pub complex_descriptor_available: bool,
    pub user_descriptor_available: bool,
    /// Frequency band bits (bits 11 to 15 of the descriptor bit field).
    pub frequency_band: u8,
}

/// Messages received from the dongle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A device joined the network.
    DeviceAnnounce {
        short_addr: u16,
        ieee: IeeeAddress,
        capability: MacCapability,
    },

    /// Status of the last command.
    Status {
        status: Status,
        sequence: u8,
        /// Message type of the command this answers.
        packet_type: u16,
        /// Additional bytes, including the trailing link quality byte.
        info: Vec<u8>,
    },

    /// Log message from the firmware.
    Log { level: LogLevel, info: Vec<u8> },

    /// Input clusters of an endpoint.
    ClusterList {
        endpoint: u8,
        profile: u16,
        clusters: Vec<u16>,
    },

    /// Attributes of a cluster.
    AttributeList {
        endpoint: u8,
        profile: u16,
        cluster: u16,
        attributes: Vec<u16>,
    },

    /// Commands of a cluster.
    CommandList {
        endpoint: u8,
        profile: u16,
        cluster: u16,
        commands: Vec<u8>,
    },

    /// Firmware version.
    Version { major: u16, installer: u16 },

    /// Whether joining is allowed.
    PermitJoinStatus { enabled: bool },

    /// Devices known to the coordinator.
    DeviceList(Vec<DeviceEntry>),

    NetworkAddressResponse {
        sequence: u8,
        status: u8,
        ieee: IeeeAddress,
        short_addr: u16,
    },

    IeeeAddressResponse {
        sequence: u8,
        status: u8,
        ieee: IeeeAddress,
        short_addr: u16,
        associated_devices: u8,
        start_index: u16,
        devices: Vec<u16>,
    },

    NodeDescriptor(NodeDescriptor),

    SimpleDescriptor {
        sequence: u8,
        status: u8,
        short_addr: u16,
        length: u8,
        endpoint: u8,
        profile: u16,
        device_id: u16,
        /// Device version and reserved bits.
        bit_field: u8,
        in_clusters: Vec<u16>,
        out_clusters: Vec<u16>,
    },

    PowerDescriptor {
        sequence: u8,
        status: u8,
        mode: PowerMode,
        available_sources: PowerSources,
        current_source: PowerSources,
        level: PowerLevel,
    },

    ActiveEndpoints {
        sequence: u8,
        status: u8,
        short_addr: u16,
        endpoints: Vec<u8>,
    },

    /// A device left the network.
    LeaveIndication {
        ieee: IeeeAddress,
        rejoin_status: u8,
    },

    DefaultResponse {
        sequence: u8,
        endpoint: u8,
        cluster: u16,
        command_id: u8,
        status: u8,
    },

    /// One discovered attribute; `complete` is set on the last one.
    AttributeDiscovery {
        complete: bool,
        attribute_type: u8,
        attribute_id: u16,
    },

    ZoneStatusChange {
        sequence: u8,
        endpoint: u8,
        cluster: u16,
        src_address_mode: u8,
        src_address: u16,
        zone_status: ZoneStatus,
        extended_status: u16,
        zone_id: u8,
        delays: Vec<u16>,
    },

    RouteDiscoveryConfirm {
        sequence: u8,
        status: u8,
        network_status: u8,
    },

    ApsDataConfirmFail {
        status: u8,
        src_endpoint: u8,
        dst_endpoint: u8,
        dst_address_mode: u8,
        dst_address: u64,
        sequence: u8,
    },

    /// Attribute report, read response or write response.
    Attribute(AttributeReport),
}

// ============================================================================
// Layouts
// ============================================================================

pub const DEVICE_ANNOUNCE_SCHEMA: Schema<'static> = Schema::new(&[
    field("short_addr", Bits(16)),
    field("mac_addr", Bits(64)),
    field("mac_capability", RawRest),
]);

pub const STATUS_SCHEMA: Schema<'static> = Schema::new(&[
    field("status", Int8),
    field("sequence", Bits(8)),
    field("packet_type", Bits(16)),
    field("info", RawRest),
]);

pub const LOG_SCHEMA: Schema<'static> =
    Schema::new(&[field("level", Int8), field("info", RawRest)]);

pub const CLUSTER_LIST_SCHEMA: Schema<'static> = Schema::new(&[
    field("endpoint", Bits(8)),
    field("profile", Bits(16)),
    field("cluster_count", Count(16)),
    field("cluster_list", List),
]);

pub const ATTRIBUTE_LIST_SCHEMA: Schema<'static> = Schema::new(&[
    field("endpoint", Bits(8)),
    field("profile", Bits(16)),
    field("cluster", Bits(16)),
    field("attr_count", Count(16)),
    field("attr_list", List),
]);

pub const COMMAND_LIST_SCHEMA: Schema<'static> = Schema::new(&[
    field("endpoint", Bits(8)),
    field("profile", Bits(16)),
    field("cluster", Bits(16)),
    field("cmd_count", Count(8)),
    field("cmd_list", List),
]);

pub const VERSION_SCHEMA: Schema<'static> =
    Schema::new(&[field("major", Int16), field("installer", Int16)]);

pub const PERMIT_JOIN_STATUS_SCHEMA: Schema<'static> = Schema::new(&[field("status", Bits(8))]);

/// One device list entry; 13 bytes per pass.
pub const DEVICE_LIST_SCHEMA: Schema<'static> = Schema::new(&[
    field("ID", Bits(8)),
    field("addr", Bits(16)),
    field("IEEE", Bits(64)),
    field("power_source", Int8),
    field("link_quality", Int8),
    field("next", Recursive),
]);

pub const NETWORK_ADDRESS_SCHEMA: Schema<'static> = Schema::new(&[
    field("sequence", Bits(8)),
    field("status", Bits(8)),
    field("IEEE_addr", Bits(64)),
    field("addr", Bits(16)),
]);

pub const IEEE_ADDRESS_SCHEMA: Schema<'static> = Schema::new(&[
    field("sequence", Bits(8)),
    field("status", Bits(8)),
    field("IEEE_addr", Bits(64)),
    field("addr", Bits(16)),
    field("associated_devices", Bits(8)),
    field("start_idx", Bits(16)),
    field("device_count", Count(16)),
    field("device_list", List),
]);

pub const NODE_DESCRIPTOR_SCHEMA: Schema<'static> = Schema::new(&[
    field("sequence", Bits(8)),
    field("status", Bits(8)),
    field("addr", Bits(16)),
    field("manufacturer_code", Bits(16)),
    field("max_rx", Bits(16)),
    field("max_tx", Bits(16)),
    field("server_mask", Bits(16)),
    field("descriptor_capability", Bits(8)),
    field("mac_flags", Bits(8)),
    field("max_buffer_size", Bits(16)),
    field("bit_field", Bits(16)),
]);

pub const SIMPLE_DESCRIPTOR_SCHEMA: Schema<'static> = Schema::new(&[
    field("sequence", Bits(8)),
    field("status", Bits(8)),
    field("addr", Bits(16)),
    field("length", Bits(8)),
    field("endpoint", Bits(8)),
    field("profile", Bits(16)),
    field("device_id", Bits(16)),
    field("bit", Bits(8)),
    field("in_cluster_count", Count(16)),
    field("in_cluster_list", List),
    field("out_cluster_count", Count(16)),
    field("out_cluster_list", List),
]);

pub const POWER_DESCRIPTOR_SCHEMA: Schema<'static> = Schema::new(&[
    field("sequence", Bits(8)),
    field("status", Bits(8)),
    field("bit_field", Bits(16)),
]);

pub const ACTIVE_ENDPOINTS_SCHEMA: Schema<'static> = Schema::new(&[
    field("sequence", Bits(8)),
    field("status", Bits(8)),
    field("addr", Bits(16)),
    field("endpoint_count", Count(8)),
    field("endpoint_list", List),
]);

pub const LEAVE_INDICATION_SCHEMA: Schema<'static> = Schema::new(&[
    field("extended_addr", Bits(64)),
    field("rejoin_status", Bits(8)),
]);

pub const DEFAULT_RESPONSE_SCHEMA: Schema<'static> = Schema::new(&[
    field("sequence", Bits(8)),
    field("endpoint", Bits(8)),
    field("cluster", Bits(16)),
    field("command_id", Bits(8)),
    field("status", Bits(8)),
]);

pub const ATTRIBUTE_DISCOVERY_SCHEMA: Schema<'static> = Schema::new(&[
    field("complete", Bits(8)),
    field("attr_type", Bits(8)),
    field("attr_id", Bits(16)),
]);

pub const ZONE_STATUS_CHANGE_SCHEMA: Schema<'static> = Schema::new(&[
    field("sequence", Bits(8)),
    field("endpoint", Bits(8)),
    field("cluster", Bits(16)),
    field("src_address_mode", Bits(8)),
    field("src_address", Bits(16)),
    field("zone_status", Bits(16)),
    field("extended_status", Bits(16)),
    field("zone_id", Bits(8)),
    field("delay_count", Count(16)),
    field("delay_list", List),
]);

pub const ROUTE_DISCOVERY_CONFIRM_SCHEMA: Schema<'static> = Schema::new(&[
    field("sequence", Bits(8)),
    field("status", Bits(8)),
    field("network_status", Bits(8)),
]);

pub const APS_DATA_CONFIRM_FAIL_SCHEMA: Schema<'static> = Schema::new(&[
    field("status", Bits(8)),
    field("src_endpoint", Bits(8)),
    field("dst_endpoint", Bits(8)),
    field("dst_address_mode", Bits(8)),
    field("dst_address", Bits(64)),
    field("sequence", Bits(8)),
]);

/// Attribute record layout, followed by whatever trails it.
pub const ATTRIBUTE_SCHEMA: Schema<'static> = Schema::new(&[
    field("sequence", Bits(8)),
    field("short_addr", Bits(16)),
    field("endpoint", Bits(8)),
    field("cluster_id", Bits(16)),
    field("attribute_id", Bits(16)),
    field("attribute_status", Bits(8)),
    field("attribute_type", Bits(8)),
    field("attribute_size", Length(2)),
    field("attribute_data", Raw),
    field("end", RawRest),
]);

/// A message type with its body layout and decoder.
#[derive(Clone, Copy)]
pub struct MessageLayout {
    pub msg_type: u16,
    pub name: &'static str,
    pub schema: Schema<'static>,
    pub decode: fn(&Record) -> ProtocolResult<Message>,
}

const fn layout(
    msg_type: u16,
    name: &'static str,
    schema: Schema<'static>,
    decode: fn(&Record) -> ProtocolResult<Message>,
) -> MessageLayout {
    MessageLayout {
        msg_type,
        name,
        schema,
        decode,
    }
}

/// Every message type the dongle is known to send.
pub const LAYOUTS: &[MessageLayout] = &[
    layout(
        MSG_DEVICE_ANNOUNCE,
        "Device announce",
        DEVICE_ANNOUNCE_SCHEMA,
        decode_device_announce,
    ),
    layout(MSG_STATUS, "Status", STATUS_SCHEMA, decode_status),
    layout(MSG_LOG, "Log message", LOG_SCHEMA, decode_log),
    layout(
        MSG_CLUSTER_LIST,
        "Cluster list",
        CLUSTER_LIST_SCHEMA,
        decode_cluster_list,
    ),
    layout(
        MSG_ATTRIBUTE_LIST,
        "Attribute list",
        ATTRIBUTE_LIST_SCHEMA,
        decode_attribute_list,
    ),
    layout(
        MSG_COMMAND_LIST,
        "Command list",
        COMMAND_LIST_SCHEMA,
        decode_command_list,
    ),
    layout(MSG_VERSION, "Version", VERSION_SCHEMA, decode_version),
    layout(
        MSG_PERMIT_JOIN_STATUS,
        "Permit join status",
        PERMIT_JOIN_STATUS_SCHEMA,
        decode_permit_join_status,
    ),
    layout(
        MSG_DEVICE_LIST,
        "Device list",
        DEVICE_LIST_SCHEMA,
        decode_device_list,
    ),
    layout(
        MSG_NETWORK_ADDRESS,
        "Network address",
        NETWORK_ADDRESS_SCHEMA,
        decode_network_address,
    ),
    layout(
        MSG_IEEE_ADDRESS,
        "IEEE address",
        IEEE_ADDRESS_SCHEMA,
        decode_ieee_address,
    ),
    layout(
        MSG_NODE_DESCRIPTOR,
        "Node descriptor",
        NODE_DESCRIPTOR_SCHEMA,
        decode_node_descriptor,
    ),
    layout(
        MSG_SIMPLE_DESCRIPTOR,
        "Simple descriptor",
        SIMPLE_DESCRIPTOR_SCHEMA,
        decode_simple_descriptor,
    ),
    layout(
        MSG_POWER_DESCRIPTOR,
        "Power descriptor",
        POWER_DESCRIPTOR_SCHEMA,
        decode_power_descriptor,
    ),
    layout(
        MSG_ACTIVE_ENDPOINTS,
        "Active endpoints",
        ACTIVE_ENDPOINTS_SCHEMA,
        decode_active_endpoints,
    ),
    layout(
        MSG_LEAVE_INDICATION,
        "Leave indication",
        LEAVE_INDICATION_SCHEMA,
        decode_leave_indication,
    ),
    layout(
        MSG_ATTRIBUTE_REPORT,
        "Attribute report",
        ATTRIBUTE_SCHEMA,
        decode_attribute,
    ),
    layout(
        MSG_DEFAULT_RESPONSE,
        "Default response",
        DEFAULT_RESPONSE_SCHEMA,
        decode_default_response,
    ),
    layout(
        MSG_READ_ATTRIBUTE_RESPONSE,
        "Read attribute response",
        ATTRIBUTE_SCHEMA,
        decode_attribute,
    ),
    layout(
        MSG_WRITE_ATTRIBUTE_RESPONSE,
        "Write attribute response",
        ATTRIBUTE_SCHEMA,
        decode_attribute,
    ),
    layout(
        MSG_ATTRIBUTE_DISCOVERY,
        "Attribute discovery",
        ATTRIBUTE_DISCOVERY_SCHEMA,
        decode_attribute_discovery,
    ),
    layout(
        MSG_ZONE_STATUS_CHANGE,
        "Zone status change",
        ZONE_STATUS_CHANGE_SCHEMA,
        decode_zone_status_change,
    ),
    layout(
        MSG_ROUTE_DISCOVERY_CONFIRM,
        "Route discovery confirm",
        ROUTE_DISCOVERY_CONFIRM_SCHEMA,
        decode_route_discovery_confirm,
    ),
    layout(
        MSG_APS_DATA_CONFIRM_FAIL,
        "APS data confirm fail",
        APS_DATA_CONFIRM_FAIL_SCHEMA,
        decode_aps_data_confirm_fail,
    ),
];

impl MessageLayout {
    /// Find the layout of a message type.
    pub fn find(msg_type: u16) -> Option<&'static MessageLayout> {
        LAYOUTS.iter().find(|layout| layout.msg_type == msg_type)
    }

    /// Decode a body with this layout.
    pub fn decode_body(&self, body: &[u8]) -> ProtocolResult<Message> {
        let record = self.schema.decode(body)?;
        (self.decode)(&record)
    }

    /// Signal strength byte of `body`, if the body has one past the fixed
    /// fields of this layout.
    pub fn rssi(&self, body: &[u8]) -> Option<u8> {
        if body.len() > self.schema.min_len() {
            body.last().copied()
        } else {
            None
        }
    }
}

impl Message {
    /// Decode a body of the given type. Returns `None` for unknown types.
    pub fn decode(msg_type: u16, body: &[u8]) -> Option<ProtocolResult<Message>> {
        MessageLayout::find(msg_type).map(|layout| layout.decode_body(body))
    }
}

// ============================================================================
// Decoders
// ============================================================================

fn list_u16(record: &Record, name: &'static str) -> ProtocolResult<Vec<u16>> {
    record
        .list(name)?
        .iter()
        .map(|item| {
            u16::from_str_radix(item, 16).map_err(|_| {
                ProtocolError::invalid_data(format!("{name}: '{item}' is not a 16-bit value"))
            })
        })
        .collect()
}

fn list_u8(record: &Record, name: &'static str) -> ProtocolResult<Vec<u8>> {
    record
        .list(name)?
        .iter()
        .map(|item| {
            u8::from_str_radix(item, 16).map_err(|_| {
                ProtocolError::invalid_data(format!("{name}: '{item}' is not an 8-bit value"))
            })
        })
        .collect()
}

fn decode_device_announce(record: &Record) -> ProtocolResult<Message> {
    let capability = record
        .bytes("mac_capability")?
        .first()
        .copied()
        .unwrap_or_default();
    Ok(Message::DeviceAnnounce {
        short_addr: record.u16("short_addr")?,
        ieee: IeeeAddress::from_token(record.token("mac_addr")?)?,
        capability: MacCapability::from_bits_truncate(capability),
    })
}

fn decode_status(record: &Record) -> ProtocolResult<Message> {
    Ok(Message::Status {
        status: Status::from(record.u8("status")?),
        sequence: record.u8("sequence")?,
        packet_type: record.u16("packet_type")?,
        info: record.bytes("info")?.to_vec(),
    })
}

fn decode_log(record: &Record) -> ProtocolResult<Message> {
    Ok(Message::Log {
        level: LogLevel::from(record.u8("level")?),
        info: record.bytes("info")?.to_vec(),
    })
}

fn decode_cluster_list(record: &Record) -> ProtocolResult<Message> {
    Ok(Message::ClusterList {
        endpoint: record.u8("endpoint")?,
        profile: record.u16("profile")?,
        clusters: list_u16(record, "cluster_list")?,
    })
}

fn decode_attribute_list(record: &Record) -> ProtocolResult<Message> {
    Ok(Message::AttributeList {
        endpoint: record.u8("endpoint")?,
        profile: record.u16("profile")?,
        cluster: record.u16("cluster")?,
        attributes: list_u16(record, "attr_list")?,
    })
}

fn decode_command_list(record: &Record) -> ProtocolResult<Message> {
    Ok(Message::CommandList {
        endpoint: record.u8("endpoint")?,
        profile: record.u16("profile")?,
        cluster: record.u16("cluster")?,
        commands: list_u8(record, "cmd_list")?,
    })
}

fn decode_version(record: &Record) -> ProtocolResult<Message> {
    Ok(Message::Version {
        major: record.u16("major")?,
        installer: record.u16("installer")?,
    })
}

fn decode_permit_join_status(record: &Record) -> ProtocolResult<Message> {
    Ok(Message::PermitJoinStatus {
        enabled: record.u8("status")? != 0,
    })
}

fn decode_device_list(record: &Record) -> ProtocolResult<Message> {
    if record.is_empty() {
        return Ok(Message::DeviceList(Vec::new()));
    }
    let mut entries = vec![DeviceEntry::from_record(record)?];
    for next in record.records("next")? {
        entries.push(DeviceEntry::from_record(next)?);
    }
    Ok(Message::DeviceList(entries))
}

fn decode_network_address(record: &Record) -> ProtocolResult<Message> {
    Ok(Message::NetworkAddressResponse {
        sequence: record.u8("sequence")?,
        status: record.u8("status")?,
        ieee: IeeeAddress::from_token(record.token("IEEE_addr")?)?,
        short_addr: record.u16("addr")?,
    })
}

fn decode_ieee_address(record: &Record) -> ProtocolResult<Message> {
    Ok(Message::IeeeAddressResponse {
        sequence: record.u8("sequence")?,
        status: record.u8("status")?,
        ieee: IeeeAddress::from_token(record.token("IEEE_addr")?)?,
        short_addr: record.u16("addr")?,
        associated_devices: record.u8("associated_devices")?,
        start_index: record.u16("start_idx")?,
        devices: list_u16(record, "device_list")?,
    })
}

fn decode_node_descriptor(record: &Record) -> ProtocolResult<Message> {
    let bit_field = record.u16("bit_field")?;
    Ok(Message::NodeDescriptor(NodeDescriptor {
        sequence: record.u8("sequence")?,
        status: record.u8("status")?,
        short_addr: record.u16("addr")?,
        manufacturer_code: record.u16("manufacturer_code")?,
        max_rx: record.u16("max_rx")?,
        max_tx: record.u16("max_tx")?,
        server_mask: ServerMask::from_bits_truncate(record.u16("server_mask")?),
        descriptor_capability: DescriptorCapability::from_bits_truncate(
            record.u8("descriptor_capability")?,
        ),
        mac_flags: MacCapability::from_bits_truncate(record.u8("mac_flags")?),
        max_buffer_size: record.u16("max_buffer_size")?,
        logical_type: LogicalType::from((bit_field & 0x0007) as u8),
        complex_descriptor_available: bit_field & 0x0008 != 0,
        user_descriptor_available: bit_field & 0x0010 != 0,
        frequency_band: (bit_field >> 11) as u8,
    }))
}

fn decode_simple_descriptor(record: &Record) -> ProtocolResult<Message> {
    Ok(Message::SimpleDescriptor {
        sequence: record.u8("sequence")?,
        status: record.u8("status")?,
        short_addr: record.u16("addr")?,
        length: record.u8("length")?,
        endpoint: record.u8("endpoint")?,
        profile: record.u16("profile")?,
        device_id: record.u16("device_id")?,
        bit_field: record.u8("bit")?,
        in_clusters: list_u16(record, "in_cluster_list")?,
        out_clusters: list_u16(record, "out_cluster_list")?,
    })
}

fn decode_power_descriptor(record: &Record) -> ProtocolResult<Message> {
    let bits = record.u16("bit_field")?;
    Ok(Message::PowerDescriptor {
        sequence: record.u8("sequence")?,
        status: record.u8("status")?,
        mode: PowerMode::from((bits & 0x000F) as u8),
        available_sources: PowerSources::from_bits_truncate(((bits >> 4) & 0x0F) as u8),
        current_source: PowerSources::from_bits_truncate(((bits >> 8) & 0x0F) as u8),
        level: PowerLevel::from((bits >> 12) as u8),
    })
}

fn decode_active_endpoints(record: &Record) -> ProtocolResult<Message> {
    Ok(Message::ActiveEndpoints {
        sequence: record.u8("sequence")?,
        status: record.u8("status")?,
        short_addr: record.u16("addr")?,
        endpoints: list_u8(record, "endpoint_list")?,
    })
}

fn decode_leave_indication(record: &Record) -> ProtocolResult<Message> {
    Ok(Message::LeaveIndication {
        ieee: IeeeAddress::from_token(record.token("extended_addr")?)?,
        rejoin_status: record.u8("rejoin_status")?,
    })
}

fn decode_default_response(record: &Record) -> ProtocolResult<Message> {
    Ok(Message::DefaultResponse {
        sequence: record.u8("sequence")?,
        endpoint: record.u8("endpoint")?,
        cluster: record.u16("cluster")?,
        command_id: record.u8("command_id")?,
        status: record.u8("status")?,
    })
}

fn decode_attribute_discovery(record: &Record) -> ProtocolResult<Message> {
    Ok(Message::AttributeDiscovery {
        complete: record.u8("complete")? != 0,
        attribute_type: record.u8("attr_type")?,
        attribute_id: record.u16("attr_id")?,
    })
}

fn decode_zone_status_change(record: &Record) -> ProtocolResult<Message> {
    Ok(Message::ZoneStatusChange {
        sequence: record.u8("sequence")?,
        endpoint: record.u8("endpoint")?,
        cluster: record.u16("cluster")?,
        src_address_mode: record.u8("src_address_mode")?,
        src_address: record.u16("src_address")?,
        zone_status: ZoneStatus::from_bits_truncate(record.u16("zone_status")?),
        extended_status: record.u16("extended_status")?,
        zone_id: record.u8("zone_id")?,
        delays: list_u16(record, "delay_list")?,
    })
}

fn decode_route_discovery_confirm(record: &Record) -> ProtocolResult<Message> {
    Ok(Message::RouteDiscoveryConfirm {
        sequence: record.u8("sequence")?,
        status: record.u8("status")?,
        network_status: record.u8("network_status")?,
    })
}

fn decode_aps_data_confirm_fail(record: &Record) -> ProtocolResult<Message> {
    Ok(Message::ApsDataConfirmFail {
        status: record.u8("status")?,
        src_endpoint: record.u8("src_endpoint")?,
        dst_endpoint: record.u8("dst_endpoint")?,
        dst_address_mode: record.u8("dst_address_mode")?,
        dst_address: record.uint("dst_address")?,
        sequence: record.u8("sequence")?,
    })
}

fn decode_attribute(record: &Record) -> ProtocolResult<Message> {
    AttributeReport::from_record(record).map(Message::Attribute)
}
