//! Per-connection decoding context.
//!
//! A [`Session`] owns one frame assembler and one device store. Raw bytes go
//! in through [`Session::feed`]; decoded [`Event`]s come out, and attribute
//! reports are folded into the store on the way.

use chrono::{DateTime, Utc};
use tracing::{debug, debug_span, info, warn};
use zigate_metrics::{metric_defs, MetricLabels};
use zigate_protocol::{
    AttributeReport, Command, Frame, FrameAssembler, Message, ProtocolError, ProtocolResult,
    ATTRIBUTE_MESSAGES, HEADER_LEN,
};

use crate::config::SessionConfig;
use crate::error::ModelResult;
use crate::properties::PropertyValue;
use crate::registry::{coerce, generic_readings, AttributeRegistry, MessageRegistry, Reading};
use crate::store::{DeviceKey, DeviceStore};

/// Property holding the IEEE address announced by a device.
pub const MAC: &str = "mac";

/// An attribute report after interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeEvent {
    /// 0x8100, 0x8102 or 0x8110.
    pub msg_type: u16,
    pub key: DeviceKey,
    pub cluster: u16,
    pub attribute: u16,
    pub attribute_type: u8,
    /// Data coerced by type tag; `None` for the unknown type.
    pub value: Option<PropertyValue>,
    /// Properties produced by the cluster interpreter.
    pub readings: Vec<Reading>,
    pub raw: Vec<u8>,
}

/// Outcome of one valid frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A message with a registered layout.
    Message { msg_type: u16, message: Message },
    /// An attribute report, read response or write response.
    Attribute(AttributeEvent),
    /// A message type with no registered layout.
    Unknown {
        msg_type: u16,
        header: [u8; HEADER_LEN],
        body: Vec<u8>,
    },
}

/// Decoding state of one dongle connection.
pub struct Session {
    config: SessionConfig,
    assembler: FrameAssembler,
    store: DeviceStore,
    messages: MessageRegistry,
    attributes: AttributeRegistry,
    labels: MetricLabels,
}

impl Session {
    /// Create a session with the built-in registries.
    pub fn new(config: SessionConfig) -> ModelResult<Self> {
        Self::with_registries(config, MessageRegistry::new(), AttributeRegistry::new())
    }

    /// Create a session with caller-supplied registries.
    pub fn with_registries(
        config: SessionConfig,
        messages: MessageRegistry,
        attributes: AttributeRegistry,
    ) -> ModelResult<Self> {
        config.validate()?;
        Ok(Self {
            assembler: FrameAssembler::with_max_pending(config.max_pending_bytes),
            store: DeviceStore::new(),
            labels: MetricLabels::new(config.name.clone()),
            messages,
            attributes,
            config,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Devices seen so far.
    pub fn devices(&self) -> &DeviceStore {
        &self.store
    }

    /// Bytes buffered while waiting for an end marker.
    pub fn pending_bytes(&self) -> usize {
        self.assembler.buffered_len()
    }

    /// Consume received bytes and return one result per completed frame.
    pub fn feed(&mut self, data: &[u8]) -> Vec<Result<Event, ProtocolError>> {
        self.feed_at(data, Utc::now())
    }

    /// Like [`Session::feed`], stamping attribute reports with `now`.
    pub fn feed_at(
        &mut self,
        data: &[u8],
        now: DateTime<Utc>,
    ) -> Vec<Result<Event, ProtocolError>> {
        let _span = debug_span!("session", connection = %self.config.name).entered();

        let discarded_before = self.assembler.discarded_bytes();
        let frames = self.assembler.feed(data);
        let discarded = self.assembler.discarded_bytes() - discarded_before;
        if discarded > 0 {
            metrics::counter!(
                metric_defs::ASSEMBLER_DISCARDED_BYTES.name,
                &self.labels.to_labels()
            )
            .increment(discarded);
        }

        let mut events = Vec::with_capacity(frames.len());
        for frame in frames {
            match frame {
                Ok(frame) => {
                    metrics::counter!(metric_defs::FRAMES_RECEIVED.name, &self.labels.to_labels())
                        .increment(1);
                    events.push(self.handle_frame(frame, now));
                }
                Err(e) => {
                    let labels = self.labels.with(&[("reason", e.kind().to_string())]);
                    metrics::counter!(metric_defs::FRAMES_REJECTED.name, &labels).increment(1);
                    events.push(Err(e));
                }
            }
        }
        events
    }

    /// Dispatch one valid frame. A decode error leaves the store untouched.
    pub fn handle_frame(&mut self, frame: Frame, now: DateTime<Utc>) -> ProtocolResult<Event> {
        let Some(layout) = self.messages.get(frame.msg_type) else {
            debug!(
                msg_type = format_args!("{:04X}", frame.msg_type),
                "unknown message type"
            );
            metrics::counter!(metric_defs::MESSAGES_UNKNOWN.name, &self.labels.to_labels())
                .increment(1);
            let [t0, t1] = frame.msg_type.to_be_bytes();
            let [l0, l1] = frame.length.to_be_bytes();
            return Ok(Event::Unknown {
                msg_type: frame.msg_type,
                header: [t0, t1, l0, l1, frame.checksum],
                body: frame.body,
            });
        };

        let message = match layout.decode_body(&frame.body) {
            Ok(message) => message,
            Err(e) => {
                warn!(
                    msg_type = format_args!("{:04X}", frame.msg_type),
                    name = layout.name,
                    error = %e,
                    "message decode failed"
                );
                let labels = self
                    .labels
                    .with(&[("msg_type", format!("{:04x}", frame.msg_type))]);
                metrics::counter!(metric_defs::DECODE_ERRORS.name, &labels).increment(1);
                return Err(e);
            }
        };
        debug!(
            msg_type = format_args!("{:04X}", frame.msg_type),
            name = layout.name,
            rssi = layout.rssi(&frame.body),
            "message decoded"
        );

        match message {
            Message::Attribute(report) if ATTRIBUTE_MESSAGES.contains(&frame.msg_type) => {
                Ok(Event::Attribute(self.apply_attribute(frame.msg_type, report, now)))
            }
            message => {
                if let Message::DeviceAnnounce {
                    short_addr, ieee, ..
                } = &message
                {
                    info!(
                        short_addr = format_args!("{:04x}", short_addr),
                        ieee = %ieee,
                        "device announced"
                    );
                    let created = self
                        .store
                        .set_property(DeviceKey::device(*short_addr), MAC, ieee.to_string());
                    self.device_added(created);
                }
                Ok(Event::Message {
                    msg_type: frame.msg_type,
                    message,
                })
            }
        }
    }

    fn apply_attribute(
        &mut self,
        msg_type: u16,
        report: AttributeReport,
        now: DateTime<Utc>,
    ) -> AttributeEvent {
        let key = DeviceKey::endpoint(report.short_addr, report.endpoint);
        let labels = self
            .labels
            .with(&[("cluster", format!("{:04x}", report.cluster))]);
        metrics::counter!(metric_defs::ATTRIBUTE_REPORTS.name, &labels).increment(1);

        let mut created = self.store.touch(key, now);

        let readings = match self.attributes.interpret(&report) {
            Some(readings) => readings,
            None => {
                debug!(
                    device = %key,
                    cluster = format_args!("{:04x}", report.cluster),
                    attribute = format_args!("{:04x}", report.attribute),
                    attribute_type = format_args!("{:02x}", report.attribute_type),
                    "no interpreter, recording by type"
                );
                Vec::new()
            }
        };
        for reading in &readings {
            info!(
                device = %key,
                property = %reading.property,
                value = %reading.value,
                "attribute"
            );
            created |= self
                .store
                .set_property(key, reading.property.clone(), reading.value.clone());
        }

        if self.config.record_generic_attributes {
            for reading in generic_readings(&report) {
                created |= self.store.set_property(key, reading.property, reading.value);
            }
        }
        self.device_added(created);

        AttributeEvent {
            msg_type,
            key,
            cluster: report.cluster,
            attribute: report.attribute,
            attribute_type: report.attribute_type,
            value: coerce(report.attribute_type, &report.data),
            readings,
            raw: report.data,
        }
    }

    fn device_added(&self, created: bool) {
        if created {
            metrics::gauge!(metric_defs::DEVICES_KNOWN.name, &self.labels.to_labels())
                .set(self.store.len() as f64);
        }
    }

    /// Encode a command for the transport. A payload too long for one frame
    /// fails with [`ModelError::Protocol`](crate::ModelError::Protocol).
    pub fn command_frame(&self, command: &Command) -> ModelResult<Vec<u8>> {
        let bytes = command.encode()?;
        debug!(
            connection = %self.config.name,
            msg_type = format_args!("{:04X}", command.msg_type),
            encoded = %hex::encode(&bytes),
            "command encoded"
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use zigate_protocol::{
        build_command, commands, MAX_BODY_LEN, MSG_DEVICE_ANNOUNCE, MSG_VERSION,
    };

    fn session() -> Session {
        Session::new(SessionConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SessionConfig {
            address_mode: 9,
            ..SessionConfig::default()
        };
        assert!(Session::new(config).is_err());
    }

    #[test]
    fn test_device_announce_records_mac() {
        let mut session = session();
        let body = [
            0xAB, 0xCD, 0x00, 0x15, 0x8D, 0x00, 0x01, 0xA2, 0xB3, 0xC4, 0x8E, 0xB0,
        ];
        let events = session.feed(&build_command(MSG_DEVICE_ANNOUNCE, &body).unwrap());
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            Ok(Event::Message {
                msg_type: MSG_DEVICE_ANNOUNCE,
                ..
            })
        ));
        assert_eq!(
            session.devices().property(&DeviceKey::device(0xABCD), MAC),
            Some(&PropertyValue::from("00158d0001a2b3c4"))
        );
    }

    #[test]
    fn test_unknown_message_carries_header() {
        let mut session = session();
        let events = session.feed(&build_command(0x8999, &[0x42]).unwrap());
        let Ok(Event::Unknown {
            msg_type,
            header,
            body,
        }) = &events[0]
        else {
            panic!("expected an unknown message, got {:?}", events[0]);
        };
        assert_eq!(*msg_type, 0x8999);
        assert_eq!(header[..4], [0x89, 0x99, 0x00, 0x01]);
        assert_eq!(body, &vec![0x42]);
        assert!(session.devices().is_empty());
    }

    #[test]
    fn test_decode_error_leaves_store_untouched() {
        let mut session = session();
        // attribute_size claims four bytes, two follow
        let body = [
            0x01, 0x12, 0x34, 0x01, 0x04, 0x02, 0x00, 0x00, 0x00, 0x29, 0x00, 0x04, 0x09, 0x29,
        ];
        let events = session.feed(&build_command(0x8100, &body).unwrap());
        assert!(matches!(events[0], Err(ProtocolError::Truncated { .. })));
        assert!(session.devices().is_empty());

        let version = build_command(MSG_VERSION, &[0x00, 0x03, 0x03, 0x1D, 0xB0]).unwrap();
        let events = session.feed(&version);
        assert!(events[0].is_ok());
    }

    #[test]
    fn test_command_frame() {
        let session = session();
        let bytes = session
            .command_frame(&commands::network::get_version())
            .unwrap();
        assert_eq!(bytes, build_command(0x0010, &[]).unwrap());

        let oversized = Command::new(0x0530, vec![0; MAX_BODY_LEN + 1]);
        assert!(matches!(
            session.command_frame(&oversized),
            Err(ModelError::Protocol(_))
        ));
    }
}
