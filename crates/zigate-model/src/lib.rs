//! ZiGate device model
//!
//! Turns the frames of a ZiGate connection into events and per-device
//! state. A [`Session`] feeds raw serial bytes through the protocol crate's
//! frame assembler, dispatches each frame through a [`MessageRegistry`],
//! interprets attribute reports with an [`AttributeRegistry`] and records
//! the results in a [`DeviceStore`].
//!
//! # Example
//!
//! ```rust,ignore
//! use zigate_model::{Event, Session, SessionConfig};
//!
//! let mut session = Session::new(SessionConfig::from_yaml_str("name: usb0")?)?;
//! for event in session.feed(&bytes_from_serial) {
//!     if let Ok(Event::Attribute(report)) = event {
//!         println!("{} {:?}", report.key, report.readings);
//!     }
//! }
//! let snapshot = session.devices().snapshot();
//! ```

mod config;
mod error;
pub mod properties;
pub mod registry;
mod session;
mod store;

pub use config::SessionConfig;
pub use error::{ModelError, ModelResult};
pub use properties::{FromPropertyValue, PropertyValue};
pub use registry::{AttributeRegistry, MessageRegistry, Reading};
pub use session::{AttributeEvent, Event, Session, MAC};
pub use store::{DeviceKey, DeviceState, DeviceStore, LAST_SEEN};
