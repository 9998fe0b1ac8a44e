//! ZiGate Serial Protocol
//!
//! This crate provides the wire-level pieces needed to talk to a ZiGate Zigbee
//! coordinator over a serial line: byte stuffing, frame assembly, declarative
//! field schemas for every message the dongle sends, and builders for the
//! commands it accepts.
//!
//! # Protocol Overview
//!
//! Every message travels in a frame delimited by `0x01` and `0x03`. Inside the
//! delimiters the message type, body length, an XOR checksum and the body are
//! byte-stuffed so that no control byte appears literally:
//!
//! - **Commands** (host → dongle): message types below `0x8000`
//! - **Responses and reports** (dongle → host): message types `0x8000` and up,
//!   plus the device announce `0x004D`
//!
//! # Example
//!
//! ```rust,ignore
//! use zigate_protocol::{commands, FrameAssembler, Message};
//!
//! // Build a command
//! let bytes = commands::network::get_version().encode()?;
//!
//! // Decode what comes back
//! let mut assembler = FrameAssembler::new();
//! for frame in assembler.feed(&received_data) {
//!     let frame = frame?;
//!     let message = Message::decode(frame.msg_type, &frame.body);
//! }
//! ```

pub mod codec;
pub mod commands;
mod constants;
mod error;
mod frame;
mod responses;
mod schema;
mod types;

pub use commands::actions::OnOffCommand;
pub use commands::{Addressing, Command};
pub use constants::*;
pub use error::*;
pub use frame::*;
pub use responses::*;
pub use schema::*;
pub use types::*;
