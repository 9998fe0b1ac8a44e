//! Dispatch tables built once per session.
//!
//! [`MessageRegistry`] routes a frame to its message layout by type code;
//! [`AttributeRegistry`] routes an attribute report to the interpreter for
//! its (cluster, attribute) pair, falling back to coercion by data type.

mod attributes;
mod messages;

pub use attributes::{
    coerce, generic_property, generic_readings, AttributeRegistry, Interpreter, Reading,
};
pub use messages::MessageRegistry;
