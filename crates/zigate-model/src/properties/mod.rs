//! Device property values.

mod value;

pub use value::{FromPropertyValue, PropertyValue};
