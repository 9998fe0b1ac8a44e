//! Error types for the model crate.

use thiserror::Error;
use zigate_protocol::ProtocolError;

/// Errors raised while configuring a session or dispatching its frames.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Framing or decoding failure from the protocol layer.
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration document could not be parsed.
    #[error("Configuration parse error: {0}")]
    Config(#[from] serde_yaml::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;
