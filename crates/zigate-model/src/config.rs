//! Session configuration.
//!
//! A [`SessionConfig`] can be built in code or loaded from YAML:
//!
//! ```yaml
//! name: living_room
//! address_mode: 2
//! source_endpoint: 1
//! max_pending_bytes: 131082
//! record_generic_attributes: true
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use serde::{Deserialize, Serialize};
use zigate_protocol::{Addressing, MAX_WIRE_FRAME_LEN};

use crate::error::{ModelError, ModelResult};

/// Address modes the dongle accepts in command headers.
const MAX_ADDRESS_MODE: u8 = 0x04;

/// Configuration of one connection to a dongle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Connection name, used as the `connection` metric label.
    pub name: String,
    /// Address mode written into command headers (0x02: short address).
    pub address_mode: u8,
    /// Source endpoint written into command headers.
    pub source_endpoint: u8,
    /// Unterminated bytes the assembler may hold before dropping them.
    pub max_pending_bytes: usize,
    /// Record `<cluster>_<attribute>` and `_raw` properties for every report.
    pub record_generic_attributes: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: "zigate".to_string(),
            address_mode: 0x02,
            source_endpoint: 0x01,
            max_pending_bytes: MAX_WIRE_FRAME_LEN,
            record_generic_attributes: true,
        }
    }
}

impl SessionConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> ModelResult<Self> {
        let config: SessionConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> ModelResult<()> {
        if self.name.trim().is_empty() {
            return Err(ModelError::InvalidConfig(
                "connection name must not be empty".to_string(),
            ));
        }
        if self.address_mode > MAX_ADDRESS_MODE {
            return Err(ModelError::InvalidConfig(format!(
                "address mode 0x{:02x} is not one of 0x00 to 0x{:02x}",
                self.address_mode, MAX_ADDRESS_MODE
            )));
        }
        Ok(())
    }

    /// Addressing used by outbound command builders.
    pub fn addressing(&self) -> Addressing {
        Addressing {
            address_mode: self.address_mode,
            source_endpoint: self.source_endpoint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.name, "zigate");
        assert_eq!(config.max_pending_bytes, 131_082);
        assert_eq!(config.addressing(), Addressing::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "name: kitchen\nrecord_generic_attributes: false\n";
        let config = SessionConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.name, "kitchen");
        assert!(!config.record_generic_attributes);
        assert_eq!(config.address_mode, 0x02);
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(matches!(
            SessionConfig::from_yaml_str("baud_rate: 115200\n"),
            Err(ModelError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            SessionConfig::from_yaml_str("address_mode: 7\n"),
            Err(ModelError::InvalidConfig(_))
        ));
        assert!(matches!(
            SessionConfig::from_yaml_str("name: ''\n"),
            Err(ModelError::InvalidConfig(_))
        ));
    }
}
