//! Driver configuration profiles
//!
//! A DriverConfig holds everything needed to bring a SYN6288 up in a known
//! state: which serial port to use, the UART speed, and the synthesis
//! settings pushed to the chip after `init`.

use serde::{Deserialize, Serialize};

use super::{BaudRate, Mode, Syn6288Error, Syn6288Result, TextType};

/// Highest accepted synthesis and background volume
pub const MAX_VOLUME: u8 = 16;
/// Highest accepted synthesis speed
pub const MAX_SPEED: u8 = 5;

/// A saved driver profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Serial port name (e.g. "/dev/ttyUSB0", "COM3")
    pub serial_port: Option<String>,
    /// UART speed in bps: 9600, 19200 or 38400
    pub baud_rate: u32,
    /// Background track 1-15, or 0 for common mode
    pub background: u8,
    pub text_type: TextType,
    /// Synthesis volume, 0-16
    pub volume: u8,
    /// Background music volume, 0-16
    pub background_volume: u8,
    /// Synthesis speed, 0-5
    pub speed: u8,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            serial_port: None,
            baud_rate: 9600,
            background: 0,
            text_type: TextType::Gb2312,
            volume: MAX_VOLUME,
            background_volume: 0,
            speed: MAX_SPEED,
        }
    }
}

impl DriverConfig {
    /// Check every field against the chip's accepted ranges.
    pub fn validate(&self) -> Syn6288Result<()> {
        self.baud().map_err(|e| Syn6288Error::Config(e.to_string()))?;
        self.mode().map_err(|e| Syn6288Error::Config(e.to_string()))?;
        if self.volume > MAX_VOLUME {
            return Err(Syn6288Error::Config(format!(
                "volume {} out of range 0-{MAX_VOLUME}",
                self.volume
            )));
        }
        if self.background_volume > MAX_VOLUME {
            return Err(Syn6288Error::Config(format!(
                "background volume {} out of range 0-{MAX_VOLUME}",
                self.background_volume
            )));
        }
        if self.speed > MAX_SPEED {
            return Err(Syn6288Error::Config(format!(
                "speed {} out of range 0-{MAX_SPEED}",
                self.speed
            )));
        }
        Ok(())
    }

    pub fn baud(&self) -> Syn6288Result<BaudRate> {
        BaudRate::try_from(self.baud_rate)
    }

    pub fn mode(&self) -> Syn6288Result<Mode> {
        Mode::background(self.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_matches_reference_setup() {
        let config = DriverConfig::default();
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.mode().unwrap(), Mode::COMMON);
        assert_eq!(config.text_type, TextType::Gb2312);
        assert_eq!(config.volume, 16);
        assert_eq!(config.background_volume, 0);
        assert_eq!(config.speed, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn configuration_serializes_to_json() {
        let config = DriverConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"baud_rate\":9600"));
        assert!(json.contains("\"text_type\":\"gb2312\""));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: DriverConfig =
            serde_json::from_str(r#"{"serial_port":"/dev/ttyS0","speed":2}"#).unwrap();
        assert_eq!(config.serial_port.as_deref(), Some("/dev/ttyS0"));
        assert_eq!(config.speed, 2);
        assert_eq!(config.volume, 16);
    }

    #[test]
    fn validate_rejects_out_of_range_fields() {
        let bad = [
            DriverConfig { baud_rate: 4800, ..Default::default() },
            DriverConfig { background: 16, ..Default::default() },
            DriverConfig { volume: 17, ..Default::default() },
            DriverConfig { background_volume: 20, ..Default::default() },
            DriverConfig { speed: 6, ..Default::default() },
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(Syn6288Error::Config(_))),
                "expected Config error for {config:?}"
            );
        }
    }
}
