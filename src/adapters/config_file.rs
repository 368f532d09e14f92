//! Configuration persistence
//!
//! Load/save driver profiles as pretty-printed JSON files.

use std::path::Path;

use crate::domain::{DriverConfig, Syn6288Error, Syn6288Result};

/// Read and validate a profile.
pub fn load_config(path: &Path) -> Syn6288Result<DriverConfig> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        Syn6288Error::Config(format!("Failed to read config '{}': {e}", path.display()))
    })?;
    let config: DriverConfig = serde_json::from_str(&json).map_err(|e| {
        Syn6288Error::Config(format!("Failed to parse config '{}': {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}

/// Validate and write a profile, creating parent directories as needed.
pub fn save_config(path: &Path, config: &DriverConfig) -> Syn6288Result<()> {
    config.validate()?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .map_err(|e| Syn6288Error::Config(format!("Failed to create config dir: {e}")))?;
    }
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| Syn6288Error::Config(format!("Serialization error: {e}")))?;
    std::fs::write(path, json)
        .map_err(|e| Syn6288Error::Config(format!("Failed to write config: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TextType;

    #[test]
    fn save_then_load_preserves_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles").join("desk.json");
        let config = DriverConfig {
            serial_port: Some("/dev/ttyUSB0".into()),
            baud_rate: 19200,
            background: 3,
            text_type: TextType::Unicode,
            volume: 10,
            background_volume: 4,
            speed: 2,
        };

        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(Syn6288Error::Config(_))));
    }

    #[test]
    fn load_rejects_out_of_range_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loud.json");
        std::fs::write(&path, r#"{"volume": 40}"#).unwrap();
        assert!(matches!(load_config(&path), Err(Syn6288Error::Config(_))));
    }

    #[test]
    fn save_refuses_invalid_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        let config = DriverConfig {
            speed: 9,
            ..Default::default()
        };
        assert!(save_config(&path, &config).is_err());
        assert!(!path.exists());
    }
}
