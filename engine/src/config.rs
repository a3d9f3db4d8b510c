//! Rig configuration
//!
//! One JSON document holds the character tuning, the camera configuration
//! and the lens. Every section is optional; missing fields take their
//! defaults.
//!
//! ```json
//! {
//!   "character": { "stable": { "max_stable_move_speed": 8.0 } },
//!   "camera": { "lock_on": { "toggle": false } },
//!   "lens": { "vertical_fov_deg": 50.0 }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::camera::{CameraLens, LockOnCameraConfig};
use crate::error::{ConfigError, SetupError};
use crate::player::MotionTuning;

/// Complete configuration of a [`crate::rig::PlayerRig`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub character: MotionTuning,
    pub camera: LockOnCameraConfig,
    pub lens: CameraLens,
}

impl RigConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RigConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("loaded rig config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        self.character.validate()?;
        self.camera.validate()?;
        self.lens.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = RigConfig::from_json_str("{}").expect("empty config");
        assert_eq!(config, RigConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let json = r#"{
            "character": { "stable": { "max_stable_move_speed": 8.0 } },
            "camera": { "orbit": { "distance": 4.0 }, "lock_on": { "toggle": false } },
            "lens": { "vertical_fov_deg": 50.0 }
        }"#;
        let config = RigConfig::from_json_str(json).expect("partial config");
        assert_eq!(config.character.stable.max_stable_move_speed, 8.0);
        assert_eq!(config.character.jump.jump_up_speed, MotionTuning::default().jump.jump_up_speed);
        assert_eq!(config.camera.orbit.distance, 4.0);
        assert!(!config.camera.lock_on.toggle);
        assert!((config.lens.vertical_fov_deg - 50.0).abs() < 0.0001);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let json = r#"{ "camera": { "lock_on": { "follow_to_target_ratio": 1.5 } } }"#;
        assert!(matches!(
            RigConfig::from_json_str(json),
            Err(ConfigError::Setup(SetupError::InvalidTuning { .. }))
        ));
        assert!(matches!(RigConfig::from_json_str("{ not json"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = RigConfig::load("/nonexistent/rig.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_json_round_trip_keeps_values() {
        let mut config = RigConfig::default();
        config.camera.orbit.default_y_angle = 30.0;
        let json = config.to_json_string().expect("serializable");
        assert_eq!(RigConfig::from_json_str(&json).expect("parse back"), config);
    }
}
