//! Kinematic extractor configuration

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_zone_order"))]
#[serde(default)]
pub struct KinematicsConfig {
    /// Keypoints below this confidence count as absent (default: 0.0)
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_keypoint_confidence: f64,

    // === Speed zones (px/s) ===
    /// Lower bound of the jogging zone (default: 60)
    pub jogging_speed: f64,
    /// Lower bound of the running zone (default: 150)
    pub running_speed: f64,
    /// Lower bound of the sprinting zone (default: 300)
    pub sprinting_speed: f64,
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            min_keypoint_confidence: 0.0,
            jogging_speed: 60.0,
            running_speed: 150.0,
            sprinting_speed: 300.0,
        }
    }
}

fn validate_zone_order(cfg: &KinematicsConfig) -> Result<(), ValidationError> {
    if 0.0 < cfg.jogging_speed
        && cfg.jogging_speed < cfg.running_speed
        && cfg.running_speed < cfg.sprinting_speed
    {
        Ok(())
    } else {
        Err(ValidationError::new("speed_zones_not_ascending"))
    }
}
