//! Reference frame of the tracked area

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Extent of the source frame that positions are measured in.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_midline"))]
#[serde(default)]
pub struct FieldConfig {
    /// Frame width in pixels (default: 640)
    #[validate(range(min = 1.0))]
    pub width: f64,
    /// Frame height in pixels (default: 480)
    #[validate(range(min = 1.0))]
    pub height: f64,
    /// y coordinate splitting the defensive half (below) from the offensive
    /// half (above) (default: 240)
    pub midline_y: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self { width: 640.0, height: 480.0, midline_y: 240.0 }
    }
}

impl FieldConfig {
    pub fn hd() -> Self {
        Self { width: 1280.0, height: 720.0, midline_y: 360.0 }
    }
}

fn validate_midline(cfg: &FieldConfig) -> Result<(), ValidationError> {
    if cfg.midline_y.is_finite() && cfg.midline_y >= 0.0 && cfg.midline_y <= cfg.height {
        Ok(())
    } else {
        Err(ValidationError::new("midline_outside_field"))
    }
}
