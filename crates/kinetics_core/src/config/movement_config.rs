//! Enhanced movement analyzer configuration

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MovementConfig {
    /// Minimum samples with a usable bounding box (default: 5)
    #[validate(range(min = 2))]
    pub min_samples: usize,

    // === Stamina ===
    /// Share of the stream's max speed counted as high intensity (default: 0.7)
    #[validate(range(min = 0.0, max = 1.0))]
    pub high_intensity_ratio: f64,
    /// Stamina lost per high-intensity step (default: 0.5)
    #[validate(range(min = 0.0))]
    pub high_intensity_cost: f64,
    /// Stamina regained when a recovery completes (default: 0.2)
    #[validate(range(min = 0.0))]
    pub recovery_bonus: f64,
    /// Stamina regained per calm step (default: 0.1)
    #[validate(range(min = 0.0))]
    pub passive_gain: f64,
    /// Gap after the last high-intensity mark that counts as a recovery (default: 1000)
    #[validate(range(min = 0.0))]
    pub recovery_gap_ms: f64,
    /// Numerator of recovery_speed = scale / mean recovery (default: 5000)
    #[validate(range(min = 0.0))]
    pub recovery_speed_scale: f64,

    // === Acceleration classes (px/s^2) ===
    /// Explosive acceleration threshold (default: 5)
    pub explosive_acceleration: f64,
    /// Sustained acceleration / deceleration threshold (default: 2)
    pub sustained_acceleration: f64,

    // === Heatmap ===
    /// Cells per axis for dwell density (default: 20)
    #[validate(range(min = 1, max = 1000))]
    pub heatmap_grid: usize,
    /// Lowest heatmap intensity (default: 0.3)
    #[validate(range(min = 0.0, max = 1.0))]
    pub heatmap_floor: f64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            min_samples: 5,
            high_intensity_ratio: 0.7,
            high_intensity_cost: 0.5,
            recovery_bonus: 0.2,
            passive_gain: 0.1,
            recovery_gap_ms: 1000.0,
            recovery_speed_scale: 5000.0,
            explosive_acceleration: 5.0,
            sustained_acceleration: 2.0,
            heatmap_grid: 20,
            heatmap_floor: 0.3,
        }
    }
}
