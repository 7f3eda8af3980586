//! Eye / gaze analyzer configuration

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GazeConfig {
    /// Minimum tracking records (default: 5)
    #[validate(range(min = 2))]
    pub min_records: usize,
    /// Cells per axis of the focus-point grid (default: 10)
    #[validate(range(min = 1, max = 100))]
    pub focus_grid: usize,
    /// Gaze vector length multiplier when projecting the focus point (default: 10)
    #[validate(range(min = 0.0))]
    pub projection_gain: f64,
    /// Record confidence counted as high (default: 0.8)
    #[validate(range(min = 0.0, max = 1.0))]
    pub high_confidence: f64,
    /// Shift rate that saturates field awareness (default: 60)
    #[validate(range(min = 1.0))]
    pub max_shifts_per_minute: f64,
    /// Lowest decision speed score (default: 30)
    #[validate(range(min = 0.0, max = 100.0))]
    pub min_decision_speed: f64,
}

impl Default for GazeConfig {
    fn default() -> Self {
        Self {
            min_records: 5,
            focus_grid: 10,
            projection_gain: 10.0,
            high_confidence: 0.8,
            max_shifts_per_minute: 60.0,
            min_decision_speed: 30.0,
        }
    }
}
