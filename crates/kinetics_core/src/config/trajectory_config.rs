//! Trajectory predictor configuration

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TrajectoryConfig {
    /// Minimum usable centroids (default: 3)
    #[validate(range(min = 2))]
    pub min_samples: usize,
    /// Most recent samples used for the regression fit (default: 5)
    #[validate(range(min = 2))]
    pub regression_window: usize,

    // === Forecast ===
    /// Number of predicted points (default: 5)
    #[validate(range(min = 1, max = 100))]
    pub prediction_steps: usize,
    /// Spacing between predicted points (default: 1000)
    #[validate(range(min = 1.0))]
    pub horizon_ms: f64,
    /// Confidence lost per step (default: 0.15)
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence_decay: f64,
    /// Confidence never drops below this (default: 0.2)
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence_floor: f64,

    // === Direction change ===
    /// Turn angle that counts as a change of direction (default: 30)
    #[validate(range(min = 0.0, max = 180.0))]
    pub direction_change_deg: f64,
    /// Upper bound on the change likelihood (default: 0.9)
    #[validate(range(min = 0.0, max = 1.0))]
    pub max_change_likelihood: f64,
    /// Shortest predicted time to the next change (default: 500)
    #[validate(range(min = 0.0))]
    pub min_change_timeframe_ms: f64,

    // === Hotspots ===
    /// Cells per axis (default: 20)
    #[validate(range(min = 1, max = 1000))]
    pub hotspot_grid: usize,
    /// Cells at or below this occupancy share are dropped (default: 0.05)
    #[validate(range(min = 0.0, max = 1.0))]
    pub hotspot_threshold: f64,
    /// Hotspots returned (default: 5)
    pub hotspot_count: usize,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            min_samples: 3,
            regression_window: 5,
            prediction_steps: 5,
            horizon_ms: 1000.0,
            confidence_decay: 0.15,
            confidence_floor: 0.2,
            direction_change_deg: 30.0,
            max_change_likelihood: 0.9,
            min_change_timeframe_ms: 500.0,
            hotspot_grid: 20,
            hotspot_threshold: 0.05,
            hotspot_count: 5,
        }
    }
}
