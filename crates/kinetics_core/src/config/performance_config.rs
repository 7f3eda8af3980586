//! Performance aggregator configuration

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Average speed (px/s) that maps to a speed signal of 100 (default: 300)
    #[validate(range(min = 1.0))]
    pub reference_speed: f64,
    /// Weight of gaze scores when a measured gaze analysis is supplied (default: 0.5)
    #[validate(range(min = 0.0, max = 1.0))]
    pub gaze_blend: f64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self { reference_speed: 300.0, gaze_blend: 0.5 }
    }
}
