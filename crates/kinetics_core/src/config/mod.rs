//! # Analysis Configuration
//!
//! Every tuning constant of the pipeline lives here instead of in the
//! analyzers, one sub-config per stage.
//!
//! ## Usage
//! ```rust
//! use kinetics_core::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::default();
//! let hd = AnalysisConfig::hd();
//! assert!(hd.field.width > config.field.width);
//! ```

mod field_config;
mod gaze_config;
mod kinematics_config;
mod movement_config;
mod performance_config;
mod trajectory_config;

pub use field_config::FieldConfig;
pub use gaze_config::GazeConfig;
pub use kinematics_config::KinematicsConfig;
pub use movement_config::MovementConfig;
pub use performance_config::PerformanceConfig;
pub use trajectory_config::TrajectoryConfig;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;

/// Full pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
pub struct AnalysisConfig {
    /// Reference frame of the tracked area
    #[serde(default)]
    #[validate]
    pub field: FieldConfig,
    /// Kinematic extractor settings
    #[serde(default)]
    #[validate]
    pub kinematics: KinematicsConfig,
    /// Enhanced movement analyzer settings
    #[serde(default)]
    #[validate]
    pub movement: MovementConfig,
    /// Trajectory predictor settings
    #[serde(default)]
    #[validate]
    pub trajectory: TrajectoryConfig,
    /// Eye / gaze analyzer settings
    #[serde(default)]
    #[validate]
    pub gaze: GazeConfig,
    /// Performance aggregator settings
    #[serde(default)]
    #[validate]
    pub performance: PerformanceConfig,
}

impl AnalysisConfig {
    /// 1280x720 broadcast frame; speed thresholds scaled with the frame width.
    pub fn hd() -> Self {
        let mut cfg = Self::default();
        let scale = 1280.0 / cfg.field.width;
        cfg.field = FieldConfig::hd();
        cfg.kinematics.jogging_speed *= scale;
        cfg.kinematics.running_speed *= scale;
        cfg.kinematics.sprinting_speed *= scale;
        cfg.performance.reference_speed *= scale;
        cfg
    }

    /// Low-confidence landmarks are treated as absent.
    pub fn strict() -> Self {
        let mut cfg = Self::default();
        cfg.kinematics.min_keypoint_confidence = 0.5;
        cfg.gaze.high_confidence = 0.9;
        cfg
    }

    /// Preset by name: `default`, `hd` or `strict`.
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Some(Self::default()),
            "hd" => Some(Self::hd()),
            "strict" => Some(Self::strict()),
            _ => None,
        }
    }

    /// Parse and validate a JSON config. Missing sections take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str::<Self>(json)?.validated()
    }

    /// Parse and validate a YAML config. Missing sections take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str::<Self>(yaml)?.validated()
    }

    /// Returns the config if every field is within range.
    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }
}

// ========== Tests ==========
