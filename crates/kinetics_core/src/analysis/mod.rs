//! # Analysis Stages
//!
//! Every stage is a pure function over a (re-sorted) sample slice.
//!
//! - `kinematics` - speed, acceleration and joint angles
//! - `movement` - stamina, consistency, direction, heatmap, zone transitions
//! - `trajectory` - short-horizon forecast, direction change, hotspots
//! - `gaze` - eye / gaze heuristics
//! - `performance` - weighted scores and strengths / improvement areas

pub mod gaze;
pub mod geometry;
pub mod kinematics;
pub mod movement;
pub mod performance;
pub mod trajectory;

pub use gaze::{analyze_gaze, FixationPoint, GazeAnalysis, GazeDirection, GazeDistribution, GazeRecord};
pub use kinematics::{extract_kinematics, KinematicSeries, SpeedZone, SpeedZones};
pub use movement::{analyze_enhanced, AccelerationProfile, DirectionalData, EnhancedMetrics, IntensityPoint, ZoneTransitions};
pub use performance::{aggregate_performance, recommendation_for, AnalysisInput, MetricKey, PerformanceMetrics};
pub use trajectory::{predict_trajectory, DirectionChange, PredictedPosition, RegressionLine, TrajectoryPrediction};
