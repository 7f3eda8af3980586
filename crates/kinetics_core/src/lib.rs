//! # kinetics_core - Deterministic Movement Analysis Pipeline
//!
//! Turns a stream of per-frame pose keypoint detections into kinematic,
//! tactical and predictive metrics and aggregate performance scores.
//!
//! ## Features
//! - Pure, single-pass stages over an immutable sample slice
//! - Same input, same output: no randomness, no global state
//! - Typed `InsufficientData` results instead of errors for short streams
//! - Content-addressed, caller-owned result cache
//! - JSON API for easy integration

// Doc formatting lints - purely cosmetic, fix incrementally
#![allow(clippy::doc_lazy_continuation)]

pub mod analysis;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;

#[cfg(test)]
mod test_fixtures;

// Re-export main API functions
pub use api::{analyze_json, analyze_request, AnalysisRequest, AnalysisResponse};
pub use error::{AnalysisError, Result};

// Re-export stage entry points and result types
pub use analysis::{
    aggregate_performance, analyze_enhanced, analyze_gaze, extract_kinematics, predict_trajectory,
    AnalysisInput, EnhancedMetrics, GazeAnalysis, KinematicSeries, PerformanceMetrics,
    TrajectoryPrediction,
};
pub use cache::{stream_digest, ResultCache};
pub use config::AnalysisConfig;
pub use models::{BodyPart, BoundingBox, DataStatus, Keypoint, Point, PositionSample};
pub use pipeline::{analyze_batch, analyze_stream, StreamAnalysis, SubjectAnalysis, SubjectStream};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
