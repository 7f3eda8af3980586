//! # Pipeline Driver
//!
//! Runs every stage over one stream in control-flow order:
//!
//! ```text
//! stream -> kinematics -> enhanced movement -> { trajectory, performance }
//!        -> gaze (independent, optionally blended into performance)
//! ```
//!
//! Streams of different subjects share nothing, so batches fan out over
//! rayon.

use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::analysis::{
    aggregate_performance, analyze_enhanced, analyze_gaze, extract_kinematics, predict_trajectory,
    AnalysisInput, EnhancedMetrics, GazeAnalysis, KinematicSeries, PerformanceMetrics,
    TrajectoryPrediction,
};
use crate::config::AnalysisConfig;
use crate::models::PositionSample;

/// Below this many subjects a batch runs sequentially.
const PARALLEL_BATCH_THRESHOLD: usize = 4;

/// Every stage's output for one stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StreamAnalysis {
    pub sample_count: usize,
    /// `None` for streams shorter than two samples
    pub kinematics: Option<KinematicSeries>,
    pub movement: EnhancedMetrics,
    pub trajectory: TrajectoryPrediction,
    pub gaze: GazeAnalysis,
    pub performance: PerformanceMetrics,
}

/// Samples of one tracked subject. Identifiers are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SubjectStream {
    pub subject_id: String,
    #[serde(default)]
    pub video_id: Option<String>,
    pub samples: Vec<PositionSample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SubjectAnalysis {
    pub subject_id: String,
    #[serde(default)]
    pub video_id: Option<String>,
    pub analysis: StreamAnalysis,
}

/// Run the full pipeline over one stream.
pub fn analyze_stream(samples: &[PositionSample], config: &AnalysisConfig) -> StreamAnalysis {
    let kinematics = extract_kinematics(samples, config);
    trace!(present = kinematics.is_some(), "pipeline: kinematics done");

    let base = kinematics.clone().unwrap_or_default();
    let movement = analyze_enhanced(samples, &base, config);
    trace!(status = ?movement.status, "pipeline: movement done");

    let trajectory = predict_trajectory(samples, config);
    let gaze = analyze_gaze(samples, config);
    let performance = aggregate_performance(
        &AnalysisInput::Enhanced(movement.clone()),
        samples,
        Some(&gaze),
        config,
    );

    debug!(
        samples = samples.len(),
        overall = performance.overall_score,
        "pipeline: stream analyzed"
    );

    StreamAnalysis {
        sample_count: samples.len(),
        kinematics,
        movement,
        trajectory,
        gaze,
        performance,
    }
}

/// Analyze independent subjects, in parallel for larger batches. Output order
/// matches input order.
pub fn analyze_batch(streams: &[SubjectStream], config: &AnalysisConfig) -> Vec<SubjectAnalysis> {
    let run = |stream: &SubjectStream| SubjectAnalysis {
        subject_id: stream.subject_id.clone(),
        video_id: stream.video_id.clone(),
        analysis: analyze_stream(&stream.samples, config),
    };

    if streams.len() > PARALLEL_BATCH_THRESHOLD {
        streams.par_iter().map(run).collect()
    } else {
        streams.iter().map(run).collect()
    }
}
