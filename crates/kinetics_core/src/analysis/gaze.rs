//! # Eye / Gaze Heuristic Analyzer
//!
//! Estimates where the subject is looking from the nose and eye landmarks.
//! The gaze vector is the nose position minus the midpoint of the eyes; its
//! heading picks one of four buckets. Consecutive records in the same bucket
//! form a fixation, and every bucket change is a gaze shift.

use fxhash::FxHashSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{AnalysisConfig, FieldConfig, GazeConfig};
use crate::models::{sort_stream, BodyPart, DataStatus, Point, PositionSample};

use super::geometry::{grid_cell, heading_deg, mean, ratio};

/// Score reported for every gaze metric when there are too few records.
pub const DEFAULT_GAZE_SCORE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GazeDirection {
    Right,
    Down,
    Left,
    Up,
}

impl GazeDirection {
    /// Quadrant of `atan2(dy, dx)` with +-45 degree boundaries (y grows down).
    pub fn classify(dx: f64, dy: f64) -> Self {
        let angle = heading_deg(dx, dy);
        if (-45.0..=45.0).contains(&angle) {
            GazeDirection::Right
        } else if angle > 45.0 && angle <= 135.0 {
            GazeDirection::Down
        } else if angle > -135.0 && angle < -45.0 {
            GazeDirection::Up
        } else {
            GazeDirection::Left
        }
    }
}

/// One sample where nose and both eyes were visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazeRecord {
    pub timestamp_ms: f64,
    pub eye_center: Point,
    pub gaze: Point,
    pub direction: GazeDirection,
    /// Projected point of attention in frame coordinates
    pub focus: Point,
    /// Mean confidence of the three landmarks
    pub confidence: f64,
}

impl GazeRecord {
    pub fn from_sample(sample: &PositionSample, min_conf: f64, gain: f64) -> Option<Self> {
        let nose = sample.keypoint(BodyPart::Nose, min_conf)?;
        let left = sample.keypoint(BodyPart::LeftEye, min_conf)?;
        let right = sample.keypoint(BodyPart::RightEye, min_conf)?;

        let eye_center = left.position().midpoint(&right.position());
        let gaze = Point::new(nose.x - eye_center.x, nose.y - eye_center.y);
        Some(Self {
            timestamp_ms: sample.timestamp_ms,
            eye_center,
            gaze,
            direction: GazeDirection::classify(gaze.x, gaze.y),
            focus: Point::new(eye_center.x + gaze.x * gain, eye_center.y + gaze.y * gain),
            confidence: (nose.confidence + left.confidence + right.confidence) / 3.0,
        })
    }
}

/// Share of records per gaze bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GazeDistribution {
    pub right: f64,
    pub down: f64,
    pub left: f64,
    pub up: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FixationPoint {
    /// Mean focus point of the fixation
    pub x: f64,
    pub y: f64,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub direction: GazeDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GazeAnalysis {
    pub status: DataStatus,
    pub record_count: usize,
    pub gaze_distribution: GazeDistribution,
    pub dominant_direction: Option<GazeDirection>,
    pub fixation_points: Vec<FixationPoint>,
    pub gaze_shifts: usize,
    pub shifts_per_minute: f64,
    pub avg_reaction_time_ms: f64,
    /// Occupied share of the focus grid, [0, 1]
    pub field_coverage: f64,
    pub high_confidence_fraction: f64,
    pub field_awareness: f64,
    pub decision_speed: f64,
    pub anticipation: f64,
}

impl GazeAnalysis {
    /// Fixed default analysis for streams with too few facial records. Marked
    /// `InsufficientData` so it is never mistaken for a measurement.
    pub fn default_analysis(record_count: usize) -> Self {
        Self {
            status: DataStatus::InsufficientData,
            record_count,
            gaze_distribution: GazeDistribution::default(),
            dominant_direction: None,
            fixation_points: Vec::new(),
            gaze_shifts: 0,
            shifts_per_minute: 0.0,
            avg_reaction_time_ms: 0.0,
            field_coverage: 0.0,
            high_confidence_fraction: 0.0,
            field_awareness: DEFAULT_GAZE_SCORE,
            decision_speed: DEFAULT_GAZE_SCORE,
            anticipation: DEFAULT_GAZE_SCORE,
        }
    }
}

/// Build tracking records from the facial landmarks of a stream.
pub fn gaze_records(samples: &[PositionSample], config: &AnalysisConfig) -> Vec<GazeRecord> {
    let min_conf = config.kinematics.min_keypoint_confidence;
    sort_stream(samples)
        .iter()
        .filter_map(|s| GazeRecord::from_sample(s, min_conf, config.gaze.projection_gain))
        .collect()
}

/// Group consecutive same-direction records. A fixation lasts until the
/// next one starts; the final one until the last record.
pub fn fixations(records: &[GazeRecord]) -> Vec<FixationPoint> {
    let mut runs: Vec<&[GazeRecord]> = Vec::new();
    let mut start = 0;
    for i in 1..=records.len() {
        if i == records.len() || records[i].direction != records[start].direction {
            runs.push(&records[start..i]);
            start = i;
        }
    }

    let last_ms = records.last().map(|r| r.timestamp_ms).unwrap_or(0.0);
    runs.iter()
        .enumerate()
        .map(|(i, run)| {
            let start_ms = run[0].timestamp_ms;
            let end_ms = runs.get(i + 1).map(|next| next[0].timestamp_ms).unwrap_or(last_ms);
            let xs: Vec<f64> = run.iter().map(|r| r.focus.x).collect();
            let ys: Vec<f64> = run.iter().map(|r| r.focus.y).collect();
            FixationPoint {
                x: mean(&xs),
                y: mean(&ys),
                start_ms,
                duration_ms: (end_ms - start_ms).max(0.0),
                direction: run[0].direction,
            }
        })
        .collect()
}

fn distribution(records: &[GazeRecord]) -> (GazeDistribution, Option<GazeDirection>) {
    let mut counts = [0usize; 4];
    let order = [GazeDirection::Right, GazeDirection::Down, GazeDirection::Left, GazeDirection::Up];
    for r in records {
        counts[order.iter().position(|d| *d == r.direction).unwrap_or(0)] += 1;
    }
    let n = records.len() as f64;
    let dist = GazeDistribution {
        right: ratio(counts[0] as f64, n),
        down: ratio(counts[1] as f64, n),
        left: ratio(counts[2] as f64, n),
        up: ratio(counts[3] as f64, n),
    };
    // first bucket wins ties
    let dominant = counts
        .iter()
        .enumerate()
        .filter(|(_, c)| **c > 0)
        .fold(None::<(usize, usize)>, |best, (i, &c)| match best {
            Some((_, bc)) if bc >= c => best,
            _ => Some((i, c)),
        })
        .map(|(i, _)| order[i]);
    (dist, dominant)
}

fn field_coverage(records: &[GazeRecord], field: &FieldConfig, cfg: &GazeConfig) -> f64 {
    let cells: FxHashSet<(usize, usize)> = records
        .iter()
        .map(|r| grid_cell(r.focus, field.width, field.height, cfg.focus_grid))
        .collect();
    cells.len() as f64 / (cfg.focus_grid * cfg.focus_grid) as f64
}

/// Analyze gaze behaviour over a stream.
pub fn analyze_gaze(samples: &[PositionSample], config: &AnalysisConfig) -> GazeAnalysis {
    let cfg = &config.gaze;
    let records = gaze_records(samples, config);

    if records.len() < cfg.min_records {
        warn!(records = records.len(), required = cfg.min_records, "gaze: insufficient facial records");
        return GazeAnalysis::default_analysis(records.len());
    }

    let (gaze_distribution, dominant_direction) = distribution(&records);
    let fixation_points = fixations(&records);
    let gaze_shifts = fixation_points.len().saturating_sub(1);

    let duration_ms = match (records.first(), records.last()) {
        (Some(a), Some(b)) => (b.timestamp_ms - a.timestamp_ms).max(0.0),
        _ => 0.0,
    };
    let shifts_per_minute = ratio(gaze_shifts as f64, duration_ms / 60_000.0);

    // reaction time: how long a fixation is held before the gaze moves on
    let avg_reaction_time_ms = if gaze_shifts > 0 {
        let held: Vec<f64> = fixation_points[..gaze_shifts].iter().map(|f| f.duration_ms).collect();
        mean(&held)
    } else {
        duration_ms
    };

    let field_coverage = field_coverage(&records, &config.field, cfg);
    let high_confidence_fraction = ratio(
        records.iter().filter(|r| r.confidence >= cfg.high_confidence).count() as f64,
        records.len() as f64,
    );

    let field_awareness = (50.0 * field_coverage
        + 50.0 * shifts_per_minute.min(cfg.max_shifts_per_minute) / cfg.max_shifts_per_minute)
        .min(100.0);
    let decision_speed = (100.0 - avg_reaction_time_ms / 10.0).clamp(cfg.min_decision_speed, 100.0);
    let anticipation = (50.0 * high_confidence_fraction + 0.5 * decision_speed).min(100.0);

    debug!(
        records = records.len(),
        gaze_shifts,
        avg_reaction_time_ms,
        field_coverage,
        "gaze: analyzed"
    );

    GazeAnalysis {
        status: DataStatus::Measured,
        record_count: records.len(),
        gaze_distribution,
        dominant_direction,
        fixation_points,
        gaze_shifts,
        shifts_per_minute,
        avg_reaction_time_ms,
        field_coverage,
        high_confidence_fraction,
        field_awareness,
        decision_speed,
        anticipation,
    }
}
