//! # Trajectory Predictor
//!
//! Short-horizon position forecast from bounding-box centroids.
//!
//! ## Algorithm
//! 1. Per-axis least-squares line of position against time over the most
//!    recent `regression_window` centroids
//! 2. Extrapolate `prediction_steps` points spaced `horizon_ms` apart with
//!    confidence `max(floor, 1 - decay * k)`
//! 3. Direction change: heading turns above `direction_change_deg` between
//!    consecutive displacement vectors
//! 4. Hotspots: occupancy share of each cell of a grid over the field

use fxhash::FxHashMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AnalysisConfig, FieldConfig, TrajectoryConfig};
use crate::models::{sort_stream, DataStatus, Point, PositionSample};

use super::geometry::{cell_center, grid_cell, heading_deg, heading_difference, mean, ratio};
use super::movement::IntensityPoint;

/// Least-squares line `value(t) = intercept + slope * (t - origin_ms) / 1000`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RegressionLine {
    /// px per second
    pub slope: f64,
    pub intercept: f64,
    pub origin_ms: f64,
}

impl RegressionLine {
    /// Fit over paired timestamps and values. A window with no time spread
    /// yields a flat line through the mean.
    pub fn fit(timestamps_ms: &[f64], values: &[f64]) -> Self {
        let n = timestamps_ms.len().min(values.len());
        if n == 0 {
            return Self::default();
        }
        let origin_ms = timestamps_ms[0];
        let ts: Vec<f64> = timestamps_ms[..n].iter().map(|t| (t - origin_ms) / 1000.0).collect();
        let vs = &values[..n];

        let t_mean = mean(&ts);
        let v_mean = mean(vs);
        let (sxy, sxx) = ts.iter().zip(vs).fold((0.0, 0.0), |(sxy, sxx), (t, v)| {
            let dt = t - t_mean;
            (sxy + dt * (v - v_mean), sxx + dt * dt)
        });

        if sxx > 0.0 {
            let slope = sxy / sxx;
            Self { slope, intercept: v_mean - slope * t_mean, origin_ms }
        } else {
            Self { slope: 0.0, intercept: v_mean, origin_ms }
        }
    }

    pub fn at(&self, timestamp_ms: f64) -> f64 {
        self.intercept + self.slope * (timestamp_ms - self.origin_ms) / 1000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PredictedPosition {
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DirectionChange {
    /// Likelihood of a change of direction, [0, 1]
    pub likelihood: f64,
    /// Expected time until it happens (ms)
    pub timeframe_ms: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrajectoryPrediction {
    pub status: DataStatus,
    /// Confidence is non-increasing along the horizon
    pub predicted_positions: Vec<PredictedPosition>,
    pub next_direction_change: DirectionChange,
    /// Top cells by occupancy, descending
    pub potential_hotspots: Vec<IntensityPoint>,
    pub x_line: RegressionLine,
    pub y_line: RegressionLine,
    /// Usable centroids in the stream
    pub sample_count: usize,
}

impl TrajectoryPrediction {
    pub fn insufficient(sample_count: usize) -> Self {
        Self { status: DataStatus::InsufficientData, sample_count, ..Self::default() }
    }

    /// Fitted velocity (px/s) as `(vx, vy)`.
    pub fn velocity(&self) -> (f64, f64) {
        (self.x_line.slope, self.y_line.slope)
    }
}

/// Confidence of the k-th predicted step (1-based).
#[inline]
pub fn step_confidence(k: usize, cfg: &TrajectoryConfig) -> f64 {
    (1.0 - cfg.confidence_decay * k as f64).max(cfg.confidence_floor)
}

/// Forecast future positions of the tracked subject.
pub fn predict_trajectory(samples: &[PositionSample], config: &AnalysisConfig) -> TrajectoryPrediction {
    let cfg = &config.trajectory;
    let sorted = sort_stream(samples);
    let points: Vec<(f64, Point)> = sorted
        .iter()
        .filter_map(|s| s.centroid().map(|c| (s.timestamp_ms, c)))
        .collect();

    if points.len() < cfg.min_samples {
        debug!(usable = points.len(), required = cfg.min_samples, "trajectory: insufficient samples");
        return TrajectoryPrediction::insufficient(points.len());
    }

    let window = &points[points.len() - cfg.regression_window.min(points.len())..];
    let ts: Vec<f64> = window.iter().map(|(t, _)| *t).collect();
    let xs: Vec<f64> = window.iter().map(|(_, p)| p.x).collect();
    let ys: Vec<f64> = window.iter().map(|(_, p)| p.y).collect();
    let x_line = RegressionLine::fit(&ts, &xs);
    let y_line = RegressionLine::fit(&ts, &ys);

    let t_last = points[points.len() - 1].0;
    let predicted_positions = (1..=cfg.prediction_steps)
        .map(|k| {
            let t = t_last + k as f64 * cfg.horizon_ms;
            PredictedPosition {
                x: x_line.at(t),
                y: y_line.at(t),
                timestamp_ms: t,
                confidence: step_confidence(k, cfg),
            }
        })
        .collect();

    let next_direction_change = estimate_direction_change(&points, cfg);
    let positions: Vec<Point> = points.iter().map(|(_, p)| *p).collect();
    let potential_hotspots = extract_hotspots(&positions, &config.field, cfg);

    debug!(
        usable = points.len(),
        vx = x_line.slope,
        vy = y_line.slope,
        hotspots = potential_hotspots.len(),
        "trajectory: predicted"
    );

    TrajectoryPrediction {
        status: DataStatus::Measured,
        predicted_positions,
        next_direction_change,
        potential_hotspots,
        x_line,
        y_line,
        sample_count: points.len(),
    }
}

/// Likelihood and timeframe of the next change of direction.
pub fn estimate_direction_change(points: &[(f64, Point)], cfg: &TrajectoryConfig) -> DirectionChange {
    let headings: Vec<f64> = points
        .windows(2)
        .filter_map(|w| {
            let (dx, dy) = (w[1].1.x - w[0].1.x, w[1].1.y - w[0].1.y);
            (dx != 0.0 || dy != 0.0).then(|| heading_deg(dx, dy))
        })
        .collect();

    let changes = headings
        .windows(2)
        .filter(|w| heading_difference(w[0], w[1]) > cfg.direction_change_deg)
        .count();

    let n = points.len() as f64;
    let likelihood = (ratio(changes as f64, n) * 2.0).min(cfg.max_change_likelihood);
    let elapsed = match (points.first(), points.last()) {
        (Some((t0, _)), Some((t1, _))) => (t1 - t0).max(0.0),
        _ => 0.0,
    };
    let timeframe_ms = (elapsed / changes.max(1) as f64).max(cfg.min_change_timeframe_ms);

    DirectionChange { likelihood, timeframe_ms }
}

/// Top cells by occupancy share. Ties keep the cell that was seen first.
pub fn extract_hotspots(points: &[Point], field: &FieldConfig, cfg: &TrajectoryConfig) -> Vec<IntensityPoint> {
    if points.is_empty() {
        return Vec::new();
    }

    let mut order: Vec<((usize, usize), usize)> = Vec::new();
    let mut index: FxHashMap<(usize, usize), usize> = FxHashMap::default();
    for p in points {
        let cell = grid_cell(*p, field.width, field.height, cfg.hotspot_grid);
        match index.get(&cell) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(cell, order.len());
                order.push((cell, 1));
            }
        }
    }

    let total = points.len() as f64;
    let mut hotspots: Vec<IntensityPoint> = order
        .into_iter()
        .map(|(cell, count)| {
            let center = cell_center(cell, field.width, field.height, cfg.hotspot_grid);
            IntensityPoint { x: center.x, y: center.y, intensity: count as f64 / total }
        })
        .filter(|h| h.intensity > cfg.hotspot_threshold)
        .collect();

    // sort_by is stable, so equal intensities keep discovery order
    hotspots.sort_by(|a, b| b.intensity.total_cmp(&a.intensity));
    hotspots.truncate(cfg.hotspot_count);
    hotspots
}
