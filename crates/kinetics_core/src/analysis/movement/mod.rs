//! # Enhanced Movement Analyzer
//!
//! Extends the kinematic series with stamina, consistency, recovery,
//! acceleration character, directional distribution, tactical awareness,
//! a positional heatmap and half-field transitions.
//!
//! Works on bounding-box centroids rather than hip keypoints so it keeps
//! working when the pose is partially lost.
//!
//! - `profile` - direction buckets and acceleration classes
//! - `stamina` - stamina / recovery model
//! - `spatial` - heatmap and zone transitions

pub mod profile;
pub mod spatial;
pub mod stamina;

pub use profile::{
    acceleration_profile, directional_distribution, AccelerationClass, AccelerationProfile,
    DirectionalData, DirectionalSummary, MoveDirection,
};
pub use spatial::{positional_heatmap, zone_transitions, FieldHalf, IntensityPoint, ZoneTransitions};
pub use stamina::{stamina_model, StaminaOutcome};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::models::{elapsed_secs, sort_stream, DataStatus, Point, PositionSample};

use super::geometry::{clamp_score, coefficient_of_variation, distance, mean, ratio};
use super::kinematics::KinematicSeries;

/// One accepted centroid-to-centroid step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementStep {
    pub from: Point,
    pub to: Point,
    pub distance: f64,
    pub dt_s: f64,
    pub speed: f64,
    /// Timestamp of the step's end sample
    pub timestamp_ms: f64,
}

/// Enhanced metrics on top of the base kinematic series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EnhancedMetrics {
    pub status: DataStatus,
    /// Kinematic series this analysis extends
    pub base: KinematicSeries,
    /// Mean centroid speed (px/s)
    pub avg_speed: f64,
    /// Peak centroid speed (px/s)
    pub max_speed: f64,
    pub stamina: f64,
    pub consistency: f64,
    pub recovery_speed: f64,
    pub acceleration_profile: AccelerationProfile,
    pub tactical_awareness: f64,
    pub directional_data: DirectionalData,
    pub positional_heatmap: Vec<IntensityPoint>,
    pub zone_transitions: ZoneTransitions,
    /// Scalar path length of the centroid (px)
    pub total_movement: f64,
    pub direction_changes: usize,
    /// Samples with a usable bounding box
    pub sample_count: usize,
}

impl EnhancedMetrics {
    /// All-zero metrics for a stream too short to analyze; the base series is
    /// passed through untouched.
    pub fn insufficient(base: KinematicSeries, sample_count: usize) -> Self {
        Self {
            status: DataStatus::InsufficientData,
            base,
            sample_count,
            ..Self::default()
        }
    }
}

/// Centroid steps between consecutive usable samples. Pairs with
/// non-positive elapsed time are dropped.
pub fn centroid_steps(points: &[(f64, Point)]) -> Vec<MovementStep> {
    points
        .windows(2)
        .filter_map(|pair| {
            let (t0, from) = pair[0];
            let (t1, to) = pair[1];
            let dt_s = elapsed_secs(t0, t1)?;
            let d = distance(from, to);
            Some(MovementStep { from, to, distance: d, dt_s, speed: d / dt_s, timestamp_ms: t1 })
        })
        .collect()
}

/// `100 - 10 * mean(|speed_i - speed_{i-1}|)`, clamped.
pub fn consistency_score(speeds: &[f64]) -> f64 {
    let deltas: Vec<f64> = speeds.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    clamp_score(100.0 - 10.0 * mean(&deltas))
}

/// Weighted blend of position variety, movement efficiency and the share of
/// non-explosive acceleration.
pub fn tactical_awareness(
    speeds: &[f64],
    direction_changes: usize,
    sample_count: usize,
    movement_efficiency: f64,
    explosive_fraction: f64,
) -> f64 {
    let variety = (50.0 * coefficient_of_variation(speeds)
        + 100.0 * ratio(direction_changes as f64, sample_count as f64))
    .min(100.0);
    clamp_score(0.5 * variety + 0.3 * movement_efficiency + 0.2 * (1.0 - explosive_fraction) * 100.0)
}

/// Run the enhanced analysis over a stream and its base series.
pub fn analyze_enhanced(
    samples: &[PositionSample],
    base: &KinematicSeries,
    config: &AnalysisConfig,
) -> EnhancedMetrics {
    let cfg = &config.movement;
    let sorted = sort_stream(samples);
    let points: Vec<(f64, Point)> = sorted
        .iter()
        .filter_map(|s| s.centroid().map(|c| (s.timestamp_ms, c)))
        .collect();

    if points.len() < cfg.min_samples {
        warn!(
            usable = points.len(),
            required = cfg.min_samples,
            "movement: insufficient samples, returning default metrics"
        );
        return EnhancedMetrics::insufficient(base.clone(), points.len());
    }

    let steps = centroid_steps(&points);
    let speeds: Vec<f64> = steps.iter().map(|s| s.speed).collect();
    let dts: Vec<f64> = steps.iter().map(|s| s.dt_s).collect();

    let directional = directional_distribution(&steps);
    let profile = acceleration_profile(&speeds, &dts, cfg);

    let timed: Vec<(f64, f64)> = steps.iter().map(|s| (s.speed, s.timestamp_ms)).collect();
    let stamina = stamina_model(&timed, cfg);

    let consistency = consistency_score(&speeds);
    let tactical = tactical_awareness(
        &speeds,
        directional.direction_changes,
        points.len(),
        base.movement_efficiency,
        profile.explosive,
    );

    let positions: Vec<Point> = points.iter().map(|(_, p)| *p).collect();
    let heatmap = positional_heatmap(&positions, &config.field, cfg);
    let duration_ms = match (points.first(), points.last()) {
        (Some((t0, _)), Some((t1, _))) => (t1 - t0).max(0.0),
        _ => 0.0,
    };
    let transitions = zone_transitions(&positions, duration_ms, base.movement_efficiency, &config.field);

    debug!(
        usable = points.len(),
        steps = steps.len(),
        stamina = stamina.stamina,
        consistency,
        tactical,
        "movement: analyzed"
    );

    EnhancedMetrics {
        status: DataStatus::Measured,
        base: base.clone(),
        avg_speed: mean(&speeds),
        max_speed: speeds.iter().copied().fold(0.0, f64::max),
        stamina: stamina.stamina,
        consistency,
        recovery_speed: stamina.recovery_speed,
        acceleration_profile: profile,
        tactical_awareness: tactical,
        directional_data: directional.data,
        positional_heatmap: heatmap,
        zone_transitions: transitions,
        total_movement: directional.total_movement,
        direction_changes: directional.direction_changes,
        sample_count: points.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::kinematics::extract_kinematics;
    use crate::models::BodyPart;
    use crate::test_fixtures::*;

    fn analyze(stream: &[PositionSample]) -> EnhancedMetrics {
        let cfg = AnalysisConfig::default();
        let base = extract_kinematics(stream, &cfg).unwrap_or_default();
        analyze_enhanced(stream, &base, &cfg)
    }

    #[test]
    fn test_short_stream_returns_default() {
        let metrics = analyze(&linear_stream(4, 200.0, 10.0, 0.0));
        assert_eq!(metrics.status, DataStatus::InsufficientData);
        assert_eq!(metrics.stamina, 0.0);
        assert_eq!(metrics.directional_data, DirectionalData::default());
        assert!(metrics.positional_heatmap.is_empty());
        assert_eq!(metrics.sample_count, 4);
        // base passes through
        assert_eq!(metrics.base.speeds.len(), 3);
    }

    #[test]
    fn test_invalid_boxes_do_not_count() {
        let mut stream = linear_stream(6, 200.0, 10.0, 0.0);
        stream[2].bbox.width = 0.0;
        stream[4].bbox.height = f64::NAN;
        let metrics = analyze(&stream);
        assert_eq!(metrics.status, DataStatus::InsufficientData);
    }

    #[test]
    fn test_sideways_run() {
        let metrics = analyze(&linear_stream(8, 200.0, 10.0, 0.0));
        assert_eq!(metrics.status, DataStatus::Measured);
        assert!((metrics.directional_data.sideways - 1.0).abs() < 1e-9);
        assert!((metrics.total_movement - 70.0).abs() < 1e-9);
        assert_eq!(metrics.direction_changes, 0);
        // 10 px per 200 ms
        assert!((metrics.avg_speed - 50.0).abs() < 1e-9);
        assert!((metrics.max_speed - 50.0).abs() < 1e-9);
        assert!((metrics.consistency - 100.0).abs() < 1e-6);
        assert_eq!(metrics.positional_heatmap.len(), 8);
        assert_eq!(metrics.acceleration_profile, AccelerationProfile::default());
    }

    #[test]
    fn test_forward_run_counts_transition() {
        // from y=300 upward past the 240 midline
        let metrics = analyze(&linear_stream(8, 200.0, 0.0, -20.0));
        assert!((metrics.directional_data.forward - 1.0).abs() < 1e-9);
        assert_eq!(metrics.zone_transitions.defensive_to_offensive, 1);
        assert_eq!(metrics.zone_transitions.offensive_to_defensive, 0);
    }

    #[test]
    fn test_stationary_subject() {
        let metrics = analyze(&linear_stream(6, 200.0, 0.0, 0.0));
        assert_eq!(metrics.status, DataStatus::Measured);
        assert_eq!(metrics.total_movement, 0.0);
        assert_eq!(metrics.directional_data.sum(), 0.0);
        assert!((metrics.recovery_speed - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scores_bounded() {
        let metrics = analyze(&zigzag_stream(30));
        for score in [metrics.stamina, metrics.consistency, metrics.tactical_awareness, metrics.zone_transitions.effectiveness] {
            assert!((0.0..=100.0).contains(&score), "score out of range: {}", score);
        }
        assert!((metrics.directional_data.sum() - 1.0).abs() < 1e-9);
        let accel_sum = metrics.acceleration_profile.sum();
        assert!(accel_sum == 0.0 || (accel_sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_centroid_speeds_survive_lost_hips() {
        let mut stream = linear_stream(8, 200.0, 10.0, 0.0);
        for sample in &mut stream {
            sample.keypoints.retain(|k| !matches!(k.part, BodyPart::LeftHip | BodyPart::RightHip));
        }
        let metrics = analyze(&stream);
        assert_eq!(metrics.status, DataStatus::Measured);
        assert!(metrics.base.speeds.is_empty());
        assert!((metrics.avg_speed - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_consistency_score() {
        assert_eq!(consistency_score(&[]), 100.0);
        assert!((consistency_score(&[10.0, 12.0, 10.0]) - 80.0).abs() < 1e-9);
        assert_eq!(consistency_score(&[0.0, 100.0]), 0.0);
    }
}
