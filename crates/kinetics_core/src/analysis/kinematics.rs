//! # Kinematic Extractor
//!
//! Derives speed, acceleration, distance and joint angles from a position
//! stream.
//!
//! ## Algorithm
//! 1. Sort the stream by timestamp
//! 2. For each consecutive pair, take the hip centre (midpoint of both hips)
//! 3. speed = distance / elapsed seconds; pairs with elapsed <= 0 are skipped
//! 4. acceleration = (speed_i - speed_{i-1}) / elapsed of step i
//! 5. Knee (hip-knee-ankle) and hip (shoulder-hip-knee) angles per sample,
//!    only where all three landmarks are present

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{AnalysisConfig, KinematicsConfig};
use crate::models::{elapsed_secs, sort_stream, BodyPart, Point, PositionSample};

use super::geometry::{angle_between, clamp_score, coefficient_of_variation, distance, mean, ratio, std_dev};

/// Named speed range used to bucket time-in-zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SpeedZone {
    Walking,
    Jogging,
    Running,
    Sprinting,
}

impl SpeedZone {
    pub fn classify(speed: f64, cfg: &KinematicsConfig) -> Self {
        if speed >= cfg.sprinting_speed {
            SpeedZone::Sprinting
        } else if speed >= cfg.running_speed {
            SpeedZone::Running
        } else if speed >= cfg.jogging_speed {
            SpeedZone::Jogging
        } else {
            SpeedZone::Walking
        }
    }
}

/// Elapsed time spent in each speed zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpeedZones {
    pub walking_ms: f64,
    pub jogging_ms: f64,
    pub running_ms: f64,
    pub sprinting_ms: f64,
}

impl SpeedZones {
    fn add(&mut self, zone: SpeedZone, elapsed_ms: f64) {
        match zone {
            SpeedZone::Walking => self.walking_ms += elapsed_ms,
            SpeedZone::Jogging => self.jogging_ms += elapsed_ms,
            SpeedZone::Running => self.running_ms += elapsed_ms,
            SpeedZone::Sprinting => self.sprinting_ms += elapsed_ms,
        }
    }

    pub fn total_ms(&self) -> f64 {
        self.walking_ms + self.jogging_ms + self.running_ms + self.sprinting_ms
    }
}

/// Per-stream kinematic series. Computed once, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KinematicSeries {
    /// Hip-centre speed per accepted step (px/s)
    pub speeds: Vec<f64>,
    /// Change of speed between accepted steps (px/s^2)
    pub accelerations: Vec<f64>,
    /// Sum of accepted step distances (px)
    pub total_distance: f64,
    pub avg_speed: f64,
    pub max_speed: f64,
    /// Hip-knee-ankle angle per sample where all three landmarks exist (deg)
    pub knee_angles: Vec<f64>,
    /// Shoulder-hip-knee angle per sample where all three landmarks exist (deg)
    pub hip_angles: Vec<f64>,
    /// Posture stability score, 0-100
    pub balance_score: f64,
    /// Path straightness and speed smoothness score, 0-100
    pub movement_efficiency: f64,
    pub speed_zones: SpeedZones,
    /// First to last sample timestamp (ms)
    pub duration_ms: f64,
    /// Pairs dropped for missing hips or degenerate timing
    pub skipped_pairs: usize,
}

/// Extract the kinematic series of a stream.
///
/// Returns `None` for fewer than two samples. A stream whose pairs are all
/// skipped still yields a series, with empty speed vectors.
pub fn extract_kinematics(samples: &[PositionSample], config: &AnalysisConfig) -> Option<KinematicSeries> {
    if samples.len() < 2 {
        debug!(samples = samples.len(), "kinematics: stream too short");
        return None;
    }

    let cfg = &config.kinematics;
    let min_conf = cfg.min_keypoint_confidence;
    let sorted = sort_stream(samples);

    let mut speeds = Vec::with_capacity(sorted.len() - 1);
    let mut accelerations = Vec::with_capacity(sorted.len().saturating_sub(2));
    let mut total_distance = 0.0;
    let mut speed_zones = SpeedZones::default();
    let mut skipped_pairs = 0usize;

    for pair in sorted.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        let (Some(p0), Some(p1)) = (prev.hip_center(min_conf), curr.hip_center(min_conf)) else {
            skipped_pairs += 1;
            continue;
        };
        let Some(dt) = elapsed_secs(prev.timestamp_ms, curr.timestamp_ms) else {
            skipped_pairs += 1;
            continue;
        };

        let step = distance(p0, p1);
        let speed = step / dt;
        if let Some(&prev_speed) = speeds.last() {
            accelerations.push((speed - prev_speed) / dt);
        }
        speeds.push(speed);
        total_distance += step;
        speed_zones.add(SpeedZone::classify(speed, cfg), dt * 1000.0);
    }

    if speeds.is_empty() {
        warn!(samples = sorted.len(), skipped_pairs, "kinematics: no usable hip pairs");
    }

    let knee_angles = joint_angles(&sorted, min_conf, KNEE_CHAINS);
    let hip_angles = joint_angles(&sorted, min_conf, HIP_CHAINS);

    let avg_speed = mean(&speeds);
    let max_speed = speeds.iter().copied().fold(0.0, f64::max);
    let speed_cv = coefficient_of_variation(&speeds);

    let balance_score = if hip_angles.len() >= 2 {
        clamp_score(100.0 - 2.0 * std_dev(&hip_angles))
    } else {
        clamp_score(100.0 - 50.0 * speed_cv)
    };

    let straightness = net_displacement(&sorted, min_conf)
        .map(|net| ratio(net, total_distance).min(1.0))
        .unwrap_or(0.0);
    let smoothness = 1.0 / (1.0 + speed_cv);
    let movement_efficiency = clamp_score(100.0 * (0.5 * straightness + 0.5 * smoothness));

    let duration_ms = match (sorted.first(), sorted.last()) {
        (Some(first), Some(last)) => (last.timestamp_ms - first.timestamp_ms).max(0.0),
        _ => 0.0,
    };

    debug!(
        steps = speeds.len(),
        skipped_pairs,
        total_distance,
        "kinematics: extracted"
    );

    Some(KinematicSeries {
        speeds,
        accelerations,
        total_distance,
        avg_speed,
        max_speed,
        knee_angles,
        hip_angles,
        balance_score,
        movement_efficiency,
        speed_zones,
        duration_ms,
        skipped_pairs,
    })
}

type Chain = [BodyPart; 3];

const KNEE_CHAINS: [Chain; 2] = [
    [BodyPart::LeftHip, BodyPart::LeftKnee, BodyPart::LeftAnkle],
    [BodyPart::RightHip, BodyPart::RightKnee, BodyPart::RightAnkle],
];

const HIP_CHAINS: [Chain; 2] = [
    [BodyPart::LeftShoulder, BodyPart::LeftHip, BodyPart::LeftKnee],
    [BodyPart::RightShoulder, BodyPart::RightHip, BodyPart::RightKnee],
];

/// One angle per sample, left side first, right side as fallback.
fn joint_angles(samples: &[PositionSample], min_conf: f64, chains: [Chain; 2]) -> Vec<f64> {
    samples
        .iter()
        .filter_map(|sample| {
            chains.iter().find_map(|[a, vertex, c]| {
                let a = sample.point(*a, min_conf)?;
                let vertex = sample.point(*vertex, min_conf)?;
                let c = sample.point(*c, min_conf)?;
                Some(angle_between(a, vertex, c))
            })
        })
        .collect()
}

/// Straight-line distance between the first and last available hip centres.
fn net_displacement(samples: &[PositionSample], min_conf: f64) -> Option<f64> {
    let first: Point = samples.iter().find_map(|s| s.hip_center(min_conf))?;
    let last: Point = samples.iter().rev().find_map(|s| s.hip_center(min_conf))?;
    Some(distance(first, last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::*;

    #[test]
    fn test_too_short_stream() {
        let cfg = AnalysisConfig::default();
        assert!(extract_kinematics(&[], &cfg).is_none());
        assert!(extract_kinematics(&[posed_sample(0, 0.0, 100.0, 100.0)], &cfg).is_none());
    }

    #[test]
    fn test_two_sample_constant_velocity() {
        // 50 px in 0.5 s = 100 px/s
        let stream = vec![posed_sample(0, 0.0, 100.0, 200.0), posed_sample(1, 500.0, 150.0, 200.0)];
        let series = extract_kinematics(&stream, &AnalysisConfig::default()).unwrap();

        assert_eq!(series.speeds.len(), 1);
        assert!((series.speeds[0] - 100.0).abs() < 1e-9);
        assert!(series.accelerations.is_empty());
        assert!((series.total_distance - 50.0).abs() < 1e-9);
        assert!((series.avg_speed - 100.0).abs() < 1e-9);
        assert!((series.duration_ms - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_acceleration_between_steps() {
        let stream = vec![
            posed_sample(0, 0.0, 0.0, 200.0),
            posed_sample(1, 1000.0, 10.0, 200.0),
            posed_sample(2, 2000.0, 40.0, 200.0),
        ];
        let series = extract_kinematics(&stream, &AnalysisConfig::default()).unwrap();
        assert_eq!(series.speeds, vec![10.0, 30.0]);
        assert_eq!(series.accelerations.len(), 1);
        assert!((series.accelerations[0] - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let forward = linear_stream(6, 200.0, 10.0, 0.0);
        let mut reversed = forward.clone();
        reversed.reverse();
        let cfg = AnalysisConfig::default();
        assert_eq!(extract_kinematics(&forward, &cfg), extract_kinematics(&reversed, &cfg));
    }

    #[test]
    fn test_duplicate_timestamp_pair_skipped() {
        let stream = vec![
            posed_sample(0, 0.0, 0.0, 200.0),
            posed_sample(1, 0.0, 10.0, 200.0),
            posed_sample(2, 1000.0, 20.0, 200.0),
        ];
        let series = extract_kinematics(&stream, &AnalysisConfig::default()).unwrap();
        assert_eq!(series.skipped_pairs, 1);
        assert_eq!(series.speeds.len(), 1);
        assert!(series.speeds.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_missing_keypoints_skip_angles_not_zero_fill() {
        let mut stream = linear_stream(4, 200.0, 5.0, 0.0);
        stream[1].keypoints.retain(|kp| {
            !matches!(kp.part, BodyPart::LeftAnkle | BodyPart::RightAnkle)
        });
        let series = extract_kinematics(&stream, &AnalysisConfig::default()).unwrap();
        assert_eq!(series.knee_angles.len(), 3);
        assert_eq!(series.hip_angles.len(), 4);
        assert!(series.knee_angles.iter().all(|a| *a > 0.0));
    }

    #[test]
    fn test_missing_hips_skip_pair() {
        let mut stream = linear_stream(3, 200.0, 5.0, 0.0);
        stream[1].keypoints.retain(|kp| kp.part != BodyPart::LeftHip);
        let series = extract_kinematics(&stream, &AnalysisConfig::default()).unwrap();
        assert!(series.speeds.is_empty());
        assert_eq!(series.skipped_pairs, 2);
    }

    #[test]
    fn test_straight_steady_run_is_efficient() {
        let series = extract_kinematics(&linear_stream(10, 100.0, 8.0, 0.0), &AnalysisConfig::default()).unwrap();
        assert!(series.movement_efficiency > 99.0, "got {}", series.movement_efficiency);
        assert!(series.balance_score > 90.0);
    }

    #[test]
    fn test_speed_zones_cover_elapsed_time() {
        let series = extract_kinematics(&linear_stream(6, 200.0, 80.0, 0.0), &AnalysisConfig::default()).unwrap();
        // 80 px per 0.2 s = 400 px/s, all sprinting
        assert!((series.speed_zones.sprinting_ms - 1000.0).abs() < 1e-9);
        assert!((series.speed_zones.total_ms() - 1000.0).abs() < 1e-9);
    }
}
