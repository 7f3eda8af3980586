//! Property tests over arbitrary, partially degraded pose streams.

use kinetics_core::analysis::{analyze_enhanced, extract_kinematics, predict_trajectory};
use kinetics_core::{
    analyze_stream, stream_digest, AnalysisConfig, BodyPart, BoundingBox, DataStatus, Keypoint,
    PositionSample,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Frame {
    x: f64,
    y: f64,
    dt_ms: u32,
    nose: (f64, f64),
    drop_mask: u8,
    valid_box: bool,
}

fn frame() -> impl Strategy<Value = Frame> {
    (
        0.0f64..640.0,
        0.0f64..480.0,
        0u32..300,
        (-8.0f64..8.0, -8.0f64..8.0),
        0u8..8,
        prop::bool::weighted(0.9),
    )
        .prop_map(|(x, y, dt_ms, nose, drop_mask, valid_box)| Frame { x, y, dt_ms, nose, drop_mask, valid_box })
}

/// Builds samples from generated frames. Timestamps are cumulative, so a zero
/// gap produces a duplicate timestamp.
fn build_stream(frames: &[Frame]) -> Vec<PositionSample> {
    let mut t = 0.0;
    frames
        .iter()
        .enumerate()
        .map(|(i, f)| {
            t += f.dt_ms as f64;
            let (x, y) = (f.x, f.y);
            let mut keypoints = vec![
                Keypoint::new(BodyPart::Nose, x + f.nose.0, y - 100.0 + f.nose.1, 0.9),
                Keypoint::new(BodyPart::LeftEye, x - 5.0, y - 100.0, 0.85),
                Keypoint::new(BodyPart::RightEye, x + 5.0, y - 100.0, 0.7),
                Keypoint::new(BodyPart::LeftShoulder, x - 15.0, y - 60.0, 0.9),
                Keypoint::new(BodyPart::RightShoulder, x + 15.0, y - 60.0, 0.9),
                Keypoint::new(BodyPart::LeftHip, x - 10.0, y, 0.9),
                Keypoint::new(BodyPart::RightHip, x + 10.0, y, 0.9),
                Keypoint::new(BodyPart::LeftKnee, x - 4.0, y + 50.0, 0.8),
                Keypoint::new(BodyPart::RightKnee, x + 6.0, y + 50.0, 0.8),
                Keypoint::new(BodyPart::LeftAnkle, x - 10.0, y + 100.0, 0.6),
                Keypoint::new(BodyPart::RightAnkle, x + 10.0, y + 100.0, 0.6),
            ];
            if f.drop_mask & 1 != 0 {
                keypoints.retain(|kp| kp.part != BodyPart::LeftHip);
            }
            if f.drop_mask & 2 != 0 {
                keypoints.retain(|kp| kp.part != BodyPart::Nose);
            }
            if f.drop_mask & 4 != 0 {
                keypoints.retain(|kp| !matches!(kp.part, BodyPart::LeftAnkle | BodyPart::RightAnkle));
            }
            let bbox = if f.valid_box {
                BoundingBox::new(x - 30.0, y - 80.0, 60.0, 160.0)
            } else {
                BoundingBox::new(x, y, 0.0, 160.0)
            };
            PositionSample { frame_index: i as u32, timestamp_ms: t, keypoints, bbox, confidence: 0.9 }
        })
        .collect()
}

fn stream() -> impl Strategy<Value = Vec<PositionSample>> {
    prop::collection::vec(frame(), 0..40).prop_map(|frames| build_stream(&frames))
}

fn in_score_range(v: f64) -> bool {
    (0.0..=100.0).contains(&v)
}

fn unit_or_zero(sum: f64) -> bool {
    sum == 0.0 || (sum - 1.0).abs() < 1e-9
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: every score lies in [0, 100] and every fraction triple sums to 1 or 0
    #[test]
    fn prop_scores_and_fractions_bounded(samples in stream()) {
        let analysis = analyze_stream(&samples, &AnalysisConfig::default());

        if let Some(k) = &analysis.kinematics {
            prop_assert!(in_score_range(k.balance_score));
            prop_assert!(in_score_range(k.movement_efficiency));
            prop_assert!(k.speeds.iter().all(|s| s.is_finite() && *s >= 0.0));
        }

        let m = &analysis.movement;
        for score in [m.stamina, m.consistency, m.tactical_awareness, m.zone_transitions.effectiveness] {
            prop_assert!(in_score_range(score), "movement score {}", score);
        }
        prop_assert!(unit_or_zero(m.directional_data.sum()));
        prop_assert!(unit_or_zero(m.acceleration_profile.sum()));
        prop_assert!(m.positional_heatmap.iter().all(|p| p.intensity > 0.0 && p.intensity <= 1.0));

        let g = &analysis.gaze;
        for score in [g.field_awareness, g.decision_speed, g.anticipation] {
            prop_assert!(in_score_range(score), "gaze score {}", score);
        }

        let p = &analysis.performance;
        for score in [p.technical_score, p.physical_score, p.tactical_score, p.overall_score] {
            prop_assert!((0..=100).contains(&score));
        }
        prop_assert!(p.breakdown.values().all(|v| in_score_range(*v)));
        prop_assert_eq!(p.improvement_areas.len(), p.recommendations.len());
    }

    /// Property: prediction confidence never increases with the step index
    #[test]
    fn prop_prediction_confidence_non_increasing(samples in stream()) {
        let prediction = predict_trajectory(&samples, &AnalysisConfig::default());
        for pair in prediction.predicted_positions.windows(2) {
            prop_assert!(pair[1].confidence <= pair[0].confidence);
        }
    }

    /// Property: hotspots are capped, ordered and above threshold
    #[test]
    fn prop_hotspots_ranked(samples in stream()) {
        let prediction = predict_trajectory(&samples, &AnalysisConfig::default());
        let hotspots = &prediction.potential_hotspots;
        prop_assert!(hotspots.len() <= 5);
        prop_assert!(hotspots.iter().all(|h| h.intensity > 0.05));
        for pair in hotspots.windows(2) {
            prop_assert!(pair[0].intensity >= pair[1].intensity);
        }
    }

    /// Property: input order does not matter once the stream is re-sorted
    #[test]
    fn prop_reversed_stream_same_output(samples in stream()) {
        let cfg = AnalysisConfig::default();
        let mut reversed = samples.clone();
        reversed.reverse();

        let forward = serde_json::to_string(&analyze_stream(&samples, &cfg)).unwrap();
        let backward = serde_json::to_string(&analyze_stream(&reversed, &cfg)).unwrap();
        prop_assert_eq!(forward, backward);
        prop_assert_eq!(stream_digest(&samples), stream_digest(&reversed));
    }

    /// Property: same input, same output
    #[test]
    fn prop_deterministic(samples in stream()) {
        let cfg = AnalysisConfig::default();
        let a = serde_json::to_string(&analyze_stream(&samples, &cfg)).unwrap();
        let b = serde_json::to_string(&analyze_stream(&samples, &cfg)).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Property: short streams get the default movement structure, never NaN
    #[test]
    fn prop_short_stream_default_movement(frames in prop::collection::vec(frame(), 0..5)) {
        let samples = build_stream(&frames);
        let cfg = AnalysisConfig::default();
        let base = extract_kinematics(&samples, &cfg).unwrap_or_default();
        let metrics = analyze_enhanced(&samples, &base, &cfg);

        prop_assert_eq!(metrics.status, DataStatus::InsufficientData);
        for v in [metrics.stamina, metrics.consistency, metrics.recovery_speed, metrics.tactical_awareness, metrics.total_movement] {
            prop_assert_eq!(v, 0.0);
        }
        prop_assert!(metrics.positional_heatmap.is_empty());
    }
}

#[test]
fn test_two_sample_constant_velocity() {
    // v = 120 px/s over 0.25 s
    let frames = vec![
        Frame { x: 100.0, y: 200.0, dt_ms: 0, nose: (0.0, 5.0), drop_mask: 0, valid_box: true },
        Frame { x: 130.0, y: 200.0, dt_ms: 250, nose: (0.0, 5.0), drop_mask: 0, valid_box: true },
    ];
    let series = extract_kinematics(&build_stream(&frames), &AnalysisConfig::default()).unwrap();
    assert_eq!(series.speeds.len(), 1);
    assert!((series.speeds[0] - 120.0).abs() < 1e-9);
    assert!(series.accelerations.is_empty());
    assert!((series.total_distance - 120.0 * 0.25).abs() < 1e-9);
}

#[test]
fn test_linear_motion_scenario() {
    let frames: Vec<Frame> = (0..6)
        .map(|i| Frame {
            x: 100.0 + 10.0 * i as f64,
            y: 300.0,
            dt_ms: if i == 0 { 0 } else { 200 },
            nose: (0.0, 5.0),
            drop_mask: 0,
            valid_box: true,
        })
        .collect();
    let prediction = predict_trajectory(&build_stream(&frames), &AnalysisConfig::default());

    assert!((prediction.x_line.slope - 50.0).abs() < 1e-9);
    assert!(prediction.y_line.slope.abs() < 1e-9);
    assert_eq!(prediction.next_direction_change.likelihood, 0.0);
    let xs: Vec<f64> = prediction.predicted_positions.iter().map(|p| p.x).collect();
    for pair in xs.windows(2) {
        assert!(pair[1] > pair[0]);
    }
}
