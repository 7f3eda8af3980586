//! Synthetic pose streams shared by the unit tests.

use crate::models::{BodyPart, BoundingBox, Keypoint, PositionSample};

const CONF: f64 = 0.9;

/// Upright figure with its hip centre and box centroid both at `(x, y)`.
/// Knees are slightly bent and the face looks straight down the frame.
pub fn posed_sample(frame: u32, t: f64, x: f64, y: f64) -> PositionSample {
    let kp = |part, px, py| Keypoint::new(part, px, py, CONF);
    PositionSample {
        frame_index: frame,
        timestamp_ms: t,
        keypoints: vec![
            kp(BodyPart::Nose, x, y - 95.0),
            kp(BodyPart::LeftEye, x - 5.0, y - 100.0),
            kp(BodyPart::RightEye, x + 5.0, y - 100.0),
            kp(BodyPart::LeftShoulder, x - 15.0, y - 60.0),
            kp(BodyPart::RightShoulder, x + 15.0, y - 60.0),
            kp(BodyPart::LeftHip, x - 10.0, y),
            kp(BodyPart::RightHip, x + 10.0, y),
            kp(BodyPart::LeftKnee, x - 5.0, y + 50.0),
            kp(BodyPart::RightKnee, x + 5.0, y + 50.0),
            kp(BodyPart::LeftAnkle, x - 10.0, y + 100.0),
            kp(BodyPart::RightAnkle, x + 10.0, y + 100.0),
        ],
        bbox: BoundingBox::new(x - 30.0, y - 80.0, 60.0, 160.0),
        confidence: CONF,
    }
}

/// `n` samples moving by `(dx, dy)` every `dt_ms`, starting at (100, 300).
pub fn linear_stream(n: usize, dt_ms: f64, dx: f64, dy: f64) -> Vec<PositionSample> {
    (0..n)
        .map(|i| {
            let k = i as f64;
            posed_sample(i as u32, k * dt_ms, 100.0 + k * dx, 300.0 + k * dy)
        })
        .collect()
}

/// Steady sideways drift with a 25 px vertical hop on every odd sample and
/// alternating 150 / 250 ms frame gaps.
pub fn zigzag_stream(n: usize) -> Vec<PositionSample> {
    let mut t = 0.0;
    (0..n)
        .map(|i| {
            if i > 0 {
                t += if i % 2 == 1 { 150.0 } else { 250.0 };
            }
            let y = if i % 2 == 1 { 325.0 } else { 300.0 };
            posed_sample(i as u32, t, 100.0 + 15.0 * i as f64, y)
        })
        .collect()
}

/// Stationary figure whose gaze cycles right, down, left, up on every sample.
pub fn scanning_stream(n: usize, dt_ms: f64) -> Vec<PositionSample> {
    const OFFSETS: [(f64, f64); 4] = [(6.0, 0.0), (0.0, 6.0), (-6.0, 0.0), (0.0, -6.0)];
    (0..n)
        .map(|i| {
            let mut sample = posed_sample(i as u32, i as f64 * dt_ms, 320.0, 300.0);
            let (ox, oy) = OFFSETS[i % 4];
            for kp in sample.keypoints.iter_mut().filter(|kp| kp.part == BodyPart::Nose) {
                kp.x = 320.0 + ox;
                kp.y = 200.0 + oy;
            }
            sample
        })
        .collect()
}
