use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use std::cmp::Ordering;

use super::keypoint::{BodyPart, BoundingBox, Keypoint, Point};

/// One detection instant for a tracked subject.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct PositionSample {
    pub frame_index: u32,
    pub timestamp_ms: f64,
    #[serde(default)]
    pub keypoints: Vec<Keypoint>,
    pub bbox: BoundingBox,
    #[serde(default)]
    pub confidence: f64,
}

impl PositionSample {
    /// Landmark lookup. Keypoints below `min_confidence` or with non-finite
    /// coordinates count as absent.
    pub fn keypoint(&self, part: BodyPart, min_confidence: f64) -> Option<&Keypoint> {
        self.keypoints.iter().find(|kp| {
            kp.part == part && kp.confidence >= min_confidence && kp.x.is_finite() && kp.y.is_finite()
        })
    }

    pub fn point(&self, part: BodyPart, min_confidence: f64) -> Option<Point> {
        self.keypoint(part, min_confidence).map(Keypoint::position)
    }

    /// Midpoint of the two hips, if both are present.
    pub fn hip_center(&self, min_confidence: f64) -> Option<Point> {
        let left = self.point(BodyPart::LeftHip, min_confidence)?;
        let right = self.point(BodyPart::RightHip, min_confidence)?;
        Some(left.midpoint(&right))
    }

    /// Bounding-box centroid, if the box is usable.
    pub fn centroid(&self) -> Option<Point> {
        self.bbox.is_valid().then(|| self.bbox.centroid())
    }
}

/// Whether an analyzer result was measured or is the documented default for
/// a stream too short to analyze.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DataStatus {
    #[default]
    Measured,
    InsufficientData,
}

impl DataStatus {
    pub fn is_measured(self) -> bool {
        self == DataStatus::Measured
    }
}

/// Returns the stream ordered by timestamp, ties broken by frame index and
/// then by content.
///
/// Input order is never trusted; every analyzer sorts through here.
pub fn sort_stream(samples: &[PositionSample]) -> Vec<PositionSample> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| {
        a.timestamp_ms
            .total_cmp(&b.timestamp_ms)
            .then(a.frame_index.cmp(&b.frame_index))
            .then_with(|| content_cmp(a, b))
    });
    sorted
}

/// Total order over everything but the ordering keys.
fn content_cmp(a: &PositionSample, b: &PositionSample) -> Ordering {
    let bbox = |s: &PositionSample| [s.bbox.x, s.bbox.y, s.bbox.width, s.bbox.height, s.confidence];
    let ord = bbox(a)
        .iter()
        .zip(bbox(b).iter())
        .fold(Ordering::Equal, |acc, (x, y)| acc.then(x.total_cmp(y)))
        .then(a.keypoints.len().cmp(&b.keypoints.len()));

    a.keypoints.iter().zip(&b.keypoints).fold(ord, |acc, (ka, kb)| {
        acc.then(ka.part.tag().cmp(&kb.part.tag()))
            .then(ka.x.total_cmp(&kb.x))
            .then(ka.y.total_cmp(&kb.y))
            .then(ka.confidence.total_cmp(&kb.confidence))
    })
}

/// Elapsed seconds between two timestamps, or `None` when the pair must be
/// skipped (duplicate, out-of-order or non-finite timestamps).
pub fn elapsed_secs(t0_ms: f64, t1_ms: f64) -> Option<f64> {
    let dt_ms = t1_ms - t0_ms;
    if dt_ms > 0.0 && dt_ms.is_finite() {
        Some(dt_ms / 1000.0)
    } else {
        None
    }
}
