//! # Models
//!
//! Input records produced by the upstream detector.
//!
//! - `keypoint` - landmarks, bounding boxes, points
//! - `sample` - per-frame position samples and stream ordering

pub mod keypoint;
pub mod sample;

pub use keypoint::{BodyPart, BoundingBox, Keypoint, Point};
pub use sample::{elapsed_secs, sort_stream, DataStatus, PositionSample};
