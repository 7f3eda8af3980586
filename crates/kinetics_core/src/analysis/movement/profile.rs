//! Directional distribution and acceleration-profile classification.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analysis::geometry::{heading_deg, ratio};
use crate::config::MovementConfig;

use super::MovementStep;

/// Direction bucket of a displacement vector (screen coordinates, y down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Forward,
    Backward,
    Sideways,
}

impl MoveDirection {
    /// `|angle| < 45` or `|angle| > 135` is sideways, `(-135, -45)` is
    /// forward (up the frame), everything else backward.
    pub fn classify(dx: f64, dy: f64) -> Self {
        let angle = heading_deg(dx, dy);
        if angle.abs() < 45.0 || angle.abs() > 135.0 {
            MoveDirection::Sideways
        } else if angle > -135.0 && angle < -45.0 {
            MoveDirection::Forward
        } else {
            MoveDirection::Backward
        }
    }
}

/// Share of scalar path length per direction bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DirectionalData {
    pub forward: f64,
    pub backward: f64,
    pub sideways: f64,
}

impl DirectionalData {
    pub fn sum(&self) -> f64 {
        self.forward + self.backward + self.sideways
    }
}

/// Directional shares plus the number of bucket changes between steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectionalSummary {
    pub data: DirectionalData,
    pub total_movement: f64,
    pub direction_changes: usize,
}

/// Distribute step distances over the three direction buckets.
///
/// Zero-length steps carry no direction and neither count as a change.
pub fn directional_distribution(steps: &[MovementStep]) -> DirectionalSummary {
    let mut forward = 0.0;
    let mut backward = 0.0;
    let mut sideways = 0.0;
    let mut direction_changes = 0usize;
    let mut last_direction: Option<MoveDirection> = None;

    for step in steps {
        if step.distance <= 0.0 {
            continue;
        }
        let direction = MoveDirection::classify(step.to.x - step.from.x, step.to.y - step.from.y);
        match direction {
            MoveDirection::Forward => forward += step.distance,
            MoveDirection::Backward => backward += step.distance,
            MoveDirection::Sideways => sideways += step.distance,
        }
        if last_direction.is_some_and(|last| last != direction) {
            direction_changes += 1;
        }
        last_direction = Some(direction);
    }

    let total_movement = forward + backward + sideways;
    DirectionalSummary {
        data: DirectionalData {
            forward: ratio(forward, total_movement),
            backward: ratio(backward, total_movement),
            sideways: ratio(sideways, total_movement),
        },
        total_movement,
        direction_changes,
    }
}

/// Class of a speed change between two consecutive steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccelerationClass {
    Explosive,
    Sustained,
    Deceleration,
}

impl AccelerationClass {
    /// `None` when the change is below the sustained threshold.
    pub fn classify(prev_speed: f64, speed: f64, dt_s: f64, cfg: &MovementConfig) -> Option<Self> {
        if dt_s <= 0.0 {
            return None;
        }
        let acceleration = (speed - prev_speed).abs() / dt_s;
        if speed > prev_speed && acceleration > cfg.explosive_acceleration {
            Some(AccelerationClass::Explosive)
        } else if speed > prev_speed && acceleration > cfg.sustained_acceleration {
            Some(AccelerationClass::Sustained)
        } else if speed < prev_speed && acceleration > cfg.sustained_acceleration {
            Some(AccelerationClass::Deceleration)
        } else {
            None
        }
    }
}

/// Share of classified acceleration events per class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AccelerationProfile {
    pub explosive: f64,
    pub sustained: f64,
    pub deceleration: f64,
}

impl AccelerationProfile {
    pub fn sum(&self) -> f64 {
        self.explosive + self.sustained + self.deceleration
    }
}

/// Classify every consecutive speed change. `speeds[i]` was reached over
/// `dts[i]` seconds.
pub fn acceleration_profile(speeds: &[f64], dts: &[f64], cfg: &MovementConfig) -> AccelerationProfile {
    let mut explosive = 0usize;
    let mut sustained = 0usize;
    let mut deceleration = 0usize;

    for i in 1..speeds.len().min(dts.len()) {
        match AccelerationClass::classify(speeds[i - 1], speeds[i], dts[i], cfg) {
            Some(AccelerationClass::Explosive) => explosive += 1,
            Some(AccelerationClass::Sustained) => sustained += 1,
            Some(AccelerationClass::Deceleration) => deceleration += 1,
            None => {}
        }
    }

    let events = (explosive + sustained + deceleration) as f64;
    AccelerationProfile {
        explosive: ratio(explosive as f64, events),
        sustained: ratio(sustained as f64, events),
        deceleration: ratio(deceleration as f64, events),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    fn step(dx: f64, dy: f64) -> MovementStep {
        let from = Point::new(100.0, 100.0);
        let to = Point::new(100.0 + dx, 100.0 + dy);
        MovementStep {
            from,
            to,
            distance: (dx * dx + dy * dy).sqrt(),
            dt_s: 0.2,
            speed: (dx * dx + dy * dy).sqrt() / 0.2,
            timestamp_ms: 0.0,
        }
    }

    #[test]
    fn test_direction_buckets() {
        assert_eq!(MoveDirection::classify(10.0, 0.0), MoveDirection::Sideways);
        assert_eq!(MoveDirection::classify(-10.0, 1.0), MoveDirection::Sideways);
        assert_eq!(MoveDirection::classify(0.0, -10.0), MoveDirection::Forward);
        assert_eq!(MoveDirection::classify(0.0, 10.0), MoveDirection::Backward);
    }

    #[test]
    fn test_directional_fractions_sum_to_one() {
        let steps = vec![step(10.0, 0.0), step(0.0, -10.0), step(0.0, 20.0)];
        let summary = directional_distribution(&steps);
        assert!((summary.data.sum() - 1.0).abs() < 1e-9);
        assert!((summary.data.backward - 0.5).abs() < 1e-9);
        assert_eq!(summary.direction_changes, 2);
    }

    #[test]
    fn test_no_movement_yields_zero_triple() {
        let steps = vec![step(0.0, 0.0), step(0.0, 0.0)];
        let summary = directional_distribution(&steps);
        assert_eq!(summary.total_movement, 0.0);
        assert_eq!(summary.data, DirectionalData::default());
    }

    #[test]
    fn test_acceleration_classes() {
        let cfg = MovementConfig::default();
        assert_eq!(AccelerationClass::classify(0.0, 10.0, 1.0, &cfg), Some(AccelerationClass::Explosive));
        assert_eq!(AccelerationClass::classify(0.0, 3.0, 1.0, &cfg), Some(AccelerationClass::Sustained));
        assert_eq!(AccelerationClass::classify(10.0, 0.0, 1.0, &cfg), Some(AccelerationClass::Deceleration));
        assert_eq!(AccelerationClass::classify(10.0, 11.0, 1.0, &cfg), None);
    }

    #[test]
    fn test_acceleration_profile_without_events_is_zero() {
        let cfg = MovementConfig::default();
        let profile = acceleration_profile(&[5.0, 5.0, 5.0], &[0.2, 0.2, 0.2], &cfg);
        assert_eq!(profile, AccelerationProfile::default());

        let profile = acceleration_profile(&[0.0, 10.0, 0.0], &[1.0, 1.0, 1.0], &cfg);
        assert!((profile.sum() - 1.0).abs() < 1e-9);
        assert!((profile.explosive - 0.5).abs() < 1e-9);
        assert!((profile.deceleration - 0.5).abs() < 1e-9);
    }
}
