//! # Geometry
//!
//! Pure 2-D helpers shared by every analyzer.

use crate::models::Point;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Interior angle at `vertex` formed by `a` and `c`, in degrees within [0, 180].
pub fn angle_between(a: Point, vertex: Point, c: Point) -> f64 {
    let to_a = (a.y - vertex.y).atan2(a.x - vertex.x);
    let to_c = (c.y - vertex.y).atan2(c.x - vertex.x);
    let angle = (to_c - to_a).to_degrees().abs();
    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}

/// Heading of a displacement in degrees, `atan2(dy, dx)`, within (-180, 180].
#[inline]
pub fn heading_deg(dx: f64, dy: f64) -> f64 {
    dy.atan2(dx).to_degrees()
}

/// Smallest absolute difference between two headings, in [0, 180].
pub fn heading_difference(a_deg: f64, b_deg: f64) -> f64 {
    let diff = (b_deg - a_deg).rem_euclid(360.0);
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

/// Arithmetic mean, 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation, 0 for an empty slice.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Coefficient of variation, 0 when the mean is not positive.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let m = mean(values);
    if m > 0.0 {
        std_dev(values) / m
    } else {
        0.0
    }
}

/// Ratio with an explicit zero default for a non-positive denominator.
#[inline]
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Clamp into the score range [0, 100]; NaN maps to 0.
#[inline]
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Grid cell of a point over a `width` x `height` area split into `cells`
/// per axis. Points outside the area land in the nearest edge cell.
pub fn grid_cell(point: Point, width: f64, height: f64, cells: usize) -> (usize, usize) {
    let last = cells.saturating_sub(1);
    let axis = |v: f64, extent: f64| -> usize {
        let scaled = (v / extent * cells as f64).floor();
        if scaled.is_nan() || scaled < 0.0 {
            0
        } else {
            (scaled as usize).min(last)
        }
    };
    (axis(point.x, width), axis(point.y, height))
}

/// Centre of a grid cell in area coordinates.
pub fn cell_center(cell: (usize, usize), width: f64, height: f64, cells: usize) -> Point {
    let cw = width / cells as f64;
    let ch = height / cells as f64;
    Point::new((cell.0 as f64 + 0.5) * cw, (cell.1 as f64 + 0.5) * ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        assert!((distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_angle_between_right_angle() {
        let angle = angle_between(Point::new(0.0, 10.0), Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_between_straight_leg() {
        // hip above knee above ankle
        let angle = angle_between(Point::new(5.0, 0.0), Point::new(5.0, 50.0), Point::new(5.0, 100.0));
        assert!((angle - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_between_wraps_reflex() {
        let angle = angle_between(Point::new(-1.0, -0.01), Point::new(0.0, 0.0), Point::new(-1.0, 0.01));
        assert!(angle < 2.0, "reflex angle should fold below 180: {}", angle);
    }

    #[test]
    fn test_heading_difference() {
        assert!((heading_difference(170.0, -170.0) - 20.0).abs() < 1e-9);
        assert!((heading_difference(0.0, 90.0) - 90.0).abs() < 1e-9);
        assert!((heading_difference(-90.0, 90.0) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_std_dev_and_cv() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((std_dev(&values) - 2.0).abs() < 1e-12);
        assert!((coefficient_of_variation(&values) - 0.4).abs() < 1e-12);
        assert_eq!(coefficient_of_variation(&[]), 0.0);
    }

    #[test]
    fn test_grid_cell_clamps_edges() {
        assert_eq!(grid_cell(Point::new(0.0, 0.0), 640.0, 480.0, 20), (0, 0));
        assert_eq!(grid_cell(Point::new(640.0, 480.0), 640.0, 480.0, 20), (19, 19));
        assert_eq!(grid_cell(Point::new(-5.0, 1000.0), 640.0, 480.0, 20), (0, 19));
        assert_eq!(grid_cell(Point::new(33.0, 25.0), 640.0, 480.0, 20), (1, 1));
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(120.0), 100.0);
        assert_eq!(clamp_score(-3.0), 0.0);
        assert_eq!(clamp_score(f64::NAN), 0.0);
    }
}
