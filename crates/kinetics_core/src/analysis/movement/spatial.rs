//! Positional heatmap and half-field zone transitions.

use fxhash::FxHashMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analysis::geometry::{clamp_score, grid_cell, ratio};
use crate::config::{FieldConfig, MovementConfig};
use crate::models::Point;

/// Weighted position, shared by heatmaps and hotspots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IntensityPoint {
    pub x: f64,
    pub y: f64,
    pub intensity: f64,
}

/// One heatmap entry per sample at its centroid. Intensity is the local dwell
/// density of the sample's grid cell relative to the busiest cell, mapped into
/// `[heatmap_floor, 1]`.
pub fn positional_heatmap(points: &[Point], field: &FieldConfig, cfg: &MovementConfig) -> Vec<IntensityPoint> {
    let cells: Vec<(usize, usize)> = points
        .iter()
        .map(|p| grid_cell(*p, field.width, field.height, cfg.heatmap_grid))
        .collect();

    let mut counts: FxHashMap<(usize, usize), usize> = FxHashMap::default();
    for cell in &cells {
        *counts.entry(*cell).or_insert(0) += 1;
    }
    let busiest = counts.values().copied().max().unwrap_or(0) as f64;

    points
        .iter()
        .zip(&cells)
        .map(|(p, cell)| {
            let dwell = ratio(counts.get(cell).copied().unwrap_or(0) as f64, busiest);
            IntensityPoint {
                x: p.x,
                y: p.y,
                intensity: cfg.heatmap_floor + (1.0 - cfg.heatmap_floor) * dwell,
            }
        })
        .collect()
}

/// Half of the tracked area a point sits in, split at the midline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldHalf {
    Defensive,
    Offensive,
}

impl FieldHalf {
    /// Above the midline (smaller y) is offensive.
    pub fn of(point: Point, field: &FieldConfig) -> Self {
        if point.y < field.midline_y {
            FieldHalf::Offensive
        } else {
            FieldHalf::Defensive
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ZoneTransitions {
    pub defensive_to_offensive: u32,
    pub offensive_to_defensive: u32,
    /// Bounded composite of transition rate and movement efficiency, 0-100
    pub effectiveness: f64,
}

/// Count midline crossings between consecutive centroids.
pub fn zone_transitions(
    points: &[Point],
    duration_ms: f64,
    movement_efficiency: f64,
    field: &FieldConfig,
) -> ZoneTransitions {
    let mut defensive_to_offensive = 0u32;
    let mut offensive_to_defensive = 0u32;

    for pair in points.windows(2) {
        match (FieldHalf::of(pair[0], field), FieldHalf::of(pair[1], field)) {
            (FieldHalf::Defensive, FieldHalf::Offensive) => defensive_to_offensive += 1,
            (FieldHalf::Offensive, FieldHalf::Defensive) => offensive_to_defensive += 1,
            _ => {}
        }
    }

    let transitions = (defensive_to_offensive + offensive_to_defensive) as f64;
    let per_minute = ratio(transitions, duration_ms / 60_000.0);
    let effectiveness = clamp_score(0.5 * movement_efficiency + 0.5 * (10.0 * per_minute).min(100.0));

    ZoneTransitions { defensive_to_offensive, offensive_to_defensive, effectiveness }
}
