//! # Performance Aggregator
//!
//! Folds the movement analysis into eleven named breakdown metrics and the
//! technical / physical / tactical / overall scores, then ranks the metrics
//! into strengths and improvement areas.
//!
//! ## Inputs
//! - [`AnalysisInput::Enhanced`]: signals are read straight off the enhanced
//!   metrics.
//! - [`AnalysisInput::Base`]: only the kinematic series is known, so the
//!   enhanced signals are estimated from the raw stream with the same
//!   movement helpers, without the minimum-sample requirement.
//!
//! A measured [`GazeAnalysis`] can optionally be blended in.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AnalysisConfig, PerformanceConfig};
use crate::models::{sort_stream, DataStatus, Point, PositionSample};

use super::gaze::GazeAnalysis;
use super::geometry::{clamp_score, mean};
use super::kinematics::KinematicSeries;
use super::movement::{
    acceleration_profile, centroid_steps, consistency_score, directional_distribution, stamina_model,
    tactical_awareness, zone_transitions, EnhancedMetrics,
};

/// What the aggregator is fed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "metrics", rename_all = "snake_case")]
pub enum AnalysisInput {
    Base(KinematicSeries),
    Enhanced(EnhancedMetrics),
}

/// The eleven breakdown metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetricKey {
    Speed,
    Endurance,
    Agility,
    Control,
    Positioning,
    DecisionMaking,
    Explosiveness,
    RecoveryRate,
    TacticalAwareness,
    PressureResistance,
    Consistency,
}

impl MetricKey {
    pub const ALL: [MetricKey; 11] = [
        MetricKey::Speed,
        MetricKey::Endurance,
        MetricKey::Agility,
        MetricKey::Control,
        MetricKey::Positioning,
        MetricKey::DecisionMaking,
        MetricKey::Explosiveness,
        MetricKey::RecoveryRate,
        MetricKey::TacticalAwareness,
        MetricKey::PressureResistance,
        MetricKey::Consistency,
    ];

    /// Breakdown map key.
    pub fn key(self) -> &'static str {
        match self {
            MetricKey::Speed => "speed",
            MetricKey::Endurance => "endurance",
            MetricKey::Agility => "agility",
            MetricKey::Control => "control",
            MetricKey::Positioning => "positioning",
            MetricKey::DecisionMaking => "decision_making",
            MetricKey::Explosiveness => "explosiveness",
            MetricKey::RecoveryRate => "recovery_rate",
            MetricKey::TacticalAwareness => "tactical_awareness",
            MetricKey::PressureResistance => "pressure_resistance",
            MetricKey::Consistency => "consistency",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            MetricKey::Speed => "Speed",
            MetricKey::Endurance => "Endurance",
            MetricKey::Agility => "Agility",
            MetricKey::Control => "Control",
            MetricKey::Positioning => "Positioning",
            MetricKey::DecisionMaking => "Decision Making",
            MetricKey::Explosiveness => "Explosiveness",
            MetricKey::RecoveryRate => "Recovery Rate",
            MetricKey::TacticalAwareness => "Tactical Awareness",
            MetricKey::PressureResistance => "Pressure Resistance",
            MetricKey::Consistency => "Consistency",
        }
    }
}

/// Raw 0-100 inputs the breakdown metrics are blended from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    AvgSpeed,
    PeakSpeed,
    Stamina,
    Consistency,
    Lateral,
    Deceleration,
    Balance,
    Tactical,
    ZoneEffectiveness,
    Efficiency,
    Explosive,
    Recovery,
}

const WEIGHTS: [(MetricKey, &[(Signal, f64)]); 11] = [
    (MetricKey::Speed, &[(Signal::AvgSpeed, 0.6), (Signal::PeakSpeed, 0.4)]),
    (MetricKey::Endurance, &[(Signal::Stamina, 0.7), (Signal::Consistency, 0.3)]),
    (MetricKey::Agility, &[(Signal::Lateral, 0.4), (Signal::Deceleration, 0.3), (Signal::Balance, 0.3)]),
    (MetricKey::Control, &[(Signal::Balance, 0.5), (Signal::Consistency, 0.5)]),
    (MetricKey::Positioning, &[(Signal::Tactical, 0.6), (Signal::ZoneEffectiveness, 0.4)]),
    (
        MetricKey::DecisionMaking,
        &[(Signal::Tactical, 0.5), (Signal::Efficiency, 0.3), (Signal::Consistency, 0.2)],
    ),
    (MetricKey::Explosiveness, &[(Signal::Explosive, 0.6), (Signal::PeakSpeed, 0.4)]),
    (MetricKey::RecoveryRate, &[(Signal::Recovery, 0.7), (Signal::Stamina, 0.3)]),
    (MetricKey::TacticalAwareness, &[(Signal::Tactical, 1.0)]),
    (
        MetricKey::PressureResistance,
        &[(Signal::Stamina, 0.4), (Signal::Balance, 0.3), (Signal::Consistency, 0.3)],
    ),
    (MetricKey::Consistency, &[(Signal::Consistency, 1.0)]),
];

const GENERIC_RECOMMENDATION: &str =
    "Keep a balanced training schedule and re-assess this area after the next session.";

/// Canned recommendation for a breakdown metric key. Unknown keys get a
/// generic recommendation.
pub fn recommendation_for(metric: &str) -> &'static str {
    match metric {
        "speed" => "Add short sprint intervals and acceleration ladders to raise top and average speed.",
        "endurance" => "Build aerobic base with longer steady-state runs and tempo intervals.",
        "agility" => "Practise lateral shuffles, cone drills and controlled deceleration work.",
        "control" => "Work on single-leg balance and core stability to steady posture at pace.",
        "positioning" => "Review positional video and rehearse moving between zones with purpose.",
        "decision_making" => "Use small-sided games that force quick scanning and choice under time pressure.",
        "explosiveness" => "Include plyometrics and resisted starts to sharpen first-step burst.",
        "recovery_rate" => "Train repeated-sprint sets with short rests and prioritise sleep and cool-downs.",
        "tactical_awareness" => "Vary movement patterns and study team shape to read play earlier.",
        "pressure_resistance" => "Simulate fatigue in drills and keep technique clean under pressure.",
        "consistency" => "Hold target pace through full drills and track split-to-split variation.",
        _ => GENERIC_RECOMMENDATION,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PerformanceMetrics {
    /// `InsufficientData` when the movement input was itself a default
    pub status: DataStatus,
    pub technical_score: i32,
    pub physical_score: i32,
    pub tactical_score: i32,
    pub overall_score: i32,
    pub breakdown: BTreeMap<String, f64>,
    pub strengths: Vec<String>,
    pub improvement_areas: Vec<String>,
    pub recommendations: Vec<String>,
    pub gaze_blended: bool,
}

#[derive(Debug, Clone, Default)]
struct Signals {
    avg_speed: f64,
    peak_speed: f64,
    stamina: f64,
    consistency: f64,
    lateral: f64,
    deceleration: f64,
    balance: f64,
    tactical: f64,
    zone_effectiveness: f64,
    efficiency: f64,
    explosive: f64,
    recovery: f64,
}

impl Signals {
    fn get(&self, signal: Signal) -> f64 {
        match signal {
            Signal::AvgSpeed => self.avg_speed,
            Signal::PeakSpeed => self.peak_speed,
            Signal::Stamina => self.stamina,
            Signal::Consistency => self.consistency,
            Signal::Lateral => self.lateral,
            Signal::Deceleration => self.deceleration,
            Signal::Balance => self.balance,
            Signal::Tactical => self.tactical,
            Signal::ZoneEffectiveness => self.zone_effectiveness,
            Signal::Efficiency => self.efficiency,
            Signal::Explosive => self.explosive,
            Signal::Recovery => self.recovery,
        }
    }

    /// Hip-keypoint speeds, or the centroid's `(avg, max)` when the hips were
    /// never tracked.
    fn speed_signals(base: &KinematicSeries, centroid: (f64, f64), cfg: &PerformanceConfig) -> (f64, f64) {
        let (avg, max) = if base.speeds.is_empty() {
            centroid
        } else {
            (base.avg_speed, base.max_speed)
        };
        (
            clamp_score(100.0 * avg / cfg.reference_speed),
            clamp_score(100.0 * max / cfg.reference_speed),
        )
    }

    fn from_enhanced(metrics: &EnhancedMetrics, cfg: &PerformanceConfig) -> Self {
        let (avg_speed, peak_speed) =
            Self::speed_signals(&metrics.base, (metrics.avg_speed, metrics.max_speed), cfg);
        Self {
            avg_speed,
            peak_speed,
            stamina: metrics.stamina,
            consistency: metrics.consistency,
            lateral: 100.0 * metrics.directional_data.sideways,
            deceleration: 100.0 * metrics.acceleration_profile.deceleration,
            balance: metrics.base.balance_score,
            tactical: metrics.tactical_awareness,
            zone_effectiveness: metrics.zone_transitions.effectiveness,
            efficiency: metrics.base.movement_efficiency,
            explosive: 100.0 * metrics.acceleration_profile.explosive,
            recovery: (20.0 * metrics.recovery_speed).min(100.0),
        }
    }

    /// Estimates for a base-only input, computed from the raw stream.
    fn estimate(base: &KinematicSeries, samples: &[PositionSample], config: &AnalysisConfig) -> Self {
        let points: Vec<(f64, Point)> = sort_stream(samples)
            .iter()
            .filter_map(|s| s.centroid().map(|c| (s.timestamp_ms, c)))
            .collect();
        let steps = centroid_steps(&points);
        let speeds: Vec<f64> = steps.iter().map(|s| s.speed).collect();
        let dts: Vec<f64> = steps.iter().map(|s| s.dt_s).collect();
        let timed: Vec<(f64, f64)> = steps.iter().map(|s| (s.speed, s.timestamp_ms)).collect();
        let centroid_speed = (mean(&speeds), speeds.iter().copied().fold(0.0, f64::max));
        let (avg_speed, peak_speed) = Self::speed_signals(base, centroid_speed, &config.performance);

        let directional = directional_distribution(&steps);
        let profile = acceleration_profile(&speeds, &dts, &config.movement);
        let stamina = stamina_model(&timed, &config.movement);
        let positions: Vec<Point> = points.iter().map(|(_, p)| *p).collect();
        let transitions = zone_transitions(&positions, base.duration_ms, base.movement_efficiency, &config.field);

        Self {
            avg_speed,
            peak_speed,
            stamina: stamina.stamina,
            consistency: consistency_score(&base.speeds),
            lateral: 100.0 * directional.data.sideways,
            deceleration: 100.0 * profile.deceleration,
            balance: base.balance_score,
            tactical: tactical_awareness(
                &base.speeds,
                directional.direction_changes,
                points.len(),
                base.movement_efficiency,
                profile.explosive,
            ),
            zone_effectiveness: transitions.effectiveness,
            efficiency: base.movement_efficiency,
            explosive: 100.0 * profile.explosive,
            recovery: (20.0 * stamina.recovery_speed).min(100.0),
        }
    }
}

fn round_score(value: f64) -> i32 {
    clamp_score(value.round()) as i32
}

/// Aggregate a movement analysis (and optionally a gaze analysis) into
/// performance scores.
pub fn aggregate_performance(
    input: &AnalysisInput,
    samples: &[PositionSample],
    gaze: Option<&GazeAnalysis>,
    config: &AnalysisConfig,
) -> PerformanceMetrics {
    let (signals, status) = match input {
        AnalysisInput::Enhanced(metrics) if metrics.status.is_measured() => {
            (Signals::from_enhanced(metrics, &config.performance), DataStatus::Measured)
        }
        // a default enhanced result carries no signal of its own
        AnalysisInput::Enhanced(metrics) => {
            (Signals::estimate(&metrics.base, samples, config), DataStatus::InsufficientData)
        }
        AnalysisInput::Base(base) => (Signals::estimate(base, samples, config), DataStatus::Measured),
    };

    let mut breakdown: BTreeMap<MetricKey, f64> = WEIGHTS
        .iter()
        .map(|(key, weights)| {
            let value: f64 = weights.iter().map(|(signal, w)| w * signals.get(*signal)).sum();
            (*key, clamp_score(value))
        })
        .collect();

    let blend = config.performance.gaze_blend;
    let gaze_blended = match gaze {
        Some(g) if g.status.is_measured() => {
            for (key, gaze_score) in [
                (MetricKey::DecisionMaking, g.decision_speed),
                (MetricKey::TacticalAwareness, g.anticipation),
            ] {
                if let Some(value) = breakdown.get_mut(&key) {
                    *value = clamp_score((1.0 - blend) * *value + blend * gaze_score);
                }
            }
            true
        }
        _ => false,
    };

    let metric = |key: MetricKey| breakdown.get(&key).copied().unwrap_or(0.0);
    let efficiency = signals.efficiency;
    let technical = 0.2 * metric(MetricKey::Explosiveness) + 0.4 * efficiency + 0.4 * metric(MetricKey::Consistency);
    let physical = 0.35 * metric(MetricKey::Speed)
        + 0.35 * metric(MetricKey::Endurance)
        + 0.15 * metric(MetricKey::Agility)
        + 0.15 * metric(MetricKey::RecoveryRate);
    let tactical = 0.4 * metric(MetricKey::TacticalAwareness)
        + 0.3 * metric(MetricKey::PressureResistance)
        + 0.3 * efficiency;
    let overall = 0.35 * technical + 0.35 * physical + 0.3 * tactical;

    let ranked = rank_metrics(&breakdown);
    let strengths: Vec<String> = ranked.iter().take(3).map(|(k, _)| k.display_name().to_string()).collect();
    let weakest: Vec<MetricKey> = ranked.iter().rev().take(3).map(|(k, _)| *k).collect();
    let improvement_areas = weakest.iter().map(|k| k.display_name().to_string()).collect();
    let recommendations = weakest.iter().map(|k| recommendation_for(k.key()).to_string()).collect();

    debug!(technical, physical, tactical, overall, gaze_blended, "performance: aggregated");

    PerformanceMetrics {
        status,
        technical_score: round_score(technical),
        physical_score: round_score(physical),
        tactical_score: round_score(tactical),
        overall_score: round_score(overall),
        breakdown: breakdown.into_iter().map(|(k, v)| (k.key().to_string(), v)).collect(),
        strengths,
        improvement_areas,
        recommendations,
        gaze_blended,
    }
}

/// Descending by value; ties keep the canonical metric order.
fn rank_metrics(breakdown: &BTreeMap<MetricKey, f64>) -> Vec<(MetricKey, f64)> {
    let mut ranked: Vec<(MetricKey, f64)> = MetricKey::ALL
        .iter()
        .map(|k| (*k, breakdown.get(k).copied().unwrap_or(0.0)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}
