//! Stamina / recovery model driven by time above the high-intensity speed.

use crate::analysis::geometry::mean;
use crate::config::MovementConfig;

const MAX_STAMINA: f64 = 100.0;

/// Result of folding the stamina model over a speed series.
#[derive(Debug, Clone, PartialEq)]
pub struct StaminaOutcome {
    pub stamina: f64,
    /// Completed recoveries (ms since the last high-intensity mark)
    pub recoveries_ms: Vec<f64>,
    pub recovery_speed: f64,
    pub high_intensity_steps: usize,
}

#[derive(Debug, Clone)]
struct StaminaState {
    stamina: f64,
    in_high_intensity: bool,
    last_high_ms: Option<f64>,
    recoveries_ms: Vec<f64>,
    high_intensity_steps: usize,
}

impl StaminaState {
    fn new() -> Self {
        Self {
            stamina: MAX_STAMINA,
            in_high_intensity: false,
            last_high_ms: None,
            recoveries_ms: Vec::new(),
            high_intensity_steps: 0,
        }
    }

    fn step(mut self, speed: f64, timestamp_ms: f64, threshold: f64, cfg: &MovementConfig) -> Self {
        if speed > threshold {
            self.stamina = (self.stamina - cfg.high_intensity_cost).max(0.0);
            self.in_high_intensity = true;
            self.last_high_ms = Some(timestamp_ms);
            self.high_intensity_steps += 1;
        } else if let Some(since) = self.completed_recovery(timestamp_ms, cfg) {
            self.recoveries_ms.push(since);
            self.stamina = (self.stamina + cfg.recovery_bonus).min(MAX_STAMINA);
            self.in_high_intensity = false;
        } else {
            // Calm steps inside the recovery gap still gain passively
            self.stamina = (self.stamina + cfg.passive_gain).min(MAX_STAMINA);
        }
        self
    }

    /// Gap since the last high-intensity mark, once it exceeds the recovery gap.
    fn completed_recovery(&self, timestamp_ms: f64, cfg: &MovementConfig) -> Option<f64> {
        if !self.in_high_intensity {
            return None;
        }
        self.last_high_ms
            .map(|t| timestamp_ms - t)
            .filter(|since| *since > cfg.recovery_gap_ms)
    }
}

/// Run the stamina model over `(speed, timestamp_ms)` steps.
///
/// High intensity is any speed above `high_intensity_ratio * max(speed)`.
pub fn stamina_model(steps: &[(f64, f64)], cfg: &MovementConfig) -> StaminaOutcome {
    let max_speed = steps.iter().map(|(speed, _)| *speed).fold(0.0, f64::max);
    let threshold = max_speed * cfg.high_intensity_ratio;

    let state = steps
        .iter()
        .fold(StaminaState::new(), |state, &(speed, t)| state.step(speed, t, threshold, cfg));

    let recovery_speed = if state.recoveries_ms.is_empty() {
        1.0
    } else {
        let avg = mean(&state.recoveries_ms);
        if avg > 0.0 {
            cfg.recovery_speed_scale / avg
        } else {
            1.0
        }
    };

    StaminaOutcome {
        stamina: state.stamina,
        recoveries_ms: state.recoveries_ms,
        recovery_speed,
        high_intensity_steps: state.high_intensity_steps,
    }
}
