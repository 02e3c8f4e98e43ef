use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

/// Smallest multiplier a rule may apply, so every step still reaches 100%.
pub const MIN_MULTIPLIER: f64 = 0.05;

/// Multiplier applied to a step's base progress increment.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Easing {
    /// `early` while progress is below `below`, `late` from then on.
    Threshold { below: f64, early: f64, late: f64 },
    Uniform { factor: f64 },
}

impl Easing {
    pub fn multiplier(&self, progress: f64) -> f64 {
        match *self {
            Easing::Threshold { below, early, late } => {
                if progress < below {
                    early
                } else {
                    late
                }
            }
            Easing::Uniform { factor } => factor,
        }
    }
}

/// Easing rules keyed by step id; unknown ids advance at the base rate.
#[derive(Debug, Clone, Default)]
pub struct EasingTable {
    rules: HashMap<String, Easing>,
}

impl EasingTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        Self::empty()
            .with_rule(
                "data-download",
                Easing::Threshold {
                    below: 70.0,
                    early: 1.5,
                    late: 0.5,
                },
            )
            .with_rule(
                "asv-inference",
                Easing::Threshold {
                    below: 30.0,
                    early: 0.7,
                    late: 1.2,
                },
            )
            .with_rule("novelty-detection", Easing::Uniform { factor: 0.8 })
    }

    pub fn with_rule(mut self, step_id: impl Into<String>, easing: Easing) -> Self {
        self.rules.insert(step_id.into(), easing);
        self
    }

    pub fn with_overrides(mut self, overrides: &BTreeMap<String, Easing>) -> Self {
        for (step_id, easing) in overrides {
            self.rules.insert(step_id.clone(), *easing);
        }
        self
    }

    /// Multiplier for `step_id` at `progress`. Zero, negative and non-finite
    /// factors from config are raised to [`MIN_MULTIPLIER`].
    pub fn multiplier(&self, step_id: &str, progress: f64) -> f64 {
        let multiplier = self
            .rules
            .get(step_id)
            .map_or(1.0, |easing| easing.multiplier(progress));

        if multiplier.is_finite() && multiplier >= MIN_MULTIPLIER {
            multiplier
        } else {
            MIN_MULTIPLIER
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_is_fast_then_slow() {
        let table = EasingTable::builtin();
        assert_eq!(table.multiplier("data-download", 0.0), 1.5);
        assert_eq!(table.multiplier("data-download", 69.9), 1.5);
        assert_eq!(table.multiplier("data-download", 70.0), 0.5);
    }

    #[test]
    fn asv_inference_is_slow_then_fast() {
        let table = EasingTable::builtin();
        assert_eq!(table.multiplier("asv-inference", 29.9), 0.7);
        assert_eq!(table.multiplier("asv-inference", 30.0), 1.2);
    }

    #[test]
    fn novelty_detection_is_damped() {
        let table = EasingTable::builtin();
        assert_eq!(table.multiplier("novelty-detection", 10.0), 0.8);
        assert_eq!(table.multiplier("novelty-detection", 90.0), 0.8);
    }

    #[test]
    fn unknown_steps_use_base_rate() {
        let table = EasingTable::builtin();
        assert_eq!(table.multiplier("quality-control", 50.0), 1.0);
        assert_eq!(table.multiplier("x", 0.0), 1.0);
    }

    #[test]
    fn overrides_replace_builtin_rules() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "data-download".to_string(),
            Easing::Uniform { factor: 3.0 },
        );

        let table = EasingTable::builtin().with_overrides(&overrides);
        assert_eq!(table.multiplier("data-download", 90.0), 3.0);
        assert_eq!(table.multiplier("asv-inference", 0.0), 0.7);
    }

    #[test]
    fn stalling_factors_are_floored() {
        let table = EasingTable::empty()
            .with_rule("zero", Easing::Uniform { factor: 0.0 })
            .with_rule("negative", Easing::Uniform { factor: -2.0 })
            .with_rule("nan", Easing::Uniform { factor: f64::NAN })
            .with_rule(
                "late-stall",
                Easing::Threshold {
                    below: 50.0,
                    early: 1.0,
                    late: f64::INFINITY,
                },
            );

        assert_eq!(table.multiplier("zero", 10.0), MIN_MULTIPLIER);
        assert_eq!(table.multiplier("negative", 10.0), MIN_MULTIPLIER);
        assert_eq!(table.multiplier("nan", 10.0), MIN_MULTIPLIER);
        assert_eq!(table.multiplier("late-stall", 10.0), 1.0);
        assert_eq!(table.multiplier("late-stall", 60.0), MIN_MULTIPLIER);
    }
}
