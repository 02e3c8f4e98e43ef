use std::{collections::BTreeMap, path::Path, time::Duration};

use serde::Deserialize;
use tokio::fs::read_to_string;

use crate::runner::Easing;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub timing: TimingConfig,
    /// Per-step easing rules layered over the built-in table.
    pub easing: BTreeMap<String, Easing>,
    pub seed: Option<u64>,
}

impl SimulatorConfig {
    pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = read_to_string(path).await?;
        let config: SimulatorConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub progress_tick_ms: u64,
    pub log_tick_ms: u64,
    pub metrics_tick_ms: u64,
    pub step_pause_ms: u64,
    pub min_duration_secs: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            progress_tick_ms: 500,
            log_tick_ms: 2000,
            metrics_tick_ms: 3000,
            step_pause_ms: 2000,
            min_duration_secs: 0.1,
        }
    }
}

impl TimingConfig {
    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress_tick_ms.max(1))
    }

    pub fn log_tick(&self) -> Duration {
        Duration::from_millis(self.log_tick_ms.max(1))
    }

    pub fn metrics_tick(&self) -> Duration {
        Duration::from_millis(self.metrics_tick_ms.max(1))
    }

    pub fn step_pause(&self) -> Duration {
        Duration::from_millis(self.step_pause_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: SimulatorConfig = toml::from_str("").unwrap();

        assert_eq!(config.timing.progress_tick(), Duration::from_millis(500));
        assert_eq!(config.timing.step_pause(), Duration::from_secs(2));
        assert!(config.easing.is_empty());
        assert!(config.seed.is_none());
    }

    #[test]
    fn partial_timing_and_easing_overrides() {
        let config: SimulatorConfig = toml::from_str(
            r#"
seed = 7

[timing]
log_tick_ms = 750

[easing.read-merging]
kind = "uniform"
factor = 2.0

[easing.quality-control]
kind = "threshold"
below = 50
early = 0.5
late = 2.0
"#,
        )
        .unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.timing.log_tick_ms, 750);
        assert_eq!(config.timing.metrics_tick_ms, 3000);
        assert_eq!(config.easing["read-merging"], Easing::Uniform { factor: 2.0 });
        assert_eq!(
            config.easing["quality-control"],
            Easing::Threshold {
                below: 50.0,
                early: 0.5,
                late: 2.0
            }
        );
    }

    #[test]
    fn zero_tick_is_floored() {
        let timing = TimingConfig {
            progress_tick_ms: 0,
            ..Default::default()
        };
        assert_eq!(timing.progress_tick(), Duration::from_millis(1));
    }
}
