use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::models::SyntheticMetrics;

/// `intercept + slope * progress` for one resource channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Linear {
    pub intercept: f64,
    pub slope: f64,
}

impl Linear {
    const fn new(intercept: f64, slope: f64) -> Self {
        Self { intercept, slope }
    }

    const fn flat(value: f64) -> Self {
        Self::new(value, 0.0)
    }

    pub fn at(&self, progress: f64) -> f64 {
        self.intercept + self.slope * progress
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourcePattern {
    pub cpu: Linear,
    pub memory: Linear,
    pub disk: Linear,
    pub network: Linear,
}

const DEFAULT_PATTERN: ResourcePattern = ResourcePattern {
    cpu: Linear::flat(20.0),
    memory: Linear::flat(30.0),
    disk: Linear::flat(10.0),
    network: Linear::flat(5.0),
};

const PATTERNS: &[(&str, ResourcePattern)] = &[
    (
        "data-download",
        ResourcePattern {
            cpu: Linear::new(15.0, 0.1),
            memory: Linear::new(20.0, 0.15),
            disk: Linear::new(60.0, 0.3),
            network: Linear::new(70.0, 0.2),
        },
    ),
    (
        "quality-control",
        ResourcePattern {
            cpu: Linear::new(40.0, 0.4),
            memory: Linear::new(35.0, 0.25),
            disk: Linear::new(30.0, 0.2),
            network: Linear::flat(5.0),
        },
    ),
    (
        "read-merging",
        ResourcePattern {
            cpu: Linear::new(25.0, 0.3),
            memory: Linear::new(45.0, 0.2),
            disk: Linear::new(20.0, 0.15),
            network: Linear::flat(2.0),
        },
    ),
    (
        "asv-inference",
        ResourcePattern {
            cpu: Linear::new(80.0, 0.1),
            memory: Linear::new(70.0, 0.15),
            disk: Linear::new(15.0, 0.1),
            network: Linear::flat(1.0),
        },
    ),
    (
        "taxonomic-classification",
        ResourcePattern {
            cpu: Linear::new(60.0, 0.2),
            memory: Linear::new(50.0, 0.2),
            disk: Linear::new(25.0, 0.15),
            network: Linear::new(30.0, 0.1),
        },
    ),
    (
        "novelty-detection",
        ResourcePattern {
            cpu: Linear::new(85.0, 0.1),
            memory: Linear::new(75.0, 0.1),
            disk: Linear::new(10.0, 0.05),
            network: Linear::flat(5.0),
        },
    ),
    (
        "diversity-analysis",
        ResourcePattern {
            cpu: Linear::new(30.0, 0.2),
            memory: Linear::new(40.0, 0.15),
            disk: Linear::new(15.0, 0.1),
            network: Linear::flat(3.0),
        },
    ),
];

pub fn resource_pattern(step_id: &str) -> &'static ResourcePattern {
    PATTERNS
        .iter()
        .find(|(id, _)| *id == step_id)
        .map_or(&DEFAULT_PATTERN, |(_, pattern)| pattern)
}

/// Unperturbed resource usage of `step_id` at `progress`.
pub fn baseline_metrics(step_id: &str, progress: f64) -> SyntheticMetrics {
    let pattern = resource_pattern(step_id);
    SyntheticMetrics::new(
        pattern.cpu.at(progress),
        pattern.memory.at(progress),
        pattern.disk.at(progress),
        pattern.network.at(progress),
    )
}

/// Produces noisy gauge readings around the pattern baseline.
#[derive(Debug)]
pub struct MetricsSampler {
    rng: StdRng,
    latest: SyntheticMetrics,
}

impl MetricsSampler {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            rng,
            latest: SyntheticMetrics::default(),
        }
    }

    pub fn latest(&self) -> SyntheticMetrics {
        self.latest
    }

    /// `active` is the running step's id and progress, `None` when idle.
    pub fn sample(&mut self, active: Option<(&str, f64)>) -> SyntheticMetrics {
        self.latest = match active {
            Some((step_id, progress)) => {
                let base = baseline_metrics(step_id, progress);
                SyntheticMetrics::new(
                    (base.cpu + self.noise(10.0)).clamp(5.0, 95.0),
                    (base.memory + self.noise(5.0)).clamp(10.0, 90.0),
                    (base.disk + self.noise(20.0)).clamp(0.0, 100.0),
                    (base.network + self.noise(15.0)).clamp(0.0, 100.0),
                )
            }
            None => SyntheticMetrics::new(
                5.0 + self.rng.random::<f64>() * 10.0,
                15.0 + self.rng.random::<f64>() * 10.0,
                self.rng.random::<f64>() * 5.0,
                self.rng.random::<f64>() * 5.0,
            ),
        };

        self.latest
    }

    /// Uniform noise in `[-band / 2, band / 2)`.
    fn noise(&mut self, band: f64) -> f64 {
        (self.rng.random::<f64>() - 0.5) * band
    }
}
