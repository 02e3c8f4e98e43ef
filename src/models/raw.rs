use std::{collections::BTreeMap, path::Path};

use serde::Deserialize;
use tokio::fs::read_to_string;

use crate::{
    models::{StepDefinition, StepFiles},
    visuals::VisualizationKind,
};

#[derive(Debug, Deserialize)]
pub struct RawCatalog {
    pub steps_order: Vec<String>,
    pub steps: BTreeMap<String, RawStep>,
}

impl RawCatalog {
    pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Vec<StepDefinition>> {
        let content = read_to_string(path).await?;
        let raw: RawCatalog = toml::from_str(&content)?;
        raw.compile()
    }

    pub fn compile(self) -> anyhow::Result<Vec<StepDefinition>> {
        let mut steps = Vec::new();

        for step_id in self.steps_order.iter() {
            let Some(raw_step) = self.steps.get(step_id) else {
                println!(
                    "⚠️ Step '{}' declared in order but missing definition. Skipping.",
                    step_id
                );
                continue;
            };

            if steps.iter().any(|s: &StepDefinition| &s.id == step_id) {
                println!("⚠️ Step '{}' listed twice in order. Skipping.", step_id);
                continue;
            }

            if raw_step.details.is_empty() {
                println!("⚠️ Step '{}' has no details to display.", step_id);
            }

            steps.push(StepDefinition {
                id: step_id.clone(),
                name: raw_step.name.clone().unwrap_or_else(|| step_id.clone()),
                description: raw_step.description.clone().unwrap_or_default(),
                duration_secs: raw_step.duration,
                details: raw_step.details.clone(),
                logs: raw_step.logs.clone(),
                files: raw_step.files.clone(),
                visualization: raw_step.visualization.unwrap_or_default(),
            });
        }

        if steps.is_empty() {
            anyhow::bail!("No valid steps found to simulate.");
        }

        Ok(steps)
    }
}

#[derive(Debug, Deserialize)]
pub struct RawStep {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration: f64,
    #[serde(default)]
    pub details: Vec<String>,
    #[serde(default)]
    pub logs: Vec<String>,
    pub files: Option<StepFiles>,
    pub visualization: Option<VisualizationKind>,
}
