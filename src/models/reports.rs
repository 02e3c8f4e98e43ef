use std::collections::HashMap;

use crate::{
    models::{RunSnapshot, StepStatus},
    visuals::VisualizationKind,
};

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub dataset: String,
    pub step_reports: Vec<StepReport>,
    pub logs: HashMap<String, Vec<String>>,
    pub completed: bool,
    pub elapsed: u64,
}

impl RunReport {
    pub fn from_snapshot(
        snapshot: &RunSnapshot,
        logs: HashMap<String, Vec<String>>,
        elapsed: u64,
    ) -> Self {
        Self {
            dataset: snapshot.dataset.clone(),
            step_reports: snapshot
                .steps
                .iter()
                .map(|step| StepReport {
                    id: step.id().to_string(),
                    name: step.definition.name.clone(),
                    status: step.status,
                    progress: step.progress,
                    visualization: step.definition.visualization,
                })
                .collect(),
            logs,
            completed: snapshot.is_completed,
            elapsed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.completed
            && self
                .step_reports
                .iter()
                .all(|step| step.status == StepStatus::Completed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub id: String,
    pub name: String,
    pub status: StepStatus,
    pub progress: f64,
    pub visualization: VisualizationKind,
}

impl StepReport {
    pub fn icon(&self) -> &'static str {
        match self.status {
            StepStatus::Completed => "✅",
            StepStatus::Running => "🔄",
            StepStatus::Pending => "⏭️",
            StepStatus::Error => "❌",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::{RunPhase, StepDefinition, StepRuntimeState, SyntheticMetrics};

    #[test]
    fn report_carries_each_step_view() {
        let definition = StepDefinition::new("read-merging", "Read Merging", 10.0)
            .with_visualization(VisualizationKind::ReadMerging);
        let mut step = StepRuntimeState::pending(Arc::new(definition));
        step.status = StepStatus::Completed;
        step.progress = 100.0;

        let snapshot = RunSnapshot {
            dataset: "Kermadec Trench".to_string(),
            steps: vec![step],
            current_step_index: 0,
            phase: RunPhase::RunComplete,
            is_running: false,
            is_completed: true,
            revealed_log_index: 0,
            metrics: SyntheticMetrics::default(),
        };

        let report = RunReport::from_snapshot(&snapshot, HashMap::new(), 3);
        assert!(report.is_success());
        assert_eq!(report.step_reports[0].visualization, VisualizationKind::ReadMerging);
        assert_eq!(report.step_reports[0].icon(), "✅");
    }
}
