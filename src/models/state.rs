use std::sync::Arc;

use crate::models::{StepDefinition, SyntheticMetrics};

const PROGRESS_MILESTONES: [f64; 5] = [0.0, 25.0, 50.0, 75.0, 100.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Running,
    Completed,
    /// Reserved for simulated failures; nothing in the driver produces it yet.
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepRuntimeState {
    pub definition: Arc<StepDefinition>,
    pub status: StepStatus,
    pub progress: f64,
    pub current_message: Option<String>,
}

impl StepRuntimeState {
    pub fn pending(definition: Arc<StepDefinition>) -> Self {
        Self {
            definition,
            status: StepStatus::Pending,
            progress: 0.0,
            current_message: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }
}

/// Where the driver currently sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    StepRunning(usize),
    StepCompletedPause(usize),
    RunComplete,
    Stopped(usize),
}

/// Point-in-time copy of everything a display layer may read.
#[derive(Debug, Clone)]
pub struct RunSnapshot {
    pub dataset: String,
    pub steps: Vec<StepRuntimeState>,
    pub current_step_index: usize,
    pub phase: RunPhase,
    pub is_running: bool,
    pub is_completed: bool,
    pub revealed_log_index: usize,
    pub metrics: SyntheticMetrics,
}

impl RunSnapshot {
    pub fn current_step(&self) -> Option<&StepRuntimeState> {
        self.steps.get(self.current_step_index)
    }

    /// Log lines of the active step visible so far, oldest first.
    pub fn revealed_logs(&self) -> &[String] {
        match self.current_step() {
            Some(step) if step.status != StepStatus::Pending => {
                let logs = &step.definition.logs;
                let end = (self.revealed_log_index + 1).min(logs.len());
                &logs[..end]
            }
            _ => &[],
        }
    }
}

/// Index into `details` of the caption reached at `progress`.
///
/// The caption advances at each 25% milestone; anything at or past 100 maps
/// to the last caption. Returns `None` when there are no captions.
pub fn message_index(progress: f64, detail_count: usize) -> Option<usize> {
    if detail_count == 0 {
        return None;
    }

    let last = detail_count - 1;
    let index = match PROGRESS_MILESTONES.iter().position(|m| progress < *m) {
        Some(milestone) => milestone.saturating_sub(1),
        None => last,
    };

    Some(index.min(last))
}

pub fn message_for(progress: f64, details: &[String]) -> Option<String> {
    message_index(progress, details.len()).map(|i| details[i].clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_index_at_milestone_boundaries() {
        assert_eq!(message_index(0.0, 4), Some(0));
        assert_eq!(message_index(24.9, 4), Some(0));
        assert_eq!(message_index(25.0, 4), Some(1));
        assert_eq!(message_index(50.0, 4), Some(2));
        assert_eq!(message_index(75.0, 4), Some(3));
        assert_eq!(message_index(99.9, 4), Some(3));
        assert_eq!(message_index(100.0, 4), Some(3));
    }

    #[test]
    fn message_index_degrades_with_few_details() {
        assert_eq!(message_index(60.0, 1), Some(0));
        assert_eq!(message_index(100.0, 1), Some(0));
        assert_eq!(message_index(60.0, 2), Some(1));
        assert_eq!(message_index(10.0, 2), Some(0));
        assert_eq!(message_index(50.0, 0), None);
    }

    #[test]
    fn at_full_progress_the_last_of_many_details_wins() {
        assert_eq!(message_index(80.0, 8), Some(3));
        assert_eq!(message_index(100.0, 8), Some(7));
    }

    #[test]
    fn message_for_returns_caption() {
        let details = vec!["a".to_string(), "b".to_string()];
        assert_eq!(message_for(30.0, &details).as_deref(), Some("b"));
        assert_eq!(message_for(30.0, &[]), None);
    }
}
