use crate::models::{StepRuntimeState, StepStatus};

/// Cursor over the active step's log lines, revealed one at a time.
#[derive(Debug, Clone, Default)]
pub struct LogRevealer {
    step_index: usize,
    revealed: usize,
}

impl LogRevealer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revealed_index(&self) -> usize {
        self.revealed
    }

    pub fn reset(&mut self, step_index: usize) {
        self.step_index = step_index;
        self.revealed = 0;
    }

    /// Reveals at most one more line of `step`, bounded by its progress.
    ///
    /// Returns the index of the newly revealed line.
    pub fn tick(&mut self, step_index: usize, step: &StepRuntimeState) -> Option<usize> {
        if step_index != self.step_index {
            self.reset(step_index);
        }

        if step.status != StepStatus::Running {
            return None;
        }

        let allowed = max_allowed_index(step.progress, step.definition.logs.len())?;
        if allowed > self.revealed {
            self.revealed += 1;
            Some(self.revealed)
        } else {
            None
        }
    }
}

/// Highest log index that `progress` permits, or `None` without logs.
pub fn max_allowed_index(progress: f64, log_count: usize) -> Option<usize> {
    if log_count == 0 {
        return None;
    }

    let implied = ((progress / 100.0) * log_count as f64).floor();
    let implied = if implied.is_finite() && implied > 0.0 {
        implied as usize
    } else {
        0
    };

    Some(implied.min(log_count - 1))
}
