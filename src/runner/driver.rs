use std::sync::Arc;

use crate::{
    models::{RunPhase, StepDefinition, StepRuntimeState, StepStatus, message_for},
    runner::EasingTable,
};

/// Ticks per second of nominal step duration used to size increments.
const TICKS_PER_SECOND: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Nothing to advance: idle, stopped, or waiting out a step pause.
    Idle,
    Progressed { index: usize, progress: f64 },
    /// A step reached 100% and the next one starts after the pause.
    StepCompleted { index: usize },
    /// The last step reached 100%; the run is finished.
    RunCompleted,
}

/// Owns the run state and moves it forward one progress tick at a time.
#[derive(Debug, Clone)]
pub struct ProgressDriver {
    easing: EasingTable,
    min_duration_secs: f64,
    steps: Vec<StepRuntimeState>,
    current_step_index: usize,
    is_running: bool,
    force_completed: bool,
}

impl ProgressDriver {
    pub fn new(easing: EasingTable, min_duration_secs: f64) -> Self {
        let min_duration_secs = if min_duration_secs.is_finite() && min_duration_secs > 0.0 {
            min_duration_secs
        } else {
            0.1
        };

        Self {
            easing,
            min_duration_secs,
            steps: Vec::new(),
            current_step_index: 0,
            is_running: false,
            force_completed: false,
        }
    }

    /// Replaces any previous run with a fresh one over `catalog`.
    ///
    /// Returns `false` (and stays idle) when the catalog is empty.
    pub fn start(&mut self, catalog: &[StepDefinition]) -> bool {
        self.steps = catalog
            .iter()
            .map(|definition| StepRuntimeState::pending(Arc::new(definition.clone())))
            .collect();
        self.current_step_index = 0;
        self.force_completed = false;
        self.is_running = !self.steps.is_empty();
        self.is_running
    }

    /// Hard pause. The run cannot be resumed, only restarted.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.is_running, false)
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running {
            return TickOutcome::Idle;
        }

        let index = self.current_step_index;
        let is_last = index + 1 == self.steps.len();
        let min_duration = self.min_duration_secs;
        let Some(step) = self.steps.get_mut(index) else {
            return TickOutcome::Idle;
        };

        match step.status {
            StepStatus::Pending => {
                step.status = StepStatus::Running;
                step.progress = 0.0;
                step.current_message = step.definition.details.first().cloned();
            }
            StepStatus::Running => {}
            StepStatus::Completed | StepStatus::Error => return TickOutcome::Idle,
        }

        let duration = step.definition.duration_secs;
        let duration = if duration.is_finite() && duration >= min_duration {
            duration
        } else {
            min_duration
        };

        let base = 100.0 / (duration * TICKS_PER_SECOND);
        let increment = (base * self.easing.multiplier(&step.definition.id, step.progress)).max(0.0);
        let progress = (step.progress + increment).min(100.0);

        step.progress = progress;
        step.current_message = message_for(progress, &step.definition.details);

        let outcome = if progress >= 100.0 {
            step.status = StepStatus::Completed;
            step.progress = 100.0;
            step.current_message = step.definition.details.last().cloned();

            if is_last {
                self.is_running = false;
                self.force_completed = true;
                TickOutcome::RunCompleted
            } else {
                TickOutcome::StepCompleted { index }
            }
        } else {
            TickOutcome::Progressed { index, progress }
        };

        self.debug_assert_single_runner();
        outcome
    }

    /// Moves past a completed step. Only valid while paused after a step.
    pub fn advance(&mut self) -> Option<usize> {
        let RunPhase::StepCompletedPause(index) = self.phase() else {
            return None;
        };

        let next = index + 1;
        self.current_step_index = next;
        if let Some(step) = self.steps.get_mut(next) {
            step.progress = 0.0;
        }

        Some(next)
    }

    pub fn phase(&self) -> RunPhase {
        if self.force_completed {
            return RunPhase::RunComplete;
        }

        let Some(step) = self.current_step() else {
            return RunPhase::Idle;
        };

        let index = self.current_step_index;
        if !self.is_running {
            RunPhase::Stopped(index)
        } else if step.status == StepStatus::Completed && index + 1 < self.steps.len() {
            RunPhase::StepCompletedPause(index)
        } else {
            RunPhase::StepRunning(index)
        }
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn is_completed(&self) -> bool {
        let all_done = !self.steps.is_empty()
            && self
                .steps
                .iter()
                .all(|step| step.status == StepStatus::Completed);
        all_done || self.force_completed
    }

    pub fn steps(&self) -> &[StepRuntimeState] {
        &self.steps
    }

    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    pub fn current_step(&self) -> Option<&StepRuntimeState> {
        self.steps.get(self.current_step_index)
    }

    pub fn step_progress(&self) -> f64 {
        self.current_step().map_or(0.0, |step| step.progress)
    }

    fn debug_assert_single_runner(&self) {
        debug_assert!(
            self.steps
                .iter()
                .filter(|step| step.status == StepStatus::Running)
                .count()
                <= 1,
            "more than one step running"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: &str, duration: f64) -> StepDefinition {
        StepDefinition::new(id, id.to_uppercase(), duration)
            .with_details(["first", "second", "third", "fourth"])
            .with_logs(["l1", "l2"])
    }

    fn driver() -> ProgressDriver {
        ProgressDriver::new(EasingTable::builtin(), 0.1)
    }

    #[test]
    fn first_tick_starts_the_step() {
        let mut driver = driver();
        assert!(driver.start(&[step("x", 10.0)]));
        assert_eq!(driver.steps()[0].status, StepStatus::Pending);

        let outcome = driver.tick();

        let state = &driver.steps()[0];
        assert_eq!(state.status, StepStatus::Running);
        assert_eq!(state.current_message.as_deref(), Some("first"));
        assert!(matches!(outcome, TickOutcome::Progressed { index: 0, .. }));
        assert_eq!(driver.phase(), RunPhase::StepRunning(0));
    }

    #[test]
    fn single_step_completes_synchronously() {
        let mut driver = driver();
        driver.start(&[step("x", 1.0)]);

        assert!(matches!(driver.tick(), TickOutcome::Progressed { .. }));
        assert!(matches!(driver.tick(), TickOutcome::Progressed { .. }));
        assert_eq!(driver.tick(), TickOutcome::RunCompleted);

        assert!(!driver.is_running());
        assert!(driver.is_completed());
        assert_eq!(driver.phase(), RunPhase::RunComplete);
        assert_eq!(driver.steps()[0].progress, 100.0);
        assert_eq!(driver.steps()[0].current_message.as_deref(), Some("fourth"));
    }

    #[test]
    fn pause_then_advance_to_next_step() {
        let mut driver = driver();
        driver.start(&[step("a", 1.0), step("b", 1.0)]);

        for _ in 0..2 {
            driver.tick();
        }
        assert_eq!(driver.tick(), TickOutcome::StepCompleted { index: 0 });
        assert_eq!(driver.phase(), RunPhase::StepCompletedPause(0));
        assert!(driver.is_running());
        assert!(!driver.is_completed());

        // Ticks during the pause change nothing.
        assert_eq!(driver.tick(), TickOutcome::Idle);

        assert_eq!(driver.advance(), Some(1));
        assert_eq!(driver.current_step_index(), 1);
        assert_eq!(driver.step_progress(), 0.0);
        assert_eq!(driver.steps()[1].status, StepStatus::Pending);
        assert_eq!(driver.advance(), None);
    }

    #[test]
    fn stop_during_pause_blocks_advance() {
        let mut driver = driver();
        driver.start(&[step("a", 1.0), step("b", 1.0)]);
        for _ in 0..3 {
            driver.tick();
        }

        assert!(driver.stop());
        assert_eq!(driver.advance(), None);
        assert_eq!(driver.current_step_index(), 0);
        assert_eq!(driver.phase(), RunPhase::Stopped(0));
        assert!(!driver.stop());
    }

    #[test]
    fn empty_catalog_stays_idle() {
        let mut driver = driver();
        assert!(!driver.start(&[]));

        assert!(!driver.is_running());
        assert!(!driver.is_completed());
        assert_eq!(driver.phase(), RunPhase::Idle);
        assert_eq!(driver.tick(), TickOutcome::Idle);
        assert!(driver.current_step().is_none());
    }

    #[test]
    fn non_positive_durations_use_the_floor() {
        for duration in [0.0, -5.0, f64::NAN] {
            let mut driver = ProgressDriver::new(EasingTable::empty(), 1.0);
            driver.start(&[step("x", duration)]);

            driver.tick();
            let progress = driver.steps()[0].progress;
            assert!(progress.is_finite());
            assert!((progress - 100.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn easing_follows_step_identity() {
        let mut download = driver();
        download.start(&[step("data-download", 10.0)]);
        download.tick();

        let mut plain = driver();
        plain.start(&[step("read-merging", 10.0)]);
        plain.tick();

        let base = 100.0 / 30.0;
        assert!((plain.step_progress() - base).abs() < 1e-9);
        assert!((download.step_progress() - base * 1.5).abs() < 1e-9);
    }

    #[test]
    fn download_slows_after_seventy_percent() {
        let mut driver = driver();
        driver.start(&[step("data-download", 10.0)]);

        let mut previous = 0.0;
        let mut late_increment = None;
        while driver.is_running() {
            driver.tick();
            let progress = driver.step_progress();
            if previous >= 70.0 && progress < 100.0 {
                late_increment = Some(progress - previous);
            }
            previous = progress;
        }

        let expected = 100.0 / 30.0 * 0.5;
        assert!((late_increment.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn progress_is_monotonic_and_index_steps_by_one() {
        let catalog: Vec<_> = ["data-download", "asv-inference", "novelty-detection", "other"]
            .iter()
            .map(|id| step(id, 2.0))
            .collect();

        let mut driver = driver();
        driver.start(&catalog);

        let mut last_progress = 0.0;
        let mut last_index = 0;
        for _ in 0..500 {
            match driver.tick() {
                TickOutcome::StepCompleted { .. } => {
                    let next = driver.advance().unwrap();
                    assert_eq!(next, last_index + 1);
                    last_index = next;
                    last_progress = 0.0;
                }
                TickOutcome::RunCompleted => break,
                _ => {
                    assert!(driver.step_progress() >= last_progress);
                    last_progress = driver.step_progress();
                }
            }

            let running = driver
                .steps()
                .iter()
                .filter(|s| s.status == StepStatus::Running)
                .count();
            assert!(running <= 1);
            for earlier in &driver.steps()[..driver.current_step_index()] {
                assert_eq!(earlier.status, StepStatus::Completed);
            }
        }

        assert_eq!(last_index, 3);
        assert!(driver.is_completed());
    }

    #[test]
    fn restart_resets_previous_run() {
        let mut driver = driver();
        driver.start(&[step("a", 1.0)]);
        for _ in 0..3 {
            driver.tick();
        }
        assert!(driver.is_completed());

        driver.start(&[step("a", 1.0), step("b", 1.0)]);
        assert!(!driver.is_completed());
        assert!(driver.is_running());
        assert_eq!(driver.current_step_index(), 0);
        assert_eq!(driver.steps()[0].progress, 0.0);
    }
}
