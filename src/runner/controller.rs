use std::{sync::Arc, time::Duration};

use futures_util::future::join_all;
use parking_lot::Mutex;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    logger::LogMessage,
    models::{
        RunPhase, RunSnapshot, SimulatorConfig, StepDefinition, StepRuntimeState, StepStatus,
        SyntheticMetrics, TimingConfig,
    },
    runner::{EasingTable, LogRevealer, MetricsSampler, ProgressDriver, TickOutcome},
};

struct Simulation {
    generation: u64,
    dataset: String,
    driver: ProgressDriver,
    revealer: LogRevealer,
    sampler: MetricsSampler,
}

impl Simulation {
    fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            dataset: self.dataset.clone(),
            steps: self.driver.steps().to_vec(),
            current_step_index: self.driver.current_step_index(),
            phase: self.driver.phase(),
            is_running: self.driver.is_running(),
            is_completed: self.driver.is_completed(),
            revealed_log_index: self.revealer.revealed_index(),
            metrics: self.sampler.latest(),
        }
    }

    fn sample_metrics(&mut self) -> SyntheticMetrics {
        let Simulation {
            driver, sampler, ..
        } = self;

        let active = if driver.is_running() {
            driver.current_step().map(|step| (step.id(), step.progress))
        } else {
            None
        };

        sampler.sample(active)
    }

    /// Progress tick plus the first log line of a step that just began.
    fn progress_tick(&mut self) -> (TickOutcome, Option<LogMessage>) {
        let was_pending = self
            .driver
            .current_step()
            .is_some_and(|step| step.status == StepStatus::Pending);

        let outcome = self.driver.tick();

        let opening_line = if was_pending && outcome != TickOutcome::Idle {
            self.driver
                .current_step()
                .and_then(|step| log_line(step, 0))
        } else {
            None
        };

        (outcome, opening_line)
    }

    fn log_tick(&mut self) -> Option<LogMessage> {
        let Simulation {
            driver, revealer, ..
        } = self;

        if !driver.is_running() {
            return None;
        }

        let index = driver.current_step_index();
        let step = driver.current_step()?;
        let revealed = revealer.tick(index, step)?;
        log_line(step, revealed)
    }

    fn advance(&mut self) -> Option<usize> {
        let next = self.driver.advance()?;
        self.revealer.reset(next);
        Some(next)
    }
}

fn log_line(step: &StepRuntimeState, index: usize) -> Option<LogMessage> {
    step.definition.logs.get(index).map(|line| LogMessage {
        step_name: step.id().to_string(),
        line: line.clone(),
    })
}

struct Shared {
    sim: Mutex<Simulation>,
    updates: watch::Sender<RunSnapshot>,
}

impl Shared {
    /// Applies `f` if `generation` still owns the run, then publishes.
    fn update<R>(&self, generation: u64, f: impl FnOnce(&mut Simulation) -> R) -> Option<R> {
        let mut sim = self.sim.lock();
        if sim.generation != generation {
            return None;
        }

        let result = f(&mut *sim);
        self.updates.send_replace(sim.snapshot());
        Some(result)
    }
}

/// Cancellation handle for every timer belonging to one run.
struct TimerRegistry {
    token: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl TimerRegistry {
    fn cancel(self) {
        self.token.cancel();
        for handle in self.handles {
            handle.abort();
        }
    }

    async fn drain(self) {
        self.token.cancel();
        join_all(self.handles).await;
    }
}

/// Public surface of the simulator.
///
/// Each run drives three timers (progress, log reveal, metrics) on the Tokio
/// runtime. All of them mutate one `Simulation` behind a lock, one tick at a
/// time, and are torn down together when the run completes, on `stop`, or by
/// the next `start`.
pub struct RunController {
    shared: Arc<Shared>,
    timing: TimingConfig,
    timers: Mutex<Option<TimerRegistry>>,
    log_tx: Option<mpsc::Sender<LogMessage>>,
}

impl RunController {
    pub fn new(config: &SimulatorConfig) -> Self {
        let easing = EasingTable::builtin().with_overrides(&config.easing);
        let sim = Simulation {
            generation: 0,
            dataset: String::new(),
            driver: ProgressDriver::new(easing, config.timing.min_duration_secs),
            revealer: LogRevealer::new(),
            sampler: MetricsSampler::new(config.seed),
        };
        let (updates, _) = watch::channel(sim.snapshot());

        Self {
            shared: Arc::new(Shared {
                sim: Mutex::new(sim),
                updates,
            }),
            timing: config.timing.clone(),
            timers: Mutex::new(None),
            log_tx: None,
        }
    }

    /// Revealed log lines are forwarded to `tx`.
    pub fn with_log_sink(mut self, tx: mpsc::Sender<LogMessage>) -> Self {
        self.log_tx = Some(tx);
        self
    }

    /// Begins a run over a snapshot of `catalog`. Must be called from within a
    /// Tokio runtime.
    ///
    /// Returns `false` without touching anything while a run is in progress,
    /// and `false` after resetting to idle when `catalog` is empty.
    pub fn start(&self, dataset: impl Into<String>, catalog: &[StepDefinition]) -> bool {
        let mut timers = self.timers.lock();

        if self.shared.sim.lock().driver.is_running() {
            return false;
        }

        if let Some(previous) = timers.take() {
            previous.cancel();
        }

        let (generation, started) = {
            let mut sim = self.shared.sim.lock();
            sim.generation += 1;
            sim.dataset = dataset.into();
            let started = sim.driver.start(catalog);
            sim.revealer.reset(0);
            self.shared.updates.send_replace(sim.snapshot());
            (sim.generation, started)
        };

        if !started {
            return false;
        }

        let token = CancellationToken::new();
        let handles = vec![
            tokio::spawn(progress_loop(
                self.shared.clone(),
                generation,
                token.clone(),
                self.timing.progress_tick(),
                self.timing.step_pause(),
                self.log_tx.clone(),
            )),
            tokio::spawn(log_loop(
                self.shared.clone(),
                generation,
                token.clone(),
                self.timing.log_tick(),
                self.log_tx.clone(),
            )),
            tokio::spawn(metrics_loop(
                self.shared.clone(),
                generation,
                token.clone(),
                self.timing.metrics_tick(),
            )),
        ];

        *timers = Some(TimerRegistry { token, handles });
        true
    }

    /// Halts the run and cancels its timers, including a pending step advance.
    ///
    /// Returns whether a run was actually running.
    pub fn stop(&self) -> bool {
        let mut timers = self.timers.lock();
        if let Some(registry) = timers.take() {
            registry.cancel();
        }

        let mut sim = self.shared.sim.lock();
        let was_running = sim.driver.stop();
        self.shared.updates.send_replace(sim.snapshot());
        was_running
    }

    /// Stops the run and waits for every timer task to finish.
    pub async fn shutdown(self) {
        let registry = self.timers.lock().take();
        self.shared.sim.lock().driver.stop();
        if let Some(registry) = registry {
            registry.drain().await;
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<RunSnapshot> {
        self.shared.updates.subscribe()
    }

    pub fn snapshot(&self) -> RunSnapshot {
        self.shared.sim.lock().snapshot()
    }

    /// Takes a metrics reading right now, outside the sampling timer.
    pub fn sample_metrics(&self) -> SyntheticMetrics {
        let mut sim = self.shared.sim.lock();
        let metrics = sim.sample_metrics();
        self.shared.updates.send_replace(sim.snapshot());
        metrics
    }

    pub fn current_step(&self) -> Option<StepRuntimeState> {
        self.shared.sim.lock().driver.current_step().cloned()
    }

    pub fn steps(&self) -> Vec<StepRuntimeState> {
        self.shared.sim.lock().driver.steps().to_vec()
    }

    pub fn current_step_index(&self) -> usize {
        self.shared.sim.lock().driver.current_step_index()
    }

    pub fn step_progress(&self) -> f64 {
        self.shared.sim.lock().driver.step_progress()
    }

    pub fn phase(&self) -> RunPhase {
        self.shared.sim.lock().driver.phase()
    }

    pub fn is_running(&self) -> bool {
        self.shared.sim.lock().driver.is_running()
    }

    pub fn is_completed(&self) -> bool {
        self.shared.sim.lock().driver.is_completed()
    }

    pub fn revealed_log_index(&self) -> usize {
        self.shared.sim.lock().revealer.revealed_index()
    }

    pub fn metrics(&self) -> SyntheticMetrics {
        self.shared.sim.lock().sampler.latest()
    }
}

impl Drop for RunController {
    fn drop(&mut self) {
        if let Some(registry) = self.timers.get_mut().take() {
            registry.cancel();
        }
    }
}

fn ticker(period: Duration) -> time::Interval {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn forward(
    log_tx: &Option<mpsc::Sender<LogMessage>>,
    message: Option<LogMessage>,
    token: &CancellationToken,
) {
    if let (Some(tx), Some(message)) = (log_tx, message) {
        tokio::select! {
            _ = token.cancelled() => {}
            _ = tx.send(message) => {}
        }
    }
}

async fn progress_loop(
    shared: Arc<Shared>,
    generation: u64,
    token: CancellationToken,
    tick: Duration,
    pause: Duration,
    log_tx: Option<mpsc::Sender<LogMessage>>,
) {
    let mut interval = ticker(tick);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = interval.tick() => {}
        }

        let Some((outcome, opening_line)) = shared.update(generation, Simulation::progress_tick)
        else {
            break;
        };
        forward(&log_tx, opening_line, &token).await;

        match outcome {
            TickOutcome::StepCompleted { .. } => {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = time::sleep(pause) => {}
                }

                if shared
                    .update(generation, Simulation::advance)
                    .flatten()
                    .is_none()
                {
                    break;
                }
                interval.reset();
            }
            TickOutcome::RunCompleted => {
                token.cancel();
                break;
            }
            TickOutcome::Progressed { .. } | TickOutcome::Idle => {}
        }
    }
}

async fn log_loop(
    shared: Arc<Shared>,
    generation: u64,
    token: CancellationToken,
    tick: Duration,
    log_tx: Option<mpsc::Sender<LogMessage>>,
) {
    let mut interval = ticker(tick);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = interval.tick() => {}
        }

        let Some(revealed) = shared.update(generation, Simulation::log_tick) else {
            break;
        };
        forward(&log_tx, revealed, &token).await;
    }
}

async fn metrics_loop(
    shared: Arc<Shared>,
    generation: u64,
    token: CancellationToken,
    tick: Duration,
) {
    let mut interval = ticker(tick);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = interval.tick() => {}
        }

        if shared.update(generation, Simulation::sample_metrics).is_none() {
            break;
        }
    }
}
