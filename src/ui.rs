use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::models::{RunSnapshot, StepDefinition, StepStatus};

const PENDING_TEMPLATE: &str = "  {prefix:<28} {bar:30.white/black} WAIT  {msg}";
const RUNNING_TEMPLATE: &str = "  {prefix:<28} {bar:30.cyan/blue} {pos:>3}%  {msg}";
const DONE_TEMPLATE: &str = "  {prefix:<28} {bar:30.green/green} DONE  {msg}";
const ERROR_TEMPLATE: &str = "  {prefix:<28} {bar:30.red/red} ERROR {msg}";

/// Live terminal dashboard: one bar per step plus a resource gauge line.
pub struct PipelineUI {
    multi: MultiProgress,
    bars: Vec<ProgressBar>,
    gauges: ProgressBar,
    styles: Styles,
}

struct Styles {
    pending: ProgressStyle,
    running: ProgressStyle,
    done: ProgressStyle,
    error: ProgressStyle,
}

impl Styles {
    fn new() -> anyhow::Result<Self> {
        Ok(Self {
            pending: ProgressStyle::with_template(PENDING_TEMPLATE)?.progress_chars("·  "),
            running: ProgressStyle::with_template(RUNNING_TEMPLATE)?.progress_chars("#> "),
            done: ProgressStyle::with_template(DONE_TEMPLATE)?.progress_chars("##"),
            error: ProgressStyle::with_template(ERROR_TEMPLATE)?,
        })
    }

    fn for_status(&self, status: StepStatus) -> &ProgressStyle {
        match status {
            StepStatus::Pending => &self.pending,
            StepStatus::Running => &self.running,
            StepStatus::Completed => &self.done,
            StepStatus::Error => &self.error,
        }
    }
}

impl PipelineUI {
    pub fn new(catalog: &[StepDefinition]) -> anyhow::Result<Self> {
        let multi = MultiProgress::new();
        let styles = Styles::new()?;

        let bars = catalog
            .iter()
            .map(|step| {
                let pb = multi.add(ProgressBar::new(100));
                pb.set_style(styles.pending.clone());
                pb.set_prefix(step.name.clone());
                pb
            })
            .collect();

        let gauges = multi.add(ProgressBar::new_spinner());
        gauges.set_style(ProgressStyle::with_template("  {msg}")?);

        Ok(Self {
            multi,
            bars,
            gauges,
            styles,
        })
    }

    pub fn println(&self, line: impl AsRef<str>) {
        self.multi.println(line).ok();
    }

    pub fn render(&self, snapshot: &RunSnapshot) {
        for (step, pb) in snapshot.steps.iter().zip(self.bars.iter()) {
            pb.set_style(self.styles.for_status(step.status).clone());
            pb.set_position(step.progress.round() as u64);
            pb.set_message(step.current_message.clone().unwrap_or_default());
        }

        self.gauges.set_message(snapshot.metrics.summary());
    }

    pub fn finish(&self, snapshot: &RunSnapshot) {
        self.render(snapshot);
        for (step, pb) in snapshot.steps.iter().zip(self.bars.iter()) {
            match step.status {
                StepStatus::Completed => pb.finish(),
                _ => pb.abandon(),
            }
        }
        self.gauges.finish_and_clear();
    }
}
