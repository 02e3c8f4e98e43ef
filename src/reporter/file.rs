use anyhow::Ok;
use tokio::{fs::File, io::AsyncWriteExt};

use crate::models::RunReport;

pub struct FileReporter;

impl FileReporter {
    pub async fn save(report: &RunReport, path: &str) -> anyhow::Result<()> {
        let mut file = File::create(path).await?;
        file.write_all(Self::render(report).as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }

    pub fn render(report: &RunReport) -> String {
        let mut buffer = String::new();

        buffer.push_str("--- Pipeline Report ---\n\n");
        buffer.push_str(&format!("Dataset: {}\n", report.dataset));
        buffer.push_str(&format!(
            "Outcome: {} | Duration {}s\n\n",
            if report.is_success() { "Completed" } else { "Stopped" },
            report.elapsed
        ));

        for step in report.step_reports.iter() {
            buffer.push_str(&format!(
                "Step: {} | Status {:?} | Progress {:.0}% | Logs {} | View {}\n",
                step.id,
                step.status,
                step.progress,
                report.logs.get(&step.id).map_or(0, Vec::len),
                step.visualization.as_str(),
            ));
        }

        buffer
    }
}
