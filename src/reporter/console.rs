use rand::{SeedableRng, rngs::StdRng};

use crate::{
    models::{RunReport, StepStatus},
    visuals::{Cluster, chart_data, embedding_space},
};

pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn report(report: &RunReport, seed: Option<u64>) {
        println!("\n--- 📖 Pipeline Execution Logs ---");

        for step in report.step_reports.iter() {
            let Some(lines) = report.logs.get(&step.id) else {
                continue;
            };
            println!("\n=== {} ===", step.name.to_uppercase());
            for line in lines {
                println!("{line}");
            }
        }

        println!("\n--- 🧬 Summary: {} ---", report.dataset);

        for (index, step) in report.step_reports.iter().enumerate() {
            println!(
                "  {} {}. {}: {:.0}%",
                step.icon(),
                index + 1,
                step.name,
                step.progress
            );
        }

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        for step in report.step_reports.iter() {
            if step.status != StepStatus::Completed {
                continue;
            }
            if let Some(summary) = chart_data(step.visualization, &mut rng).summary() {
                println!("  📊 {}: {summary}", step.name);
            }
        }

        if report.is_success() {
            let points = embedding_space(&mut rng);
            let novel = points.iter().filter(|p| p.cluster == Cluster::Novel).count();
            println!(
                "\n🔭 Embedding space ready: {} points, {} novel clusters",
                points.len(),
                novel
            );
            println!("🏁 Pipeline completed in {}s", report.elapsed);
        } else {
            println!("\n🛑 Pipeline stopped after {}s", report.elapsed);
        }
    }
}
