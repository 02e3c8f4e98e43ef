use std::{path::PathBuf, time::Instant};

use anyhow::Ok;
use chrono::Local;
use clap::Parser;
use tokio::fs::{File, create_dir_all};

use edna_sim::{
    logger::Logger,
    models::{
        DatasetRepository, RawCatalog, RunReport, SimulatorConfig, StepStatus, builtin_catalog,
    },
    reporter::{ConsoleReporter, FileReporter},
    runner::RunController,
    storage::FileStore,
    ui::PipelineUI,
};

#[derive(Debug, Parser)]
#[command(name = "edna-sim", about = "Simulated eDNA biodiversity pipeline run")]
struct Args {
    /// Step catalog TOML; the built-in eDNA pipeline when omitted.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Simulator timing/easing TOML.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset id to select before running.
    #[arg(long)]
    dataset: Option<String>,

    #[arg(long, default_value = ".edna-sim/store.toml")]
    store: PathBuf,

    /// Write a plain-text report here once the run ends.
    #[arg(long)]
    report: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimulatorConfig::load(path).await?,
        None => SimulatorConfig::default(),
    };
    let catalog = match &args.catalog {
        Some(path) => RawCatalog::load(path).await?,
        None => builtin_catalog(),
    };

    let repository = DatasetRepository::mock();
    let mut store = FileStore::open(&args.store).await?;

    if let Some(id) = &args.dataset {
        if repository.select(&mut store, id).is_none() {
            print_datasets(&repository);
            anyhow::bail!("Unknown dataset '{id}'.");
        }
        store.save().await?;
    }

    let Some(dataset) = repository.current(&store).cloned() else {
        print_datasets(&repository);
        anyhow::bail!("No dataset selected. Pass --dataset <id>.");
    };

    create_dir_all("logs").await?;
    let log_name = format!("logs/run_{}.log", Local::now().format("%Y-%m-%d_%H-%M-%S"));
    let log_file = File::create(&log_name).await?;

    let logger = Logger::new(100, Some(log_file));
    let controller = RunController::new(&config).with_log_sink(logger.tx());
    let ui = PipelineUI::new(&catalog)?;
    let mut updates = controller.subscribe();

    ui.println(format!("🚀 Processing: {}", dataset.name));
    let timer = Instant::now();

    if !controller.start(&dataset.name, &catalog) {
        anyhow::bail!("Nothing to simulate: the step catalog is empty.");
    }

    let mut statuses: Vec<StepStatus> = catalog.iter().map(|_| StepStatus::Pending).collect();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                controller.stop();
                ui.println("🛑 Interrupted, stopping simulation");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }

        let snapshot = updates.borrow_and_update().clone();
        ui.render(&snapshot);

        for (step, seen) in snapshot.steps.iter().zip(statuses.iter_mut()) {
            if step.status == StepStatus::Completed && *seen != StepStatus::Completed {
                ui.println(format!("✅ Finished: {}", step.definition.name));
            }
            *seen = step.status;
        }

        if !snapshot.is_running {
            break;
        }
    }

    let final_snapshot = controller.snapshot();
    ui.finish(&final_snapshot);
    controller.shutdown().await;

    let logs = logger.finish().await?;
    let report = RunReport::from_snapshot(&final_snapshot, logs, timer.elapsed().as_secs());
    ConsoleReporter::report(&report, config.seed);

    if let Some(path) = &args.report {
        FileReporter::save(&report, path).await?;
        println!("📝 Report saved to {path}");
    }
    println!("📜 Logs written to {log_name}");

    if !report.is_success() {
        anyhow::bail!("Pipeline stopped before completion.");
    }

    Ok(())
}

fn print_datasets(repository: &DatasetRepository) {
    println!("Available datasets:");
    for dataset in repository.flatten() {
        println!("  {:<28} {}", dataset.id, dataset.name);
    }
}
