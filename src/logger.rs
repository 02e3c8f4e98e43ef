use std::collections::HashMap;

use chrono::Local;
use colored::Colorize;
use tokio::{fs::File, io::AsyncWriteExt, sync::mpsc, task::JoinHandle};

pub struct Logger {
    tx: mpsc::Sender<LogMessage>,
    handle: JoinHandle<anyhow::Result<HashMap<String, Vec<String>>>>,
}

impl Logger {
    /// Collects lines per step; each line is also appended to `file` if given.
    pub fn new(buffer: usize, mut file: Option<File>) -> Self {
        let (tx, mut rx) = mpsc::channel::<LogMessage>(buffer);
        let handle = tokio::spawn(async move {
            let mut store: HashMap<String, Vec<String>> = HashMap::new();
            while let Some(log) = rx.recv().await {
                if let Some(file) = file.as_mut() {
                    file.write_all(log.file_format().as_bytes()).await?;
                    file.flush().await?;
                }
                let line = log.terminal_format();
                store.entry(log.step_name).or_default().push(line);
            }
            Ok::<_, anyhow::Error>(store)
        });

        Self { tx, handle }
    }

    pub fn tx(&self) -> mpsc::Sender<LogMessage> {
        self.tx.clone()
    }

    /// Waits for every sender to be dropped, then returns the collected lines.
    pub async fn finish(self) -> anyhow::Result<HashMap<String, Vec<String>>> {
        drop(self.tx);
        self.handle
            .await
            .map_err(|err| anyhow::anyhow!("Log task failed: {err}"))?
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub step_name: String,
    pub line: String,
}

impl LogMessage {
    pub fn terminal_format(&self) -> String {
        let name = format!("[{}]", self.step_name).bold().cyan();
        format!("{name} {}", self.line.trim_end().white())
    }

    pub fn file_format(&self) -> String {
        let timestamp = Local::now().format("%H:%M:%S");
        format!(
            "[{timestamp}] [{}] {}\n",
            self.step_name,
            self.line.trim_end()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(step: &str, line: &str) -> LogMessage {
        LogMessage {
            step_name: step.to_string(),
            line: line.to_string(),
        }
    }

    #[tokio::test]
    async fn collects_lines_per_step_in_order() {
        let logger = Logger::new(8, None);
        let tx = logger.tx();

        tx.send(message("qc", "fastp -i R1")).await.unwrap();
        tx.send(message("merge", "vsearch")).await.unwrap();
        tx.send(message("qc", "Detecting adapters...")).await.unwrap();
        drop(tx);

        let store = logger.finish().await.unwrap();
        assert_eq!(store["qc"].len(), 2);
        assert!(store["qc"][1].contains("Detecting adapters..."));
        assert_eq!(store["merge"].len(), 1);
    }

    #[tokio::test]
    async fn mirrors_lines_into_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let file = File::create(&path).await.unwrap();

        let logger = Logger::new(8, Some(file));
        logger.tx().send(message("qc", "done \n")).await.unwrap();
        logger.finish().await.unwrap();

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.ends_with("[qc] done\n"));
    }

    #[test]
    fn file_format_is_timestamped_and_trimmed() {
        let line = message("asv-inference", "$ dada2 learnErrors  ").file_format();
        assert!(line.starts_with('['));
        assert!(line.ends_with("] [asv-inference] $ dada2 learnErrors\n"));
    }

    #[test]
    fn terminal_format_keeps_step_and_line() {
        colored::control::set_override(false);
        let line = message("qc", "$ fastp -i R1").terminal_format();
        assert_eq!(line, "[qc] $ fastp -i R1");
    }
}
