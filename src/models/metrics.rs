/// One reading of the simulated resource gauges.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SyntheticMetrics {
    /// Processor load, percent.
    pub cpu: f64,
    /// Memory use, percent.
    pub memory: f64,
    /// Disk throughput, MB/s.
    pub disk: f64,
    /// Network throughput, MB/s.
    pub network: f64,
}

impl SyntheticMetrics {
    pub fn new(cpu: f64, memory: f64, disk: f64, network: f64) -> Self {
        Self {
            cpu,
            memory,
            disk,
            network,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "CPU {:>5.1}%  MEM {:>5.1}%  DISK {:>5.1} MB/s  NET {:>5.1} MB/s",
            self.cpu, self.memory, self.disk, self.network
        )
    }
}
