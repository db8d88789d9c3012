//! Host metrics sampling using sysinfo.

use sysinfo::{Networks, System};

use crate::config::NetworkConfig;

/// Series names published by [`SystemCollector`].
pub const CPU_SERIES: &str = "CPU";
pub const RAM_SERIES: &str = "RAM";
pub const TCP_OUT_SERIES: &str = "TCP Out";

const BYTES_PER_MB: f64 = 1_000_000.0;

/// One reading of the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostSample {
    /// Global CPU usage, 0..100.
    pub cpu_percent: f64,
    /// Used memory, 0..100. `None` when total memory is unknown.
    pub ram_percent: Option<f64>,
    /// Megabytes transmitted since the previous reading.
    pub tcp_out_mb: Option<f64>,
}

impl HostSample {
    /// Samples keyed by series name.
    pub fn series(&self) -> [(&'static str, Option<f64>); 3] {
        [
            (CPU_SERIES, Some(self.cpu_percent)),
            (RAM_SERIES, self.ram_percent),
            (TCP_OUT_SERIES, self.tcp_out_mb),
        ]
    }
}

/// Collector for host CPU, memory and outbound traffic.
pub struct SystemCollector {
    system: System,
    networks: Networks,
    network: NetworkConfig,
    /// Transmitted byte total at the previous reading.
    prev_tx: Option<u64>,
}

impl SystemCollector {
    /// Create a new collector.
    pub fn new(network: NetworkConfig) -> Self {
        let mut system = System::new();
        // Prime CPU usage; the first delta needs a baseline.
        system.refresh_cpu_usage();

        Self {
            system,
            networks: Networks::new_with_refreshed_list(),
            network,
            prev_tx: None,
        }
    }

    /// Take one reading.
    ///
    /// The first reading has no traffic figure.
    pub fn sample(&mut self) -> HostSample {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();
        self.networks.refresh(true);

        let tx_total: u64 = self
            .networks
            .list()
            .iter()
            .filter(|(name, _)| self.network.should_include(name))
            .map(|(_, data)| data.total_transmitted())
            .sum();

        let tcp_out_mb = tx_delta_mb(self.prev_tx, tx_total);
        self.prev_tx = Some(tx_total);

        let sample = HostSample {
            cpu_percent: self.system.global_cpu_usage() as f64,
            ram_percent: memory_percent(self.system.used_memory(), self.system.total_memory()),
            tcp_out_mb,
        };

        tracing::debug!(
            cpu = sample.cpu_percent,
            ram = ?sample.ram_percent,
            tcp_out_mb = ?sample.tcp_out_mb,
            "Sampled host"
        );

        sample
    }
}

/// Percentage of `total` in use.
pub fn memory_percent(used: u64, total: u64) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(used as f64 / total as f64 * 100.0)
    }
}

/// Megabytes sent between two counter readings.
///
/// `None` without a previous reading or when the counter went backwards
/// (interface reset).
pub fn tx_delta_mb(previous: Option<u64>, current: u64) -> Option<f64> {
    let previous = previous?;
    current
        .checked_sub(previous)
        .map(|bytes| bytes as f64 / BYTES_PER_MB)
}
