/// A point-in-time stats sample of one container, as returned by
/// `GET /containers/{id}/stats?stream=false`.
///
/// The sample carries two CPU readings: `cpu_stats` at the time of the sample and
/// `precpu_stats` at the previous sample instant, both supplied by the runtime. Fields the
/// exporter does not use are not decoded; missing fields decode to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct RawStatsSample {
    #[serde(default)]
    pub cpu_stats: CpuStats,
    #[serde(default)]
    pub precpu_stats: CpuStats,
    #[serde(default)]
    pub memory_stats: MemoryStats,
}

/// Cumulative CPU counters of one reading.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct CpuStats {
    #[serde(default)]
    pub cpu_usage: CpuUsage,
    /// Cumulative CPU time of the whole host, in nanoseconds.
    pub system_cpu_usage: Option<u64>,
    /// Number of CPUs online on the host.
    pub online_cpus: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct CpuUsage {
    /// Cumulative CPU time consumed by the container, in nanoseconds.
    pub total_usage: Option<u64>,
}

/// Memory usage and limit in bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct MemoryStats {
    pub usage: Option<u64>,
    pub limit: Option<u64>,
}
