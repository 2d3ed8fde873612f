//! Per-container stats retrieval and derivation of the exported percentages.
//!
//! [`fetch`] retrieves one [`RawStatsSample`] from the container runtime and turns it into a
//! [`ContainerMetric`]:
//!
//! - `cpu_usage_percent`: see [`cpu_percentage`].
//! - `memory_usage_percent`: see [`memory_percentage`].
//!
//! The two `cpu_usage.total_usage` counters are mandatory. Every other missing counter is
//! treated as zero.
//!
//! Fetching shares no mutable state, so any number of fetches for distinct containers may run
//! concurrently.

mod cpu;
mod error;
mod memory;
mod sample;

pub use cpu::{DEFAULT_CPU_COUNT, counter_delta, cpu_percentage};
pub use error::{FetchError, Result};
pub use memory::memory_percentage;
pub use sample::{CpuStats, CpuUsage, MemoryStats, RawStatsSample};

use crate::container::ContainerRef;
use crate::runtime::ContainerRuntime;

/// Derived resource usage of one container in one collection cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerMetric {
    name: String,
    cpu_usage_percent: f64,
    memory_usage_percent: f64,
}

impl ContainerMetric {
    pub fn new(name: impl Into<String>, cpu_usage_percent: f64, memory_usage_percent: f64) -> Self {
        Self {
            name: name.into(),
            cpu_usage_percent,
            memory_usage_percent,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// CPU usage in percent of one CPU, i.e., in `[0, 100 * cpu_count]`.
    pub fn cpu_usage_percent(&self) -> f64 {
        self.cpu_usage_percent
    }

    /// Memory usage in percent of the memory limit.
    pub fn memory_usage_percent(&self) -> f64 {
        self.memory_usage_percent
    }
}

/// Derives the metric of the container `name` from a raw stats sample.
///
/// # Errors
///
/// Returns [`FetchError::MandatoryFieldMissing`] if the current or previous
/// `cpu_usage.total_usage` counter is absent.
pub fn derive_metric(name: &str, sample: &RawStatsSample) -> Result<ContainerMetric> {
    let total_usage = sample
        .cpu_stats
        .cpu_usage
        .total_usage
        .ok_or_else(|| FetchError::MandatoryFieldMissing {
            container: name.to_owned(),
            field: "cpu_stats.cpu_usage.total_usage",
        })?;
    let previous_total_usage = sample
        .precpu_stats
        .cpu_usage
        .total_usage
        .ok_or_else(|| FetchError::MandatoryFieldMissing {
            container: name.to_owned(),
            field: "precpu_stats.cpu_usage.total_usage",
        })?;

    let cpu_usage_percent = cpu_percentage(
        counter_delta(total_usage, previous_total_usage),
        cpu::system_delta(sample),
        cpu::cpu_count(sample),
    );
    let memory_usage_percent = memory::sample_memory_percentage(sample);

    Ok(ContainerMetric::new(
        name,
        cpu_usage_percent,
        memory_usage_percent,
    ))
}

/// Retrieves one stats sample for `container` and derives its metric.
///
/// # Errors
///
/// Returns [`FetchError::Runtime`] if the runtime call fails and
/// [`FetchError::MandatoryFieldMissing`] if the sample lacks the CPU usage counters.
pub async fn fetch<R: ContainerRuntime>(
    runtime: &R,
    container: &ContainerRef,
) -> Result<ContainerMetric> {
    let before = std::time::Instant::now();
    let sample = runtime
        .container_stats(container)
        .await
        .map_err(|source| FetchError::Runtime {
            container: container.name().to_owned(),
            source: Box::new(source),
        })?;
    log::trace!(
        "fetching stats of container `{}` took {} ms",
        container.name(),
        before.elapsed().as_millis()
    );

    derive_metric(container.name(), &sample)
}
