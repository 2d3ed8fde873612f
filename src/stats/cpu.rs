//! CPU usage derivation.
//!
//! Docker reports cumulative CPU time for the container (`cpu_usage.total_usage`) and for the
//! whole host (`system_cpu_usage`), each for the current and the previous sample instant. The
//! share of host CPU time the container consumed between the two instants, scaled by the
//! number of online CPUs, gives a percentage in `[0, 100 * cpu_count]`.

use super::sample::RawStatsSample;

/// CPU count assumed when the runtime does not report `online_cpus`.
pub const DEFAULT_CPU_COUNT: u32 = 1;

/// Difference between two readings of a cumulative counter.
///
/// Computed in `i128` so that non-monotonic readings yield a negative delta instead of
/// wrapping, and so that large nanosecond counters keep their precision.
pub fn counter_delta(current: u64, previous: u64) -> i128 {
    i128::from(current) - i128::from(previous)
}

/// Computes the CPU usage percentage from the container and host CPU deltas.
///
/// Returns `0.0` if `system_delta` is not positive. This covers the first sample of a
/// container, where the previous reading is empty, as well as counter resets.
///
/// # Examples
///
/// ```
/// # use docker_stats_exporter::stats::cpu_percentage;
/// assert_eq!(cpu_percentage(50, 200, 2), 50.0);
/// assert_eq!(cpu_percentage(50, 0, 2), 0.0);
/// ```
pub fn cpu_percentage(cpu_delta: i128, system_delta: i128, cpu_count: u32) -> f64 {
    if system_delta <= 0 {
        return 0.0;
    }
    (cpu_delta as f64 / system_delta as f64) * f64::from(cpu_count) * 100.0
}

/// Number of CPUs to scale the usage with.
pub(super) fn cpu_count(sample: &RawStatsSample) -> u32 {
    sample.cpu_stats.online_cpus.unwrap_or(DEFAULT_CPU_COUNT)
}

/// Host CPU time elapsed between the previous and the current reading.
///
/// A missing `system_cpu_usage` counts as zero.
pub(super) fn system_delta(sample: &RawStatsSample) -> i128 {
    counter_delta(
        sample.cpu_stats.system_cpu_usage.unwrap_or(0),
        sample.precpu_stats.system_cpu_usage.unwrap_or(0),
    )
}
