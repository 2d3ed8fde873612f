//! Memory usage derivation.

use super::sample::RawStatsSample;

/// Computes the memory usage as a percentage of the memory limit.
///
/// Returns `0.0` if the limit is zero, i.e., unknown.
///
/// # Examples
///
/// ```
/// # use docker_stats_exporter::stats::memory_percentage;
/// assert_eq!(memory_percentage(256, 1024), 25.0);
/// assert_eq!(memory_percentage(256, 0), 0.0);
/// ```
pub fn memory_percentage(usage: u64, limit: u64) -> f64 {
    if limit == 0 {
        return 0.0;
    }
    (usage as f64 / limit as f64) * 100.0
}

/// Memory usage percentage of a sample, counting missing fields as zero.
pub(super) fn sample_memory_percentage(sample: &RawStatsSample) -> f64 {
    memory_percentage(
        sample.memory_stats.usage.unwrap_or(0),
        sample.memory_stats.limit.unwrap_or(0),
    )
}
