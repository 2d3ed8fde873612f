//! Text rendering of container metrics.
//!
//! Every container yields two lines in the Prometheus text format:
//!
//! ```text
//! docker_cpu_usage{container="<name>"} <cpu_usage_percent>
//! docker_memory_usage{container="<name>"} <memory_usage_percent>
//! ```
//!
//! Container names are written into the label verbatim. Docker restricts names to
//! `[a-zA-Z0-9][a-zA-Z0-9_.-]`, so escaping is not needed for names assigned by docker.

use crate::stats::ContainerMetric;

pub const CPU_USAGE_METRIC: &str = "docker_cpu_usage";
pub const MEMORY_USAGE_METRIC: &str = "docker_memory_usage";

/// Renders the metrics as newline separated lines, without a trailing newline.
///
/// The lines follow the order of `metrics`.
///
/// # Examples
///
/// ```
/// # use docker_stats_exporter::metrics::render;
/// # use docker_stats_exporter::stats::ContainerMetric;
/// let text = render(&[ContainerMetric::new("a", 10.0, 20.0)]);
/// assert_eq!(
///     text,
///     "docker_cpu_usage{container=\"a\"} 10.0\ndocker_memory_usage{container=\"a\"} 20.0"
/// );
/// ```
pub fn render(metrics: &[ContainerMetric]) -> String {
    metrics
        .iter()
        .flat_map(|metric| {
            [
                line(CPU_USAGE_METRIC, metric.name(), metric.cpu_usage_percent()),
                line(
                    MEMORY_USAGE_METRIC,
                    metric.name(),
                    metric.memory_usage_percent(),
                ),
            ]
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// `{:?}` keeps the fractional part of integral values, i.e., `10.0` instead of `10`.
fn line(metric: &str, container: &str, value: f64) -> String {
    format!("{metric}{{container=\"{container}\"}} {value:?}")
}
