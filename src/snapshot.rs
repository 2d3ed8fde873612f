//! Publication of the rendered metrics.
//!
//! The [`Publisher`] loop runs one collection cycle after another and swaps the rendered text
//! into a [`SharedSnapshot`], from which the HTTP endpoint serves it. Readers always see the
//! complete output of one finished cycle: a snapshot is an immutable `Arc<str>` that is
//! replaced as a whole under the write guard and never modified in place.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::collector::{self, Collector};
use crate::metrics;
use crate::runtime::ContainerRuntime;

/// Default pause between two collection cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Handle to the most recently published metrics text.
///
/// Cloning the handle shares the underlying snapshot. Before the first publish the snapshot
/// is the empty string.
#[derive(Debug, Clone)]
pub struct SharedSnapshot {
    latest: Arc<RwLock<Arc<str>>>,
}

impl Default for SharedSnapshot {
    fn default() -> Self {
        Self {
            latest: Arc::new(RwLock::new(Arc::from(""))),
        }
    }
}

impl SharedSnapshot {
    /// Replaces the published snapshot.
    pub async fn publish(&self, snapshot: impl Into<Arc<str>>) {
        let snapshot = snapshot.into();
        *self.latest.write().await = snapshot;
    }

    /// Returns the currently published snapshot.
    pub async fn latest(&self) -> Arc<str> {
        Arc::clone(&*self.latest.read().await)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to collect container metrics: {0}")]
    Collect(#[from] collector::Error),
    #[error("collection cycle aborted: {0}")]
    Aborted(#[source] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Spawned collection cycle, aborted when the handle is dropped before the cycle finished.
struct CycleTask<T>(JoinHandle<T>);

impl<T> Drop for CycleTask<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Periodically collects, renders and publishes the container metrics.
#[derive(Debug)]
pub struct Publisher<R> {
    collector: Arc<Collector<R>>,
    snapshot: SharedSnapshot,
    interval: Duration,
}

impl<R: ContainerRuntime> Publisher<R> {
    /// Creates a publisher that waits `interval` after each finished cycle before starting the
    /// next one.
    pub fn new(collector: Collector<R>, snapshot: SharedSnapshot, interval: Duration) -> Self {
        Self {
            collector: Arc::new(collector),
            snapshot,
            interval,
        }
    }

    /// Runs a single collection cycle and publishes its result.
    ///
    /// Returns the number of containers in the published snapshot.
    ///
    /// # Errors
    ///
    /// If the containers cannot be listed or the cycle panics, nothing is published and the
    /// previous snapshot stays in place. Dropping the returned future cancels the cycle
    /// together with its pending fetches.
    pub async fn run_cycle(&self) -> Result<usize> {
        let collector = Arc::clone(&self.collector);
        let mut cycle = CycleTask(tokio::spawn(async move {
            let metrics = collector.try_collect().await?;
            Ok::<_, Error>((metrics::render(&metrics), metrics.len()))
        }));
        let (rendered, count) = (&mut cycle.0).await.map_err(Error::Aborted)??;

        self.snapshot.publish(rendered).await;
        Ok(count)
    }

    /// Runs collection cycles forever.
    ///
    /// The pause between cycles is measured from the end of a cycle, so a long cycle delays
    /// the following one. Failed cycles are logged and do not stop the loop.
    pub async fn run(self) {
        log::info!(
            "publishing container metrics every {}s (filter: {})",
            self.interval.as_secs(),
            self.collector.filter()
        );
        loop {
            log::debug!("starting collection cycle");
            let before = std::time::Instant::now();
            match self.run_cycle().await {
                Ok(count) => log::info!(
                    "published metrics of {} containers in {} ms",
                    count,
                    before.elapsed().as_millis()
                ),
                Err(err) => log::error!("collection cycle failed, keeping previous snapshot: {err}"),
            }
            tokio::time::sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::NameFilter;
    use crate::runtime::fake::{FakeRuntime, sample};

    fn publisher(runtime: FakeRuntime, snapshot: &SharedSnapshot) -> Publisher<FakeRuntime> {
        Publisher::new(
            Collector::new(Arc::new(runtime), NameFilter::All, 32),
            snapshot.clone(),
            Duration::from_millis(10),
        )
    }

    #[tokio::test]
    async fn test_snapshot_starts_empty() {
        let snapshot = SharedSnapshot::default();
        assert_eq!(&*snapshot.latest().await, "");
    }

    #[tokio::test]
    async fn test_publish_replaces_snapshot() {
        let snapshot = SharedSnapshot::default();
        let reader = snapshot.clone();
        snapshot.publish("first").await;
        assert_eq!(&*reader.latest().await, "first");
        snapshot.publish(String::from("second")).await;
        assert_eq!(&*reader.latest().await, "second");
    }

    #[tokio::test]
    async fn test_cycle_publishes_successful_containers() {
        let snapshot = SharedSnapshot::default();
        let runtime = FakeRuntime::default()
            .with_container("a", sample(100, 200))
            .with_failing_container("b", "gone")
            .with_container("c", crate::stats::RawStatsSample::default());

        let count = publisher(runtime, &snapshot).run_cycle().await.unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            &*snapshot.latest().await,
            "docker_cpu_usage{container=\"a\"} 10.0\ndocker_memory_usage{container=\"a\"} 20.0"
        );
    }

    #[tokio::test]
    async fn test_listing_failure_keeps_previous_snapshot() {
        let snapshot = SharedSnapshot::default();
        snapshot.publish("previous").await;
        let runtime = FakeRuntime::default()
            .with_container("a", sample(100, 200))
            .with_failing_listing("daemon unreachable");

        let err = publisher(runtime, &snapshot).run_cycle().await.unwrap_err();
        assert!(matches!(err, Error::Collect(collector::Error::Listing(_))));
        assert_eq!(&*snapshot.latest().await, "previous");
    }

    #[tokio::test]
    async fn test_empty_cycle_publishes_empty_snapshot() {
        let snapshot = SharedSnapshot::default();
        snapshot.publish("previous").await;

        let count = publisher(FakeRuntime::default(), &snapshot)
            .run_cycle()
            .await
            .unwrap();
        assert_eq!(count, 0);
        assert_eq!(&*snapshot.latest().await, "");
    }

    #[tokio::test]
    async fn test_run_keeps_going_after_failures() {
        let snapshot = SharedSnapshot::default();
        let runtime = FakeRuntime::default().with_failing_listing("daemon unreachable");
        let handle = tokio::spawn(publisher(runtime, &snapshot).run());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!handle.is_finished());
        handle.abort();
        assert_eq!(&*snapshot.latest().await, "");
    }

    #[tokio::test]
    async fn test_panicking_cycle_keeps_previous_snapshot() {
        let snapshot = SharedSnapshot::default();
        snapshot.publish("previous").await;
        let runtime = FakeRuntime::default().with_panicking_listing();
        let publisher = publisher(runtime, &snapshot);

        let err = publisher.run_cycle().await.unwrap_err();
        assert!(matches!(err, Error::Aborted(ref join) if join.is_panic()));
        assert_eq!(&*snapshot.latest().await, "previous");

        let handle = tokio::spawn(publisher.run());
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!handle.is_finished());
        handle.abort();
        assert_eq!(&*snapshot.latest().await, "previous");
    }

    #[tokio::test]
    async fn test_panicking_fetch_drops_only_its_container() {
        let snapshot = SharedSnapshot::default();
        let runtime = FakeRuntime::default()
            .with_container("ok", sample(100, 200))
            .with_panicking_container("boom");

        let count = publisher(runtime, &snapshot).run_cycle().await.unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            &*snapshot.latest().await,
            "docker_cpu_usage{container=\"ok\"} 10.0\ndocker_memory_usage{container=\"ok\"} 20.0"
        );
    }

    #[tokio::test]
    async fn test_dropped_cycle_cancels_pending_fetches() {
        let snapshot = SharedSnapshot::default();
        let runtime = Arc::new(
            FakeRuntime::default()
                .with_container("a", sample(100, 200))
                .with_delay(Duration::from_millis(200)),
        );
        let publisher = Publisher::new(
            Collector::new(Arc::clone(&runtime), NameFilter::All, 32),
            snapshot.clone(),
            Duration::from_millis(10),
        );

        let cycle = tokio::time::timeout(Duration::from_millis(20), publisher.run_cycle()).await;
        assert!(cycle.is_err());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(runtime.completed(), 0);
        assert_eq!(&*snapshot.latest().await, "");
    }

    #[tokio::test]
    async fn test_run_publishes_periodically() {
        let snapshot = SharedSnapshot::default();
        let runtime = FakeRuntime::default().with_container("a", sample(500, 1000));
        let handle = tokio::spawn(publisher(runtime, &snapshot).run());

        let mut published = String::new();
        for _ in 0..100 {
            published = snapshot.latest().await.to_string();
            if !published.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.abort();
        assert_eq!(
            published,
            "docker_cpu_usage{container=\"a\"} 50.0\ndocker_memory_usage{container=\"a\"} 100.0"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_never_observe_partial_snapshots() {
        let snapshot = SharedSnapshot::default();
        let candidates: Arc<Vec<String>> = Arc::new(
            (0..4)
                .map(|i| {
                    let metrics: Vec<_> = (0..50)
                        .map(|c| {
                            crate::stats::ContainerMetric::new(
                                format!("cycle{i}-container{c}"),
                                f64::from(i),
                                f64::from(c),
                            )
                        })
                        .collect();
                    metrics::render(&metrics)
                })
                .collect(),
        );

        let writer = {
            let snapshot = snapshot.clone();
            let candidates = Arc::clone(&candidates);
            tokio::spawn(async move {
                for round in 0..1000 {
                    snapshot
                        .publish(candidates[round % candidates.len()].as_str())
                        .await;
                    tokio::task::yield_now().await;
                }
            })
        };

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let snapshot = snapshot.clone();
                let candidates = Arc::clone(&candidates);
                tokio::spawn(async move {
                    for _ in 0..1000 {
                        let seen = snapshot.latest().await;
                        assert!(
                            seen.is_empty() || candidates.iter().any(|c| c.as_str() == &*seen),
                            "observed a snapshot that was never published"
                        );
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
    }
}
