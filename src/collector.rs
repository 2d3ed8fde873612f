//! Fan-out collection of the metrics of all selected containers.
//!
//! One collection lists the running containers, keeps those passing the [`NameFilter`] and
//! fetches their stats concurrently. At most `max_concurrent_fetches` fetches are in flight at
//! a time, further limited by the number of selected containers, so that the duration of a
//! collection is bounded by the slowest runtime probe rather than by the sum of all probes.
//!
//! A failing fetch only drops its own container. All fetches are awaited; there is no early
//! cancellation of stragglers.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::ResultOkLogExt;
use crate::container::{ContainerRef, NameFilter};
use crate::runtime::ContainerRuntime;
use crate::stats::{self, ContainerMetric};

/// Default upper bound of concurrent stats fetches.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to list containers: {0}")]
    Listing(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Collector<R> {
    runtime: Arc<R>,
    filter: NameFilter,
    max_concurrent_fetches: usize,
}

impl<R: ContainerRuntime> Collector<R> {
    /// Creates a collector. A `max_concurrent_fetches` of zero is treated as one.
    pub fn new(runtime: Arc<R>, filter: NameFilter, max_concurrent_fetches: usize) -> Self {
        Self {
            runtime,
            filter,
            max_concurrent_fetches: max_concurrent_fetches.max(1),
        }
    }

    pub fn filter(&self) -> &NameFilter {
        &self.filter
    }

    /// Collects the metrics of all selected containers.
    ///
    /// The order of the returned metrics is the order in which the fetches completed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Listing`] if the containers could not be listed. Failures of single
    /// containers are logged and the container is left out of the result.
    pub async fn try_collect(&self) -> Result<Vec<ContainerMetric>> {
        let containers = self
            .runtime
            .list_containers()
            .await
            .map_err(|err| Error::Listing(Box::new(err)))?;
        let listed = containers.len();
        let selected: Vec<ContainerRef> = containers
            .into_iter()
            .filter(|container| self.filter.matches(container))
            .collect();
        log::debug!(
            "selected {} of {} containers (filter: {})",
            selected.len(),
            listed,
            self.filter
        );
        if selected.is_empty() {
            return Ok(Vec::new());
        }

        let workers = self.max_concurrent_fetches.min(selected.len());
        let permits = Arc::new(Semaphore::new(workers));
        let mut fetches = JoinSet::new();
        for container in selected {
            let runtime = Arc::clone(&self.runtime);
            let permits = Arc::clone(&permits);
            fetches.spawn(async move {
                // The semaphore is never closed, acquiring only fails after `close()`.
                let _permit = permits.acquire().await.ok();
                stats::fetch(runtime.as_ref(), &container).await
            });
        }

        let mut metrics = Vec::with_capacity(fetches.len());
        while let Some(joined) = fetches.join_next().await {
            match joined {
                Ok(Ok(metric)) => metrics.push(metric),
                Ok(Err(err)) => log::warn!("dropping container from this cycle: {err}"),
                Err(err) => log::error!("stats fetch task failed: {err}"),
            }
        }

        Ok(metrics)
    }

    /// Collects the metrics of all selected containers, reporting a listing failure and
    /// returning no metrics in that case.
    pub async fn collect(&self) -> Vec<ContainerMetric> {
        self.try_collect().await.ok_log().unwrap_or_default()
    }
}
