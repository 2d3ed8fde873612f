//! Boundary to the container runtime.
//!
//! The exporter only needs two things from the runtime: the list of running containers and one
//! point-in-time stats sample per container. [`crate::docker::DockerClient`] implements this
//! against the Docker Engine API; tests substitute an in-memory runtime.

use crate::container::ContainerRef;
use crate::stats::RawStatsSample;

pub trait ContainerRuntime: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Lists the containers currently running.
    fn list_containers(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ContainerRef>, Self::Error>> + Send;

    /// Retrieves a single stats sample for `container`.
    ///
    /// The sample carries both the current and the previous CPU counters, so no history has to
    /// be kept between calls. The call may block for the duration of one runtime stats probe.
    fn container_stats(
        &self,
        container: &ContainerRef,
    ) -> impl std::future::Future<Output = Result<RawStatsSample, Self::Error>> + Send;
}
