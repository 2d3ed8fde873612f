//! Docker stats exporter: periodically samples the CPU and memory usage of running docker
//! containers and exposes them as Prometheus text metrics over HTTP.
//!
//! A [`snapshot::Publisher`] runs collection cycles in the background. Each cycle lists the
//! containers through a [`runtime::ContainerRuntime`], fetches their stats concurrently
//! ([`collector::Collector`]), renders them ([`metrics::render`]) and swaps the text into a
//! [`snapshot::SharedSnapshot`], which [`api::APIServer`] serves on `GET /metrics`.
use std::sync::Arc;

pub mod api;
pub mod collector;
pub mod config;
pub mod container;
pub mod docker;
pub mod error;
pub mod metrics;
pub mod runtime;
pub mod snapshot;
pub mod stats;

pub use error::ResultOkLogExt;

/// Runs the exporter until it receives Ctrl-C.
///
/// # Errors
///
/// Possible errors include:
/// - Invalid environment configuration (e.g., a non-numeric `PORT`).
/// - Failure to bind the metrics endpoint.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::from_env().map_err(error::Error::from)?;
    log::debug!("Configuration: {config:?}");

    let runtime = Arc::new(docker::DockerClient::new(&config.docker_socket));
    log::info!(
        "Collecting container stats from {}",
        runtime.socket_path().display()
    );

    let snapshot = snapshot::SharedSnapshot::default();
    let collector = collector::Collector::new(
        runtime,
        config.filter.clone(),
        config.max_concurrent_fetches,
    );
    let publisher = tokio::spawn(
        snapshot::Publisher::new(collector, snapshot.clone(), config.poll_interval).run(),
    );

    let result = api::APIServer::new(snapshot)
        .listen(config.socket_addr(), shutdown_signal())
        .await;
    publisher.abort();
    result?;

    log::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("Received Ctrl-C, shutting down"),
        Err(err) => {
            log::error!("failed to listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    }
}
