/// Entry point of the docker stats exporter.
///
/// Polls the docker daemon for the CPU and memory usage of the running containers and serves
/// the results in the Prometheus text format on `/metrics`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the metrics endpoint cannot be bound.
///
/// # Examples
///
/// ```bash
/// STACKS=web,db PORT=9091 RUST_LOG=info cargo run
/// ```
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    docker_stats_exporter::run().await
}
