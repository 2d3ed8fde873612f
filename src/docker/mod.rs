//! Client for the Docker Engine API on the local control socket.
//!
//! Only the two endpoints the exporter needs are implemented:
//!
//! - `GET /containers/json` lists the running containers.
//! - `GET /containers/{id}/stats?stream=false` returns one stats sample. The daemon samples the
//!   container twice for this call and fills in `precpu_stats`, so the request takes about one
//!   second to complete.
mod client;
mod connector;
mod error;
mod models;

pub use client::DockerClient;
pub use error::{Error, Result};
pub use models::ContainerSummary;

/// Default location of the docker daemon socket.
pub const DEFAULT_SOCKET_PATH: &str = "/var/run/docker.sock";
