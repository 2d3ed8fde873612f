use std::path::{Path, PathBuf};

use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use tower::ServiceExt;

use super::connector::DaemonDialer;
use super::error::{Error, Result};
use super::models::ContainerSummary;
use crate::ResultOkLogExt;
use crate::container::ContainerRef;
use crate::runtime::ContainerRuntime;
use crate::stats::RawStatsSample;

/// Docker Engine API client talking HTTP/1.1 over the daemon's unix socket.
///
/// Every request opens its own connection, so the client can be shared between any number of
/// concurrent fetches without coordination.
#[derive(Debug, Clone)]
pub struct DockerClient {
    dialer: DaemonDialer,
}

impl DockerClient {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            dialer: DaemonDialer::new(socket_path),
        }
    }

    pub fn socket_path(&self) -> &Path {
        self.dialer.socket_path()
    }

    async fn get(&self, path: &str) -> Result<Bytes> {
        let uri: hyper::Uri = path.parse().map_err(|source| Error::InvalidUri {
            path: path.to_owned(),
            source,
        })?;

        let mut sender = self.dialer.clone().oneshot(uri.clone()).await?;
        let request = hyper::Request::get(uri)
            .header(hyper::header::HOST, "localhost")
            .body(Empty::<Bytes>::new())
            .map_err(Error::Request)?;
        let response = sender.send_request(request).await.map_err(Error::Send)?;
        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(Error::Body)?
            .to_bytes();

        if !status.is_success() {
            return Err(Error::Status {
                path: path.to_owned(),
                status,
                body: String::from_utf8_lossy(&body).trim().to_owned(),
            });
        }

        Ok(body)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.get(path).await?;
        serde_json::from_slice(&body).map_err(|source| Error::Decode {
            path: path.to_owned(),
            source,
        })
    }
}

impl ContainerRuntime for DockerClient {
    type Error = Error;

    async fn list_containers(&self) -> Result<Vec<ContainerRef>> {
        let summaries: Vec<ContainerSummary> = self.get_json("/containers/json").await?;
        log::trace!("docker reported {} running containers", summaries.len());

        Ok(summaries
            .into_iter()
            .filter_map(|summary| ContainerRef::try_from(summary).ok_log())
            .collect())
    }

    async fn container_stats(&self, container: &ContainerRef) -> Result<RawStatsSample> {
        self.get_json(&format!("/containers/{}/stats?stream=false", container.id()))
            .await
    }
}
