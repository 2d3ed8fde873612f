use std::path::{Path, PathBuf};
use std::{pin, task};

use http_body_util::Empty;
use hyper::body::Bytes;
use hyper::client::conn::http1::{self, SendRequest};
use hyper_util::rt::TokioIo;

use super::error::{Error, Result};

/// Opens one HTTP/1 connection to the docker daemon per call.
///
/// The daemon is always reached through its unix socket, the authority of the requested uri is
/// ignored. The connection is driven by a spawned task until the returned sender is dropped.
#[derive(Debug, Clone)]
pub(super) struct DaemonDialer {
    socket_path: PathBuf,
}

impl DaemonDialer {
    pub(super) fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    pub(super) fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

impl tower::Service<hyper::Uri> for DaemonDialer {
    type Response = SendRequest<Empty<Bytes>>;

    type Error = Error;

    type Future = pin::Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut task::Context<'_>) -> task::Poll<Result<()>> {
        task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, uri: hyper::Uri) -> Self::Future {
        let socket_path = self.socket_path.clone();
        Box::pin(async move {
            log::trace!("Dialing {} for {uri}", socket_path.display());
            let stream = match tokio::net::UnixStream::connect(&socket_path).await {
                Ok(stream) => stream,
                Err(source) => {
                    return Err(Error::SocketConnect {
                        path: socket_path,
                        source,
                    });
                }
            };

            let (sender, connection) = http1::handshake(TokioIo::new(stream))
                .await
                .map_err(Error::Handshake)?;
            tokio::spawn(async move {
                if let Err(err) = connection.await {
                    log::debug!("docker connection closed with error: {err}");
                }
            });

            Ok(sender)
        })
    }
}
