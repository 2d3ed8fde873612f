use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to connect to socket `{path}`: {source}")]
    SocketConnect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid request path `{path}`: {source}")]
    InvalidUri {
        path: String,
        #[source]
        source: hyper::http::uri::InvalidUri,
    },
    #[error("failed to build request: {0}")]
    Request(#[source] hyper::http::Error),
    #[error("HTTP handshake with docker daemon failed: {0}")]
    Handshake(#[source] hyper::Error),
    #[error("failed to send request to docker daemon: {0}")]
    Send(#[source] hyper::Error),
    #[error("failed to read response body: {0}")]
    Body(#[source] hyper::Error),
    #[error("docker daemon responded to `{path}` with {status}: {body}")]
    Status {
        path: String,
        status: hyper::StatusCode,
        body: String,
    },
    #[error("failed to decode response for `{path}`: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
