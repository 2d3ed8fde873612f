use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::{TcpListener, ToSocketAddrs};

use crate::snapshot::SharedSnapshot;

/// Media type of the Prometheus text exposition format.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Serves the latest published snapshot verbatim.
///
/// Before the first collection cycle finished this is an empty body with status 200.
async fn metrics(snapshot: State<SharedSnapshot>) -> Response {
    let body = snapshot.latest().await;
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, CONTENT_TYPE)],
        body.to_string(),
    )
        .into_response()
}

pub struct APIServer {
    router: axum::Router,
}

impl APIServer {
    pub fn new(snapshot: SharedSnapshot) -> Self {
        let router = axum::Router::new()
            .route("/metrics", get(metrics))
            .with_state(snapshot);
        Self { router }
    }

    pub fn router(&self) -> axum::Router {
        self.router.clone()
    }

    /// Serves the API on `addr` until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Bind`] if the listener cannot be bound and
    /// [`crate::error::Error::Serve`] if serving fails.
    pub async fn listen(
        self,
        addr: impl ToSocketAddrs + std::fmt::Display,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> crate::error::Result<()> {
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| crate::error::Error::Bind {
                addr: addr.to_string(),
                source,
            })?;
        self.serve(listener, shutdown).await
    }

    /// Serves the API on an already bound `listener` until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Serve`] if serving fails.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> crate::error::Result<()> {
        match listener.local_addr() {
            Ok(addr) => log::info!("serving metrics on http://{addr}/metrics"),
            Err(err) => log::warn!("serving metrics on an unknown address: {err}"),
        }
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(crate::error::Error::Serve)
    }
}
