//! Hyper server setup and request handling.

use std::convert::Infallible;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming as IncomingBody};
use hyper::{Request, Response};
use hyper_util::rt::TokioExecutor;
use hyper_util::rt::TokioIo;
use hyper_util::server::conn::auto::Builder as ConnectionBuilder;
use tokio::net::TcpListener;
use tokio::time;

use crate::router::Router;

/// Pause after an accept failure that is not tied to a single connection.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// HTTP server for the user API.
pub struct Server {
    listener: TcpListener,
    router: Arc<Router>,
}

impl Server {
    /// Binds a new server instance.
    ///
    /// # Arguments
    /// * `addr` - Socket address to bind to (port 0 picks a free port)
    /// * `router` - Request router
    pub async fn bind(addr: SocketAddr, router: Router) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            router: Arc::new(router),
        })
    }

    /// Address the server is listening on.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Accepts connections until the task is dropped.
    ///
    /// Accept failures are logged and never end the loop.
    ///
    /// # Returns
    /// `Err` only if the listener address cannot be read at startup.
    pub async fn serve(self) -> Result<(), std::io::Error> {
        tracing::info!("Server listening on http://{}", self.local_addr()?);

        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(err) => {
                    tracing::error!("Failed to accept connection: {}", err);
                    if let Some(delay) = accept_error_backoff(&err) {
                        time::sleep(delay).await;
                    }
                    continue;
                }
            };
            let io = TokioIo::new(stream);
            let router = Arc::clone(&self.router);

            tokio::task::spawn(async move {
                let builder = ConnectionBuilder::new(TokioExecutor::new());
                if let Err(err) = builder
                    .serve_connection(
                        io,
                        hyper::service::service_fn(move |req| handle_request(req, router.clone())),
                    )
                    .await
                {
                    tracing::error!("Error serving connection from {}: {}", peer, err);
                }
            });
        }
    }
}

/// How long to wait before accepting again after `err`.
///
/// Errors that belong to one connection are retried immediately. Anything
/// else (EMFILE, ENFILE, ENOBUFS) would fail again straight away.
fn accept_error_backoff(err: &io::Error) -> Option<Duration> {
    match err.kind() {
        io::ErrorKind::ConnectionAborted
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionRefused
        | io::ErrorKind::Interrupted
        | io::ErrorKind::WouldBlock => None,
        _ => Some(ACCEPT_ERROR_BACKOFF),
    }
}

/// Handles an incoming HTTP request.
async fn handle_request(
    req: Request<IncomingBody>,
    router: Arc<Router>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    Ok(router.route(req).await.map(Full::new))
}
