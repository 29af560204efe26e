//! Listener lifecycle
//!
//! Binds the gRPC and HTTP listeners, then supervises them as independent
//! tasks: one listener exiting is logged and does not stop the other.

use std::fmt;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tower::limit::ConcurrencyLimitLayer;

use proto::record_service_server::RecordServiceServer;

use crate::config::RecordServiceConfig;
use crate::grpc::RecordRpcService;
use crate::http::{self, HttpState};
use crate::repository::RecordStore;
use crate::service::RecordCatalog;

/// Listener lifecycle errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Reflection setup failed: {0}")]
    Reflection(String),

    #[error("gRPC transport error: {0}")]
    Grpc(#[from] tonic::transport::Error),

    #[error("HTTP server error: {0}")]
    Http(#[source] std::io::Error),

    #[error("{0} listener(s) exited with an error")]
    ListenersFailed(usize),
}

/// Which of the two listeners a task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listener {
    Grpc,
    Http,
}

impl fmt::Display for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listener::Grpc => f.write_str("grpc"),
            Listener::Http => f.write_str("http"),
        }
    }
}

/// A listener's serve loop, as handed to [`supervise`].
pub type ListenerFuture = Pin<Box<dyn Future<Output = Result<(), ServerError>> + Send>>;

/// Resolves once `true` is sent or the sender is dropped.
pub async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

/// Serve `record.RecordService` on an already bound listener.
///
/// At most `workers` calls are handled at once across all connections.
pub async fn serve_grpc(
    listener: TcpListener,
    service: RecordRpcService,
    workers: usize,
    shutdown: watch::Receiver<bool>,
) -> Result<(), ServerError> {
    let reflection_service = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(proto::FILE_DESCRIPTOR_SET)
        .build_v1()
        .map_err(|e| ServerError::Reflection(e.to_string()))?;

    Server::builder()
        .layer(ConcurrencyLimitLayer::new(workers))
        .add_service(reflection_service)
        .add_service(RecordServiceServer::new(service))
        .serve_with_incoming_shutdown(
            TcpListenerStream::new(listener),
            wait_for_shutdown(shutdown),
        )
        .await?;

    Ok(())
}

/// Serve the REST routes on an already bound listener.
pub async fn serve_http(
    listener: TcpListener,
    state: HttpState,
    shutdown: watch::Receiver<bool>,
) -> Result<(), ServerError> {
    axum::serve(listener, http::router(state))
        .with_graceful_shutdown(wait_for_shutdown(shutdown))
        .await
        .map_err(ServerError::Http)
}

/// Run every listener as its own task until all of them have exited.
///
/// A listener that stops or fails is logged and the others keep serving.
/// Returns [`ServerError::ListenersFailed`] when any of them failed.
pub async fn supervise(
    listeners: Vec<(Listener, ListenerFuture)>,
    shutdown: watch::Receiver<bool>,
) -> Result<(), ServerError> {
    let mut tasks = JoinSet::new();
    for (listener, serve) in listeners {
        tasks.spawn(async move { (listener, serve.await) });
    }

    let mut failures = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((listener, Ok(()))) => {
                tracing::info!(%listener, "Listener stopped");
            }
            Ok((listener, Err(e))) => {
                failures += 1;
                tracing::error!(%listener, "Listener failed: {}", e);
            }
            Err(e) => {
                failures += 1;
                tracing::error!("Listener task aborted: {}", e);
            }
        }
        if !tasks.is_empty() && !*shutdown.borrow() {
            tracing::info!(remaining = tasks.len(), "Remaining listener keeps serving");
        }
    }

    if failures > 0 {
        return Err(ServerError::ListenersFailed(failures));
    }
    Ok(())
}

async fn bind(addr: &str) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr).await.map_err(|source| ServerError::Bind {
        addr: addr.to_string(),
        source,
    })
}

/// Record service with both listeners bound but not yet serving.
pub struct RecordServer {
    config: RecordServiceConfig,
    catalog: RecordCatalog,
    grpc_listener: TcpListener,
    http_listener: TcpListener,
}

impl RecordServer {
    /// Bind both listeners on the configured addresses
    pub async fn bind(
        config: RecordServiceConfig,
        store: Arc<dyn RecordStore>,
    ) -> Result<Self, ServerError> {
        let grpc_listener = bind(&config.grpc_addr).await?;
        let http_listener = bind(&config.http_addr).await?;

        Ok(Self {
            catalog: RecordCatalog::new(store),
            config,
            grpc_listener,
            http_listener,
        })
    }

    pub fn grpc_addr(&self) -> std::io::Result<SocketAddr> {
        self.grpc_listener.local_addr()
    }

    pub fn http_addr(&self) -> std::io::Result<SocketAddr> {
        self.http_listener.local_addr()
    }

    /// Serve until shutdown is signalled, supervising both listeners.
    pub async fn run(self, shutdown: watch::Receiver<bool>) -> Result<(), ServerError> {
        let Self {
            config,
            catalog,
            grpc_listener,
            http_listener,
        } = self;

        if let Ok(addr) = grpc_listener.local_addr() {
            tracing::info!("gRPC server listening on {}", addr);
        }
        if let Ok(addr) = http_listener.local_addr() {
            tracing::info!("HTTP server listening on {}", addr);
        }

        let grpc_service = RecordRpcService::new(catalog.clone(), config.version.clone());
        let http_state = HttpState {
            catalog,
            version: config.version.clone(),
        };

        let listeners: Vec<(Listener, ListenerFuture)> = vec![
            (
                Listener::Grpc,
                Box::pin(serve_grpc(
                    grpc_listener,
                    grpc_service,
                    config.grpc_workers,
                    shutdown.clone(),
                )),
            ),
            (
                Listener::Http,
                Box::pin(serve_http(http_listener, http_state, shutdown.clone())),
            ),
        ];

        supervise(listeners, shutdown).await
    }
}
