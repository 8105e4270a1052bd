//! Server lifecycle.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::{build_router, AppState};
use axum::Router;
use rostersync_engine::{
    BasicAuthHeaders, BlockingTransport, HeaderProvider, ReactiveTransport, SyncService,
};
use rostersync_store::StudentStore;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// The sync server.
///
/// Exposes a [`SyncService`] over HTTP. Every route answers with a result
/// envelope; only a crashed blocking operation produces a non-200 status.
///
/// # Example
///
/// ```rust,ignore
/// use rostersync_server::{ServerConfig, SyncServer};
///
/// let server = SyncServer::new(ServerConfig::default(), Arc::new(service));
/// server.run(tokio::signal::ctrl_c().map(|_| ())).await?;
/// ```
pub struct SyncServer<S, R, B, H = BasicAuthHeaders> {
    config: ServerConfig,
    state: AppState<S, R, B, H>,
}

impl<S, R, B, H> SyncServer<S, R, B, H>
where
    S: StudentStore + 'static,
    R: ReactiveTransport + 'static,
    B: BlockingTransport + 'static,
    H: HeaderProvider + 'static,
{
    /// Creates a new sync server.
    pub fn new(config: ServerConfig, service: Arc<SyncService<S, R, B, H>>) -> Self {
        Self {
            config,
            state: AppState::new(service),
        }
    }

    /// Returns the configured bind address.
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Returns the router, for embedding or testing.
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Binds the configured address and serves until `shutdown` resolves.
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> ServerResult<()> {
        let addr = self.config.bind_addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        self.serve(listener, shutdown).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> ServerResult<()> {
        let addr = listener.local_addr()?;
        info!(%addr, "Sync server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Sync server shutdown complete");
        Ok(())
    }
}
