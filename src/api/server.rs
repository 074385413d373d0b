// src/api/server.rs

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::{SubmissionStore, router};
use crate::config::ConfigFile;
use crate::errors::{PipedagError, Result};

/// Bind `addr` and serve the API until Ctrl-C.
pub async fn serve(
    config: &ConfigFile,
    addr: SocketAddr,
    store: Arc<SubmissionStore>,
) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| PipedagError::BindError {
            addr: addr.to_string(),
            source,
        })?;

    let app = router(config, store);
    serve_with_shutdown(listener, app, shutdown_signal()).await
}

/// Serve `app` on an already bound listener until `shutdown` resolves.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local_addr = listener.local_addr()?;
    info!(%local_addr, "pipedag api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("pipedag api stopped");
    Ok(())
}

/// Resolves on Ctrl-C.
///
/// If the signal handler cannot be installed the server keeps running and
/// must be stopped externally.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
