//! Graceful shutdown signal handling

use std::{io, time::Duration};

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::signal;

/// Time in-flight requests (including provider calls) get to finish.
const GRACE_PERIOD: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub(crate) enum ShutdownSignalError {
    #[error("failed to install Ctrl+C handler: {0}")]
    CtrlC(#[source] io::Error),

    #[cfg(unix)]
    #[error("failed to install SIGTERM handler: {0}")]
    SigTerm(#[source] io::Error),
}

#[cfg(unix)]
async fn terminate() -> Result<&'static str, ShutdownSignalError> {
    signal::unix::signal(signal::unix::SignalKind::terminate())
        .map_err(ShutdownSignalError::SigTerm)?
        .recv()
        .await;

    Ok("SIGTERM")
}

#[cfg(not(unix))]
async fn terminate() -> Result<&'static str, ShutdownSignalError> {
    std::future::pending().await
}

/// Wait for Ctrl+C or SIGTERM, then stop accepting connections and drain.
pub(crate) async fn listen(handle: ServerHandle) -> Result<(), ShutdownSignalError> {
    let received = tokio::select! {
        result = signal::ctrl_c() => {
            result.map_err(ShutdownSignalError::CtrlC)?;

            "Ctrl+C"
        }
        result = terminate() => result?,
    };

    tracing::info!(
        signal = received,
        grace_seconds = GRACE_PERIOD.as_secs(),
        "shutting down"
    );

    handle.stop_graceful(Some(GRACE_PERIOD));

    Ok(())
}
